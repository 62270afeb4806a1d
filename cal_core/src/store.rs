//! # Off-Day Store
//!
//! Persists off-day records in a flat, human-editable text file and merges
//! them with the holidays computed by [`crate::holidays`].
//!
//! ## File Format
//!
//! ```text
//! # [年],[月],[日],[休暇タイプ],[休暇名称],[備考]
//! # 休暇タイプ：
//! #   0：なし
//! #   1：祝日
//! #   2：振替休日
//! #   3：国民の休日
//! #   4：個人的な休暇
//!
//! 2024,1,1,1,元日,
//! 2024,1,8,1,成人の日,
//! 2024,5,10,4,休暇,通院
//! ```
//!
//! Lines starting with `#` and blank lines are ignored. Each record line is
//! `year,month,day,kind,name[,note]`. Lines that do not parse are skipped.
//!
//! Every mutation reads the whole file, changes the list, and rewrites the
//! whole file. Writes go to a `.tmp` sibling first and are renamed into
//! place. There is no locking; the last writer wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cal_core::offday::{OffDayKind, OffDayRecord};
//! use cal_core::store::OffDayStore;
//!
//! let store = OffDayStore::default();
//!
//! // Merge this year's holidays into the file
//! let year_list = store.build_year_list(2024)?;
//!
//! // Record some leave
//! store.add(OffDayRecord::new(2024, 5, 10, OffDayKind::PersonalOffDay, "休暇"))?;
//! # Ok::<(), cal_core::errors::CalError>(())
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::errors::{CalError, CalResult};
use crate::grid::MonthGrid;
use crate::holidays::{apply_national_holidays, apply_substitute_holidays, compute_holidays};
use crate::offday::{contains_date, sort_by_date, OffDayKind, OffDayRecord};
use crate::settings::{CalendarSettings, DEFAULT_RECORD_FILE};

/// Header written at the top of every record file
pub const FILE_HEADER: &str = "\
# [年],[月],[日],[休暇タイプ],[休暇名称],[備考]
# 休暇タイプ：
#   0：なし
#   1：祝日
#   2：振替休日
#   3：国民の休日
#   4：個人的な休暇
";

/// File-backed off-day store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffDayStore {
    path: PathBuf,
}

impl Default for OffDayStore {
    fn default() -> Self {
        OffDayStore::new(DEFAULT_RECORD_FILE)
    }
}

impl OffDayStore {
    /// Store backed by the file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OffDayStore { path: path.into() }
    }

    /// Store backed by the configured record file
    pub fn from_settings(settings: &CalendarSettings) -> Self {
        OffDayStore::new(settings.record_file.clone())
    }

    /// Path to the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------
    // Reading and writing
    // ------------------------------------------------------------------

    /// Read every record in the file, in file order.
    ///
    /// A missing file is an empty store. Unparseable lines are skipped.
    ///
    /// # Errors
    ///
    /// `CalError::FileError` if the file exists but cannot be read.
    pub fn read(&self) -> CalResult<Vec<OffDayRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "record file absent, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(CalError::file_error("read", self.path.display().to_string(), e.to_string()));
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        // Editors on Windows often save with a byte-order mark
        let text = contents.strip_prefix('\u{FEFF}').unwrap_or(&contents);
        let records: Vec<OffDayRecord> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
            .filter_map(|(index, line)| {
                let record = parse_line(line);
                if record.is_none() {
                    warn!(path = %self.path.display(), line = index + 1, "skipping malformed record line");
                }
                record
            })
            .collect();

        debug!(path = %self.path.display(), count = records.len(), "read off-day records");
        Ok(records)
    }

    /// Overwrite the file with `records`, date-ordered, below the fixed header.
    ///
    /// # Errors
    ///
    /// `CalError::FileError` if any step of the write fails. The failure is
    /// also logged.
    pub fn write(&self, records: &[OffDayRecord]) -> CalResult<()> {
        let mut sorted = records.to_vec();
        sort_by_date(&mut sorted);

        self.write_atomic(&render(&sorted)).inspect_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to write record file");
        })?;

        debug!(path = %self.path.display(), count = sorted.len(), "wrote off-day records");
        Ok(())
    }

    fn write_atomic(&self, contents: &str) -> CalResult<()> {
        let tmp_path = tmp_path_for(&self.path);

        if let Err(e) = write_synced(&tmp_path, contents) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CalError::file_error("rename to final", self.path.display().to_string(), e.to_string())
        })
    }

    /// First record on the given date, if any
    pub fn find(&self, year: i32, month: u32, day: u32) -> CalResult<Option<OffDayRecord>> {
        Ok(self
            .read()?
            .into_iter()
            .find(|r| r.same_date(year, month, day)))
    }

    // ------------------------------------------------------------------
    // Mutations
    //
    // Each operation comes in two forms: one that reads the file first, and
    // an `_in` form that works on a list the caller already holds. Both
    // rewrite the file.
    // ------------------------------------------------------------------

    /// Add a record and rewrite the file.
    ///
    /// # Errors
    ///
    /// `CalError::InvalidInput` if the name or note would break the line
    /// format, `CalError::FileError` if the file cannot be read or written.
    pub fn add(&self, record: OffDayRecord) -> CalResult<()> {
        let mut list = self.read()?;
        self.add_in(record, &mut list)
    }

    /// Add a record to `list`, re-sort it, and rewrite the file from it.
    pub fn add_in(&self, record: OffDayRecord, list: &mut Vec<OffDayRecord>) -> CalResult<()> {
        validate_text("name", &record.name)?;
        validate_text("note", &record.note)?;

        list.push(record);
        sort_by_date(list);
        self.write(list)
    }

    /// Remove every record on a date. Returns how many were removed.
    ///
    /// Nothing is written when no record matches.
    pub fn remove(&self, year: i32, month: u32, day: u32) -> CalResult<usize> {
        let mut list = self.read()?;
        self.remove_in(year, month, day, &mut list)
    }

    /// [`OffDayStore::remove`] against a caller-held list
    pub fn remove_in(&self, year: i32, month: u32, day: u32, list: &mut Vec<OffDayRecord>) -> CalResult<usize> {
        self.remove_where_in(|r| r.same_date(year, month, day), list)
    }

    /// Remove every record with the given name. Returns how many were removed.
    pub fn remove_by_name(&self, name: &str) -> CalResult<usize> {
        let mut list = self.read()?;
        self.remove_by_name_in(name, &mut list)
    }

    /// [`OffDayStore::remove_by_name`] against a caller-held list
    pub fn remove_by_name_in(&self, name: &str, list: &mut Vec<OffDayRecord>) -> CalResult<usize> {
        self.remove_where_in(|r| r.name == name, list)
    }

    /// Remove every record matching `predicate`. Returns how many were removed.
    pub fn remove_where<F>(&self, predicate: F) -> CalResult<usize>
    where
        F: FnMut(&OffDayRecord) -> bool,
    {
        let mut list = self.read()?;
        self.remove_where_in(predicate, &mut list)
    }

    /// [`OffDayStore::remove_where`] against a caller-held list
    pub fn remove_where_in<F>(&self, mut predicate: F, list: &mut Vec<OffDayRecord>) -> CalResult<usize>
    where
        F: FnMut(&OffDayRecord) -> bool,
    {
        let before = list.len();
        list.retain(|r| !predicate(r));
        let removed = before - list.len();

        if removed == 0 {
            return Ok(0);
        }
        sort_by_date(list);
        self.write(list)?;
        Ok(removed)
    }

    /// Replace the records on `record`'s date with `record`.
    ///
    /// This is a remove followed by an add, each rewriting the file. If the
    /// remove fails the file is untouched; if the add fails after the remove
    /// succeeded, the date is left without a record.
    pub fn update(&self, record: OffDayRecord) -> CalResult<()> {
        let mut list = self.read()?;
        self.update_in(record, &mut list)
    }

    /// [`OffDayStore::update`] against a caller-held list
    pub fn update_in(&self, record: OffDayRecord, list: &mut Vec<OffDayRecord>) -> CalResult<()> {
        validate_text("name", &record.name)?;
        validate_text("note", &record.note)?;

        self.remove_in(record.year, record.month, record.day, list)?;
        self.add_in(record, list)
    }

    // ------------------------------------------------------------------
    // Year pipeline
    // ------------------------------------------------------------------

    /// Build the full off-day list for `year` and persist it.
    ///
    /// 1. compute the year's statutory holidays
    /// 2. read the file and take its `Holiday` records
    /// 3. [`reconcile`] the two sets
    /// 4. derive substitute and bridge holidays from the reconciled set,
    ///    keeping notes the file already had on those days
    /// 5. add the file's personal leave and plain annotated days
    /// 6. sort, write, return
    ///
    /// Records for other years already in the file are kept.
    pub fn build_year_list(&self, year: i32) -> CalResult<Vec<OffDayRecord>> {
        let computed = compute_holidays(year)?;
        let from_file = self.read()?;

        let file_holidays: Vec<OffDayRecord> = records_of_kind(&from_file, OffDayKind::Holiday);
        let mut list = reconcile(&computed, &file_holidays);

        apply_substitute_holidays(&mut list);
        apply_national_holidays(&mut list);
        carry_derived_notes(&mut list, &from_file);

        list.extend(records_of_kind(&from_file, OffDayKind::PersonalOffDay));
        list.extend(records_of_kind(&from_file, OffDayKind::None));
        sort_by_date(&mut list);

        self.write(&list)?;
        debug!(year, count = list.len(), "built year off-day list");
        Ok(list)
    }

    /// Build the display grid for a month from the records currently on file.
    pub fn month_grid(&self, year: i32, month: u32, include_overflow: bool) -> CalResult<MonthGrid> {
        let offdays = self.read()?;
        MonthGrid::build(year, month, include_overflow, &offdays)
    }
}

/// Merge computed holidays with the `Holiday` records found in the file.
///
/// - A date in both sets keeps the file's record when its note differs from
///   the computed one, and the computed record otherwise.
/// - A date only in the file is carried over (manual additions).
/// - Within the file set, only the first record per date is considered.
pub fn reconcile(computed: &[OffDayRecord], from_file: &[OffDayRecord]) -> Vec<OffDayRecord> {
    let mut merged: Vec<OffDayRecord> = computed
        .iter()
        .map(|c| match from_file.iter().find(|f| f.same_date_as(c)) {
            Some(f) if f.note != c.note => f.clone(),
            _ => c.clone(),
        })
        .collect();

    for f in from_file {
        if !contains_date(computed, f.year, f.month, f.day) && !contains_date(&merged, f.year, f.month, f.day) {
            merged.push(f.clone());
        }
    }
    merged
}

fn records_of_kind(records: &[OffDayRecord], kind: OffDayKind) -> Vec<OffDayRecord> {
    records.iter().filter(|r| r.kind == kind).cloned().collect()
}

/// Substitute and bridge holidays are regenerated on every build; give them
/// back the note the file had for the same date and kind.
fn carry_derived_notes(list: &mut [OffDayRecord], from_file: &[OffDayRecord]) {
    for record in list
        .iter_mut()
        .filter(|r| matches!(r.kind, OffDayKind::SubstituteHoliday | OffDayKind::NationalHoliday))
    {
        if let Some(previous) = from_file
            .iter()
            .find(|f| f.kind == record.kind && f.same_date_as(record) && !f.note.is_empty())
        {
            record.note = previous.note.clone();
        }
    }
}

/// Parse one record line: `year,month,day,kind,name[,note]`
fn parse_line(line: &str) -> Option<OffDayRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if !(5..=6).contains(&fields.len()) {
        return None;
    }

    let year: i32 = fields[0].trim().parse().ok()?;
    let month: u32 = fields[1].trim().parse().ok()?;
    let day: u32 = fields[2].trim().parse().ok()?;

    // A non-numeric kind reads as 0; a number outside 0..=4 rejects the line
    let kind = match fields[3].trim().parse::<i64>() {
        Ok(code) => OffDayKind::try_from_code(code)?,
        Err(_) => OffDayKind::None,
    };

    let note = fields.get(5).copied().unwrap_or_default();
    Some(OffDayRecord::new(year, month, day, kind, fields[4]).with_note(note))
}

fn format_line(record: &OffDayRecord) -> String {
    format!(
        "{},{},{},{},{},{}",
        record.year,
        record.month,
        record.day,
        record.kind.code(),
        record.name,
        record.note
    )
}

/// Full file contents for an already sorted list
fn render(records: &[OffDayRecord]) -> String {
    let mut out = String::from(FILE_HEADER);
    out.push('\n');

    if records.is_empty() {
        out.push('\n');
    }
    for record in records {
        out.push_str(&format_line(record));
        out.push('\n');
    }
    out
}

fn validate_text(field: &str, value: &str) -> CalResult<()> {
    if value.contains([',', '\n', '\r']) {
        return Err(CalError::invalid_input(
            field,
            value,
            "Must not contain commas or line breaks",
        ));
    }
    Ok(())
}

fn write_synced(path: &Path, contents: &str) -> CalResult<()> {
    let mut file = File::create(path)
        .map_err(|e| CalError::file_error("create temp file", path.display().to_string(), e.to_string()))?;

    file.write_all(contents.as_bytes())
        .map_err(|e| CalError::file_error("write temp file", path.display().to_string(), e.to_string()))?;

    file.sync_all()
        .map_err(|e| CalError::file_error("sync temp file", path.display().to_string(), e.to_string()))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
