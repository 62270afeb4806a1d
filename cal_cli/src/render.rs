//! Plain-text rendering of grids and record lists.

use cal_core::{DayType, MonthGrid, OffDayRecord};

const WEEKDAY_HEADER: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Marker printed after a day number
fn marker(day_type: DayType) -> char {
    match day_type {
        DayType::OrdinaryWeekday => ' ',
        DayType::PreviousMonthFill | DayType::NextMonthFill => '.',
        other => other.code(),
    }
}

/// Render a month grid, one text line per week row.
pub fn month(grid: &MonthGrid) -> String {
    let mut out = format!("{:>16}年{:>2}月\n", grid.year, grid.month);
    for name in WEEKDAY_HEADER {
        // Full-width names take two columns
        out.push_str(&format!("  {name}"));
    }
    out.push('\n');

    for (numbers, types) in grid.day_numbers.iter().zip(&grid.day_types) {
        let row: Vec<String> = numbers
            .iter()
            .zip(types)
            .map(|(number, day_type)| match number {
                Some(day) => format!("{:>3}{}", day, marker(*day_type)),
                None => "    ".to_string(),
            })
            .collect();
        out.push_str(row.join("").trim_end());
        out.push('\n');
    }
    out
}

/// Legend for the markers used by [`month`]
pub fn legend() -> &'static str {
    "h 祝日  s 振替休日  e 国民の休日  o 休暇  u 日曜  a 土曜  . 前月/翌月"
}

/// One record per line: `2024-05-03 [祝日] 憲法記念日 (note)`
pub fn records<'a>(records: impl IntoIterator<Item = &'a OffDayRecord>) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{:04}-{:02}-{:02} [{}] {}",
            record.year,
            record.month,
            record.day,
            record.kind.label(),
            record.name
        ));
        if !record.note.is_empty() {
            out.push_str(&format!(" ({})", record.note));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cal_core::OffDayKind;

    #[test]
    fn test_month_rows() {
        let offdays = vec![OffDayRecord::new(2024, 2, 11, OffDayKind::Holiday, "建国記念の日")];
        let grid = MonthGrid::build(2024, 2, false, &offdays).unwrap();
        let text = month(&grid);
        let lines: Vec<&str> = text.lines().collect();

        // title, header, five weeks
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[2], "                  1   2   3a");
        assert!(lines[3].starts_with("  4u"));
        assert!(lines[4].starts_with(" 11h"));
    }

    #[test]
    fn test_overflow_marker() {
        let grid = MonthGrid::build(2024, 2, true, &[]).unwrap();
        let text = month(&grid);
        assert!(text.lines().nth(2).unwrap().starts_with(" 28."));
    }

    #[test]
    fn test_record_lines() {
        let list = vec![
            OffDayRecord::new(2024, 5, 3, OffDayKind::Holiday, "憲法記念日"),
            OffDayRecord::new(2024, 5, 10, OffDayKind::PersonalOffDay, "休暇").with_note("通院"),
        ];
        assert_eq!(
            records(&list),
            "2024-05-03 [祝日] 憲法記念日\n2024-05-10 [休暇] 休暇 (通院)\n"
        );
    }
}
