//! # cal_core - Off-Day Calendar Engine
//!
//! `cal_core` computes the Japanese national-holiday calendar and keeps a
//! user-editable list of off-days (holidays, substitute holidays, bridge
//! holidays, personal leave and annotated days) in a flat text file. A
//! calendar view consumes the monthly grid and the records it produces.
//!
//! ## Design
//!
//! - **Stateless**: the holiday rules and the grid builder are pure
//!   functions of their arguments
//! - **Synchronous**: every operation finishes before it returns
//! - **Local failures**: errors come back as [`CalError`]; nothing panics or
//!   aborts on bad input files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cal_core::store::OffDayStore;
//!
//! let store = OffDayStore::default();
//! store.build_year_list(2024)?;
//!
//! let grid = store.month_grid(2024, 5, true)?;
//! for (numbers, types) in grid.day_numbers.iter().zip(&grid.day_types) {
//!     println!("{:?} {:?}", numbers, types);
//! }
//! # Ok::<(), cal_core::errors::CalError>(())
//! ```
//!
//! ## Modules
//!
//! - [`offday`] - Off-day record and kind
//! - [`holidays`] - Holiday rule engine
//! - [`store`] - Record file persistence and year reconciliation
//! - [`grid`] - Monthly grid builder and day classification
//! - [`dates`] - Calendar arithmetic helpers
//! - [`settings`] - Store configuration
//! - [`errors`] - Structured error types

pub mod dates;
pub mod errors;
pub mod grid;
pub mod holidays;
pub mod offday;
pub mod settings;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalError, CalResult};
pub use grid::{classify_day, week_of, DayType, MonthGrid};
pub use holidays::{compute_holidays, compute_year_holidays};
pub use offday::{OffDayKind, OffDayRecord};
pub use settings::CalendarSettings;
pub use store::OffDayStore;
