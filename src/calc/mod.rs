pub mod calendar;
pub mod fleet_stats;

pub use calendar::{build_month_grid, CalendarCursor, DayCell, DayKind, MonthGrid};
pub use fleet_stats::{calculate_fleet_stats, FleetStats};
