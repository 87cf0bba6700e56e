use crate::data::{MaintenanceData, ReservationData};
use chrono::{Datelike, NaiveDate};

/// The (month, year) pair addressing the currently displayed month of a
/// vehicle's rental calendar. Owned by the detail view; rendering functions
/// receive it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarCursor {
    /// 1-12.
    pub month: u32,
    pub year: i32,
}

impl CalendarCursor {
    pub fn new(year: i32, month: u32) -> Self {
        CalendarCursor { year, month }
    }

    /// Cursor for the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        CalendarCursor::new(date.year(), date.month())
    }

    /// Moves the cursor by `direction` months, carrying into the year on
    /// both wraparounds. Years grow without bound in either direction.
    pub fn advance(&mut self, direction: i32) {
        let total = self.month as i32 - 1 + direction;
        self.month = total.rem_euclid(12) as u32 + 1;
        self.year += total.div_euclid(12);
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

/// Display classification of one day cell, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayKind {
    Maintenance,
    Rented,
    Free,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub kind: DayKind,
    pub is_today: bool,
}

/// One rendered month: `start_day` leading blanks followed by one cell per
/// day. Purely derived; nothing is retained between renders except the
/// cursor itself.
#[derive(Clone, Debug)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Leading blank cells before day 1, Monday-first (0-6).
    pub start_day: usize,
    pub days: Vec<DayCell>,
}

/// Builds the rental calendar grid for one vehicle and one month. Rented
/// days come from reservation records, maintenance days from the schedule;
/// maintenance wins when both fall on the same date.
pub fn build_month_grid(
    vehicle_id: u32,
    cursor: CalendarCursor,
    reservations: &ReservationData,
    maintenance: &MaintenanceData,
    today: NaiveDate,
) -> MonthGrid {
    let first = NaiveDate::from_ymd_opt(cursor.year, cursor.month, 1).unwrap();
    let start_day = first.weekday().num_days_from_monday() as usize;
    let total_days = days_in_month(cursor.year, cursor.month);

    let mut days = Vec::with_capacity(total_days as usize);
    for day in 1..=total_days {
        let date = NaiveDate::from_ymd_opt(cursor.year, cursor.month, day).unwrap();
        let kind = if maintenance.scheduled_on(vehicle_id, date) {
            DayKind::Maintenance
        } else if reservations.covers(vehicle_id, date) {
            DayKind::Rented
        } else {
            DayKind::Free
        };
        days.push(DayCell {
            day,
            kind,
            is_today: date == today,
        });
    }

    MonthGrid {
        year: cursor.year,
        month: cursor.month,
        start_day,
        days,
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}
