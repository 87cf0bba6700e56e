use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Reservation {
    pub vehicle_id: u32,
    pub renter: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Reservation {
    pub fn new(vehicle_id: u32, renter: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Reservation {
            vehicle_id,
            renter: renter.to_string(),
            start_date,
            end_date,
        }
    }

    /// Returns true if date is in [start_date, end_date] inclusive.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ReservationData {
    pub reservations: Vec<Reservation>,
}

impl ReservationData {
    pub fn add(&mut self, reservation: Reservation) {
        self.reservations.push(reservation);
        self.reservations.sort_by_key(|r| r.start_date);
    }

    /// Deterministic rented-day lookup for the calendar: is any reservation
    /// for this vehicle active on the given date?
    pub fn covers(&self, vehicle_id: u32, date: NaiveDate) -> bool {
        self.reservations
            .iter()
            .any(|r| r.vehicle_id == vehicle_id && r.is_active_on(date))
    }

    pub fn for_vehicle(&self, vehicle_id: u32) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_new_sets_fields() {
        let r = Reservation::new(3, "Mohammed El Amrani", d(2025, 11, 20), d(2025, 11, 27));
        assert_eq!(r.vehicle_id, 3);
        assert_eq!(r.renter, "Mohammed El Amrani");
        assert_eq!(r.start_date, d(2025, 11, 20));
        assert_eq!(r.end_date, d(2025, 11, 27));
    }

    #[test]
    fn test_is_active_on_inclusive_boundaries() {
        let r = Reservation::new(1, "Karim", d(2025, 11, 20), d(2025, 11, 27));
        assert!(r.is_active_on(d(2025, 11, 20)));
        assert!(r.is_active_on(d(2025, 11, 27)));
        assert!(r.is_active_on(d(2025, 11, 23)));
    }

    #[test]
    fn test_is_active_on_outside_range() {
        let r = Reservation::new(1, "Karim", d(2025, 11, 20), d(2025, 11, 27));
        assert!(!r.is_active_on(d(2025, 11, 19)));
        assert!(!r.is_active_on(d(2025, 11, 28)));
    }

    #[test]
    fn test_covers_matches_vehicle_and_date() {
        let mut data = ReservationData::default();
        data.add(Reservation::new(1, "Karim", d(2025, 11, 20), d(2025, 11, 27)));
        assert!(data.covers(1, d(2025, 11, 22)));
        assert!(!data.covers(2, d(2025, 11, 22)));
        assert!(!data.covers(1, d(2025, 12, 1)));
    }

    #[test]
    fn test_covers_across_multiple_reservations() {
        let mut data = ReservationData::default();
        data.add(Reservation::new(1, "Karim", d(2025, 11, 20), d(2025, 11, 22)));
        data.add(Reservation::new(1, "Sara", d(2025, 12, 1), d(2025, 12, 5)));
        assert!(data.covers(1, d(2025, 11, 21)));
        assert!(data.covers(1, d(2025, 12, 3)));
        assert!(!data.covers(1, d(2025, 11, 25)));
    }

    #[test]
    fn test_add_sorts_by_start_date() {
        let mut data = ReservationData::default();
        data.add(Reservation::new(1, "Sara", d(2025, 12, 1), d(2025, 12, 5)));
        data.add(Reservation::new(2, "Karim", d(2025, 11, 20), d(2025, 11, 22)));
        assert_eq!(data.reservations[0].renter, "Karim");
        assert_eq!(data.reservations[1].renter, "Sara");
    }

    #[test]
    fn test_for_vehicle_filters() {
        let mut data = ReservationData::default();
        data.add(Reservation::new(1, "Karim", d(2025, 11, 20), d(2025, 11, 22)));
        data.add(Reservation::new(2, "Sara", d(2025, 11, 20), d(2025, 11, 22)));
        data.add(Reservation::new(1, "Nadia", d(2025, 12, 1), d(2025, 12, 2)));
        let for_one = data.for_vehicle(1);
        assert_eq!(for_one.len(), 2);
        assert!(for_one.iter().all(|r| r.vehicle_id == 1));
    }

    #[test]
    fn test_default_is_empty() {
        let data = ReservationData::default();
        assert!(data.reservations.is_empty());
        assert!(!data.covers(1, d(2025, 1, 1)));
    }
}
