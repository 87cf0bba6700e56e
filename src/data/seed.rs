use crate::data::maintenance::{MaintenanceData, MaintenanceEntry, MaintenanceKind};
use crate::data::reservation::{Reservation, ReservationData};
use crate::data::vehicle::{FleetData, Vehicle, VehicleStatus};
use chrono::{Datelike, Duration, NaiveDate};

/// Month labels for the dashboard revenue chart, January through November.
pub const MONTH_LABELS: [&str; 11] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
];

/// Monthly fleet revenue series for the dashboard line chart.
pub fn monthly_revenue() -> [u64; 11] {
    [
        32000, 35000, 38000, 36000, 42000, 45000, 48000, 44000, 46000, 50000, 52000,
    ]
}

/// Expense totals by category for the dashboard breakdown chart.
pub fn expense_breakdown() -> [(&'static str, u64); 4] {
    [
        ("Maintenance", 45000),
        ("Fuel", 38000),
        ("Insurance", 42000),
        ("Other", 17320),
    ]
}

fn vehicle(
    id: u32,
    model: &str,
    plate: &str,
    image: &str,
    status: VehicleStatus,
    renter: Option<&str>,
    rental_end: Option<NaiveDate>,
    lat: f64,
    lng: f64,
    revenue: f64,
    expenses: f64,
    last_maintenance: NaiveDate,
) -> Vehicle {
    Vehicle {
        id,
        model: model.to_string(),
        plate: plate.to_string(),
        image: image.to_string(),
        status,
        renter: renter.map(str::to_string),
        rental_end,
        lat,
        lng,
        revenue,
        expenses,
        last_maintenance,
    }
}

/// The demo fleet: six vehicles around Casablanca, three of them out on
/// rental. Dates are anchored to `today` so the dashboard is populated no
/// matter when it is launched.
pub fn demo_fleet(today: NaiveDate) -> FleetData {
    let vehicles = vec![
        vehicle(
            1,
            "Dacia Logan",
            "12345-A-6",
            "dacia-logan.jpg",
            VehicleStatus::Available,
            None,
            None,
            33.5892,
            -7.6036,
            38500.0,
            11200.0,
            today - Duration::days(24),
        ),
        vehicle(
            2,
            "Hyundai Tucson",
            "67890-B-6",
            "hyundai-tucson.jpg",
            VehicleStatus::Rented,
            Some("Mohammed El Amrani"),
            Some(today + Duration::days(8)),
            33.5731,
            -7.5898,
            52300.0,
            16800.0,
            today - Duration::days(41),
        ),
        vehicle(
            3,
            "Renault Clio 5",
            "24680-A-1",
            "renault-clio.jpg",
            VehicleStatus::Available,
            None,
            None,
            33.5615,
            -7.6331,
            29750.0,
            8400.0,
            today - Duration::days(12),
        ),
        vehicle(
            4,
            "Peugeot 208",
            "13579-B-20",
            "peugeot-208.jpg",
            VehicleStatus::Rented,
            Some("Fatima Zahra Alaoui"),
            Some(today + Duration::days(3)),
            33.5952,
            -7.5189,
            33100.0,
            9950.0,
            today - Duration::days(67),
        ),
        vehicle(
            5,
            "Kia Sportage",
            "11223-A-26",
            "",
            VehicleStatus::Available,
            None,
            None,
            33.5489,
            -7.6542,
            47600.0,
            15300.0,
            today - Duration::days(30),
        ),
        vehicle(
            6,
            "Volkswagen Golf 8",
            "44556-B-6",
            "vw-golf.jpg",
            VehicleStatus::Rented,
            Some("Youssef Benjelloun"),
            Some(today + Duration::days(15)),
            33.6072,
            -7.5761,
            41200.0,
            13750.0,
            today - Duration::days(9),
        ),
    ];
    FleetData { vehicles }
}

/// Reservations backing the rented vehicles in `demo_fleet`, plus history
/// for one available vehicle so its calendar is not blank.
pub fn demo_reservations(today: NaiveDate) -> ReservationData {
    let mut data = ReservationData::default();
    data.add(Reservation::new(
        2,
        "Mohammed El Amrani",
        today - Duration::days(4),
        today + Duration::days(8),
    ));
    data.add(Reservation::new(
        4,
        "Fatima Zahra Alaoui",
        today - Duration::days(11),
        today + Duration::days(3),
    ));
    data.add(Reservation::new(
        6,
        "Youssef Benjelloun",
        today - Duration::days(2),
        today + Duration::days(15),
    ));
    // Completed and upcoming bookings for the Logan.
    data.add(Reservation::new(
        1,
        "Karim Bennis",
        today - Duration::days(20),
        today - Duration::days(14),
    ));
    data.add(Reservation::new(
        1,
        "Sara Idrissi",
        today + Duration::days(10),
        today + Duration::days(13),
    ));
    data
}

/// Scheduled maintenance. The oil change lands on the 15th of the current
/// month, matching the long-standing demo calendar.
pub fn demo_maintenance(today: NaiveDate) -> MaintenanceData {
    let mut data = MaintenanceData::default();
    let fifteenth = NaiveDate::from_ymd_opt(today.year(), today.month(), 15)
        .unwrap_or(today);
    data.add(MaintenanceEntry::new(
        2,
        MaintenanceKind::OilChange,
        fifteenth,
        "5W-30, filter included",
    ));
    data.add(MaintenanceEntry::new(
        5,
        MaintenanceKind::Tires,
        today + Duration::days(21),
        "front pair",
    ));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_demo_fleet_ids_are_sequential() {
        let fleet = demo_fleet(d(2025, 11, 19));
        let ids: Vec<u32> = fleet.vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_demo_fleet_rented_vehicles_have_renter_fields() {
        let fleet = demo_fleet(d(2025, 11, 19));
        for v in &fleet.vehicles {
            if v.status == VehicleStatus::Rented {
                assert!(v.renter.is_some(), "vehicle {} missing renter", v.id);
                assert!(v.rental_end.is_some(), "vehicle {} missing rental_end", v.id);
            }
        }
    }

    #[test]
    fn test_demo_reservations_cover_today_for_rented_vehicles() {
        let today = d(2025, 11, 19);
        let fleet = demo_fleet(today);
        let reservations = demo_reservations(today);
        for v in &fleet.vehicles {
            if v.status == VehicleStatus::Rented {
                assert!(
                    reservations.covers(v.id, today),
                    "vehicle {} rented but not covered today",
                    v.id
                );
            }
        }
    }

    #[test]
    fn test_demo_maintenance_on_the_fifteenth() {
        let today = d(2025, 11, 19);
        let maintenance = demo_maintenance(today);
        assert!(maintenance.scheduled_on(2, d(2025, 11, 15)));
    }

    #[test]
    fn test_chart_series_lengths_match_labels() {
        assert_eq!(monthly_revenue().len(), MONTH_LABELS.len());
        assert_eq!(expense_breakdown().len(), 4);
    }

    #[test]
    fn test_demo_fleet_has_a_placeholder_image_case() {
        let fleet = demo_fleet(d(2025, 11, 19));
        assert!(fleet.vehicles.iter().any(|v| v.image.is_empty()));
    }
}
