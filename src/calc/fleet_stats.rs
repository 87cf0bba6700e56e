use crate::data::{FleetData, VehicleStatus};

/// Aggregates shown on the dashboard and by the `stats` subcommand.
#[derive(Debug, Clone, Default)]
pub struct FleetStats {
    pub total_vehicles: usize,
    pub available: usize,
    pub rented: usize,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
}

impl FleetStats {
    /// Share of the fleet currently out on rental, 0-100.
    pub fn utilization_pct(&self) -> f64 {
        if self.total_vehicles == 0 {
            0.0
        } else {
            100.0 * self.rented as f64 / self.total_vehicles as f64
        }
    }
}

pub fn calculate_fleet_stats(fleet: &FleetData) -> FleetStats {
    let mut stats = FleetStats {
        total_vehicles: fleet.count(),
        ..FleetStats::default()
    };

    for v in &fleet.vehicles {
        match v.status {
            VehicleStatus::Available => stats.available += 1,
            VehicleStatus::Rented => stats.rented += 1,
        }
        stats.total_revenue += v.revenue;
        stats.total_expenses += v.expenses;
    }
    stats.total_profit = stats.total_revenue - stats.total_expenses;

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vehicle::VehicleForm;
    use chrono::NaiveDate;

    fn form(status: VehicleStatus, revenue: f64, expenses: f64) -> VehicleForm {
        VehicleForm {
            model: "Test".to_string(),
            plate: "00000-A-0".to_string(),
            status,
            last_maintenance: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            lat: 0.0,
            lng: 0.0,
            revenue,
            expenses,
        }
    }

    #[test]
    fn test_empty_fleet() {
        let stats = calculate_fleet_stats(&FleetData::default());
        assert_eq!(stats.total_vehicles, 0);
        assert_eq!(stats.available, 0);
        assert_eq!(stats.rented, 0);
        assert_eq!(stats.total_profit, 0.0);
        assert_eq!(stats.utilization_pct(), 0.0);
    }

    #[test]
    fn test_counts_by_status() {
        let mut fleet = FleetData::default();
        fleet.add(form(VehicleStatus::Available, 100.0, 40.0));
        fleet.add(form(VehicleStatus::Rented, 200.0, 50.0));
        fleet.add(form(VehicleStatus::Rented, 300.0, 60.0));
        let stats = calculate_fleet_stats(&fleet);
        assert_eq!(stats.total_vehicles, 3);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.rented, 2);
    }

    #[test]
    fn test_totals_and_profit() {
        let mut fleet = FleetData::default();
        fleet.add(form(VehicleStatus::Available, 100.0, 40.0));
        fleet.add(form(VehicleStatus::Rented, 200.0, 50.0));
        let stats = calculate_fleet_stats(&fleet);
        assert_eq!(stats.total_revenue, 300.0);
        assert_eq!(stats.total_expenses, 90.0);
        assert_eq!(stats.total_profit, 300.0 - 90.0);
    }

    #[test]
    fn test_utilization_pct() {
        let mut fleet = FleetData::default();
        fleet.add(form(VehicleStatus::Available, 0.0, 0.0));
        fleet.add(form(VehicleStatus::Rented, 0.0, 0.0));
        let stats = calculate_fleet_stats(&fleet);
        assert_eq!(stats.utilization_pct(), 50.0);
    }
}
