use crate::data::{seed, FleetData, StatusFilter};
use anyhow::Result;
use chrono::Local;

pub fn run(filter: StatusFilter, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let fleet = seed::demo_fleet(today);
    if json {
        write_fleet_json(&fleet, filter, &mut std::io::stdout())
    } else {
        write_fleet(&fleet, filter, &mut std::io::stdout())
    }
}

pub(crate) fn write_fleet<W: std::io::Write>(
    fleet: &FleetData,
    filter: StatusFilter,
    out: &mut W,
) -> Result<()> {
    let vehicles = fleet.by_status(filter);
    writeln!(out, "Fleet ({})", filter.label())?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<4} {:<20} {:<12} {:<10} {:>10} {:>10} {:>10}",
        "#", "Model", "Plate", "Status", "Revenue", "Expenses", "Profit"
    )?;
    for v in &vehicles {
        writeln!(
            out,
            "  {:<4} {:<20} {:<12} {:<10} {:>10.0} {:>10.0} {:>10.0}",
            v.id,
            v.model,
            v.plate,
            v.status.to_string(),
            v.revenue,
            v.expenses,
            v.profit()
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} vehicle(s)", vehicles.len())?;
    Ok(())
}

pub(crate) fn write_fleet_json<W: std::io::Write>(
    fleet: &FleetData,
    filter: StatusFilter,
    out: &mut W,
) -> Result<()> {
    let vehicles = fleet.by_status(filter);
    let json = serde_json::to_string_pretty(&vehicles)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vehicle::{Vehicle, VehicleForm, VehicleStatus};
    use chrono::NaiveDate;

    fn make_fleet() -> FleetData {
        let mut fleet = FleetData::default();
        for (model, status) in [
            ("Dacia Logan", VehicleStatus::Available),
            ("Hyundai Tucson", VehicleStatus::Rented),
        ] {
            fleet.add(VehicleForm {
                model: model.to_string(),
                plate: "12345-A-6".to_string(),
                status,
                last_maintenance: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                lat: 33.57,
                lng: -7.59,
                revenue: 1000.0,
                expenses: 400.0,
            });
        }
        fleet
    }

    #[test]
    fn test_write_fleet_empty() {
        let fleet = FleetData::default();
        let mut buf = Vec::new();
        write_fleet(&fleet, StatusFilter::All, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Total: 0 vehicle(s)"));
    }

    #[test]
    fn test_write_fleet_lists_all() {
        let fleet = make_fleet();
        let mut buf = Vec::new();
        write_fleet(&fleet, StatusFilter::All, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Dacia Logan"));
        assert!(out.contains("Hyundai Tucson"));
        assert!(out.contains("Total: 2 vehicle(s)"));
    }

    #[test]
    fn test_write_fleet_respects_filter() {
        let fleet = make_fleet();
        let mut buf = Vec::new();
        write_fleet(&fleet, StatusFilter::Rented, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Hyundai Tucson"));
        assert!(!out.contains("Dacia Logan"));
        assert!(out.contains("Total: 1 vehicle(s)"));
    }

    #[test]
    fn test_write_fleet_shows_profit() {
        let fleet = make_fleet();
        let mut buf = Vec::new();
        write_fleet(&fleet, StatusFilter::All, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("600"), "profit column missing: {}", out);
    }

    #[test]
    fn test_write_fleet_json_parses_back() {
        let fleet = make_fleet();
        let mut buf = Vec::new();
        write_fleet_json(&fleet, StatusFilter::All, &mut buf).unwrap();
        let parsed: Vec<Vehicle> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].model, "Dacia Logan");
    }

    #[test]
    fn test_write_fleet_json_filtered() {
        let fleet = make_fleet();
        let mut buf = Vec::new();
        write_fleet_json(&fleet, StatusFilter::Available, &mut buf).unwrap();
        let parsed: Vec<Vehicle> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].status, VehicleStatus::Available);
    }
}
