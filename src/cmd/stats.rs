use crate::calc::{calculate_fleet_stats, FleetStats};
use crate::data::seed;
use anyhow::Result;
use chrono::Local;

pub fn run() -> Result<()> {
    let today = Local::now().date_naive();
    let fleet = seed::demo_fleet(today);
    let stats = calculate_fleet_stats(&fleet);
    write_stats(&stats, "DH", &mut std::io::stdout())
}

pub(crate) fn write_stats<W: std::io::Write>(
    stats: &FleetStats,
    currency: &str,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Fleet Stats")?;
    writeln!(out, "---")?;
    writeln!(out, "{:<22} {}", "Vehicles:", stats.total_vehicles)?;
    writeln!(out, "{:<22} {}", "Available:", stats.available)?;
    writeln!(out, "{:<22} {}", "Rented:", stats.rented)?;
    writeln!(
        out,
        "{:<22} {:.1}%",
        "Utilization:",
        stats.utilization_pct()
    )?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "{:<22} {:.0} {}",
        "Total Revenue:", stats.total_revenue, currency
    )?;
    writeln!(
        out,
        "{:<22} {:.0} {}",
        "Total Expenses:", stats.total_expenses, currency
    )?;
    writeln!(
        out,
        "{:<22} {:.0} {}",
        "Total Profit:", stats.total_profit, currency
    )?;
    writeln!(out, "---")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stats() -> FleetStats {
        FleetStats {
            total_vehicles: 6,
            available: 3,
            rented: 3,
            total_revenue: 242450.0,
            total_expenses: 75400.0,
            total_profit: 167050.0,
        }
    }

    #[test]
    fn test_write_stats_counts() {
        let mut buf = Vec::new();
        write_stats(&make_stats(), "DH", &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Vehicles:              6"));
        assert!(out.contains("Available:             3"));
        assert!(out.contains("Rented:                3"));
    }

    #[test]
    fn test_write_stats_utilization() {
        let mut buf = Vec::new();
        write_stats(&make_stats(), "DH", &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("50.0%"));
    }

    #[test]
    fn test_write_stats_currency_suffix() {
        let mut buf = Vec::new();
        write_stats(&make_stats(), "DH", &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("242450 DH"));
        assert!(out.contains("167050 DH"));
    }

    #[test]
    fn test_write_stats_empty_fleet() {
        let stats = FleetStats::default();
        let mut buf = Vec::new();
        write_stats(&stats, "DH", &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Vehicles:              0"));
        assert!(out.contains("0.0%"));
    }
}
