use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    OilChange,
    Brakes,
    Tires,
    FullService,
    Other,
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            MaintenanceKind::OilChange => "Oil change",
            MaintenanceKind::Brakes => "Brakes",
            MaintenanceKind::Tires => "Tires",
            MaintenanceKind::FullService => "Full service",
            MaintenanceKind::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for MaintenanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "oil" | "oil change" => Ok(MaintenanceKind::OilChange),
            "brakes" => Ok(MaintenanceKind::Brakes),
            "tires" => Ok(MaintenanceKind::Tires),
            "service" | "full service" => Ok(MaintenanceKind::FullService),
            "other" => Ok(MaintenanceKind::Other),
            other => Err(format!(
                "unknown maintenance type '{}' (oil|brakes|tires|service|other)",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MaintenanceEntry {
    pub vehicle_id: u32,
    pub kind: MaintenanceKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl MaintenanceEntry {
    pub fn new(vehicle_id: u32, kind: MaintenanceKind, date: NaiveDate, notes: &str) -> Self {
        MaintenanceEntry {
            vehicle_id,
            kind,
            date,
            notes: notes.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct MaintenanceData {
    pub entries: Vec<MaintenanceEntry>,
}

impl MaintenanceData {
    pub fn add(&mut self, entry: MaintenanceEntry) {
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.date);
    }

    /// Calendar lookup: does this vehicle have maintenance scheduled on date?
    pub fn scheduled_on(&self, vehicle_id: u32, date: NaiveDate) -> bool {
        self.entries
            .iter()
            .any(|e| e.vehicle_id == vehicle_id && e.date == date)
    }

    pub fn for_vehicle(&self, vehicle_id: u32) -> Vec<&MaintenanceEntry> {
        self.entries
            .iter()
            .filter(|e| e.vehicle_id == vehicle_id)
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
    fn test_kind_parse_accepts_aliases() {
        assert_eq!("oil".parse(), Ok(MaintenanceKind::OilChange));
        assert_eq!("Oil Change".parse(), Ok(MaintenanceKind::OilChange));
        assert_eq!("brakes".parse(), Ok(MaintenanceKind::Brakes));
        assert_eq!("tires".parse(), Ok(MaintenanceKind::Tires));
        assert_eq!("service".parse(), Ok(MaintenanceKind::FullService));
        assert_eq!("other".parse(), Ok(MaintenanceKind::Other));
        assert!("rust-proofing".parse::<MaintenanceKind>().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MaintenanceKind::OilChange.to_string(), "Oil change");
        assert_eq!(MaintenanceKind::FullService.to_string(), "Full service");
    }

    #[test]
    fn test_entry_new_sets_fields() {
        let e = MaintenanceEntry::new(2, MaintenanceKind::Brakes, d(2025, 11, 15), "front pads");
        assert_eq!(e.vehicle_id, 2);
        assert_eq!(e.kind, MaintenanceKind::Brakes);
        assert_eq!(e.date, d(2025, 11, 15));
        assert_eq!(e.notes, "front pads");
    }

    #[test]
    fn test_scheduled_on_matches_vehicle_and_date() {
        let mut data = MaintenanceData::default();
        data.add(MaintenanceEntry::new(1, MaintenanceKind::OilChange, d(2025, 11, 15), ""));
        assert!(data.scheduled_on(1, d(2025, 11, 15)));
        assert!(!data.scheduled_on(1, d(2025, 11, 16)));
        assert!(!data.scheduled_on(2, d(2025, 11, 15)));
    }

    #[test]
    fn test_add_sorts_by_date() {
        let mut data = MaintenanceData::default();
        data.add(MaintenanceEntry::new(1, MaintenanceKind::Tires, d(2025, 12, 3), ""));
        data.add(MaintenanceEntry::new(1, MaintenanceKind::OilChange, d(2025, 11, 15), ""));
        assert_eq!(data.entries[0].kind, MaintenanceKind::OilChange);
        assert_eq!(data.entries[1].kind, MaintenanceKind::Tires);
    }

    #[test]
    fn test_for_vehicle_filters() {
        let mut data = MaintenanceData::default();
        data.add(MaintenanceEntry::new(1, MaintenanceKind::OilChange, d(2025, 11, 15), ""));
        data.add(MaintenanceEntry::new(2, MaintenanceKind::Brakes, d(2025, 11, 18), ""));
        data.add(MaintenanceEntry::new(1, MaintenanceKind::Tires, d(2025, 12, 3), ""));
        assert_eq!(data.for_vehicle(1).len(), 2);
        assert_eq!(data.for_vehicle(2).len(), 1);
        assert!(data.for_vehicle(3).is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        let data = MaintenanceData::default();
        assert!(data.entries.is_empty());
        assert!(!data.scheduled_on(1, d(2025, 1, 1)));
    }
}
