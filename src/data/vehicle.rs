use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Rented,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VehicleStatus::Available => write!(f, "available"),
            VehicleStatus::Rented => write!(f, "rented"),
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(VehicleStatus::Available),
            "rented" => Ok(VehicleStatus::Rented),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Fleet view / CLI filter over vehicle status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    Rented,
}

impl StatusFilter {
    pub fn matches(&self, status: VehicleStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Available => status == VehicleStatus::Available,
            StatusFilter::Rented => status == VehicleStatus::Rented,
        }
    }

    /// all -> available -> rented -> all, for the fleet view filter key.
    pub fn next(&self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Available,
            StatusFilter::Available => StatusFilter::Rented,
            StatusFilter::Rented => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Available => "available",
            StatusFilter::Rented => "rented",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "available" => Ok(StatusFilter::Available),
            "rented" => Ok(StatusFilter::Rented),
            other => Err(format!("unknown filter '{}' (all|available|rented)", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Vehicle {
    pub id: u32,
    pub model: String,
    pub plate: String,
    pub image: String,
    pub status: VehicleStatus,
    /// Populated when the vehicle is rented. Nothing enforces agreement with
    /// `status`; a vehicle entered as rented without a renter stays that way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_end: Option<NaiveDate>,
    pub lat: f64,
    pub lng: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub last_maintenance: NaiveDate,
}

impl Vehicle {
    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses
    }

    /// Display string for the image column; empty fields fall back to a
    /// placeholder marker.
    pub fn image_label(&self) -> &str {
        if self.image.is_empty() {
            "(no image)"
        } else {
            &self.image
        }
    }
}

/// Field values collected by the add-vehicle form, already parsed and
/// validated. Ids are not part of the form; `FleetData::add` assigns them.
#[derive(Clone, Debug)]
pub struct VehicleForm {
    pub model: String,
    pub plate: String,
    pub status: VehicleStatus,
    pub last_maintenance: NaiveDate,
    pub lat: f64,
    pub lng: f64,
    pub revenue: f64,
    pub expenses: f64,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct FleetData {
    pub vehicles: Vec<Vehicle>,
}

impl FleetData {
    /// Builds a vehicle from the form, assigns `id = count + 1`, and appends
    /// it as the last element. Ids are never reused because vehicles are
    /// never deleted.
    pub fn add(&mut self, form: VehicleForm) -> u32 {
        let id = self.vehicles.len() as u32 + 1;
        self.vehicles.push(Vehicle {
            id,
            model: form.model,
            plate: form.plate,
            image: String::new(),
            status: form.status,
            renter: None,
            rental_end: None,
            lat: form.lat,
            lng: form.lng,
            revenue: form.revenue,
            expenses: form.expenses,
            last_maintenance: form.last_maintenance,
        });
        id
    }

    pub fn get(&self, id: u32) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    pub fn by_status(&self, filter: StatusFilter) -> Vec<&Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| filter.matches(v.status))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}
