pub mod app_settings;
pub mod maintenance;
pub mod persistence;
pub mod reservation;
pub mod seed;
pub mod vehicle;

pub use app_settings::AppSettings;
pub use maintenance::{MaintenanceData, MaintenanceEntry, MaintenanceKind};
pub use persistence::Persistable;
pub use reservation::{Reservation, ReservationData};
pub use vehicle::{FleetData, StatusFilter, Vehicle, VehicleForm, VehicleStatus};
