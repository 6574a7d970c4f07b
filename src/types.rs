use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub mileage: f64,
    pub engine_hours: f64,
    pub part_wear: f64,
}

impl VehicleState {
    /// Feature order expected by the maintenance model.
    pub fn features(&self) -> [f64; 3] {
        [self.mileage, self.engine_hours, self.part_wear]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    pub speed: f64,
    pub acceleration: f64,
    pub braking: f64,
}

impl DriverState {
    /// Feature order expected by the behavior model.
    pub fn features(&self) -> [f64; 3] {
        [self.speed, self.acceleration, self.braking]
    }
}

// Body of GET /status; field names are read by the dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOut {
    pub maintenance_alert: String,
    pub driver_behavior: String,
    pub vehicle_data: VehicleState,
    pub driver_data: DriverState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertOut {
    pub message: String,
}
