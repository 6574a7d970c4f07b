use parking_lot::RwLock;
use std::sync::Arc;

use crate::types::{DriverState, VehicleState};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Telemetry {
    pub vehicle: VehicleState,
    pub driver: DriverState,
}

/// Single-writer / multi-reader handle to the simulated telemetry.
///
/// The updater is the only writer. Readers copy both records under one
/// read guard, so a snapshot never mixes pre- and post-tick fields.
#[derive(Debug, Clone, Default)]
pub struct SharedTelemetry {
    inner: Arc<RwLock<Telemetry>>,
}

impl SharedTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Telemetry {
        *self.inner.read()
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Telemetry),
    {
        f(&mut *self.inner.write());
    }

    pub fn set_vehicle(&self, vehicle: VehicleState) {
        self.inner.write().vehicle = vehicle;
    }

    pub fn set_driver(&self, driver: DriverState) {
        self.inner.write().driver = driver;
    }
}
