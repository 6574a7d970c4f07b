use rand::Rng;
use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle};

use crate::state::SharedTelemetry;

pub const MILEAGE_STEP: f64 = 1.0;
pub const ENGINE_HOURS_STEP: f64 = 0.1;
pub const PART_WEAR_STEP: f64 = 0.05;
pub const SPEED_MAX: f64 = 100.0;
pub const ACCELERATION_MAX: f64 = 5.0;
pub const BRAKING_MAX: f64 = 5.0;

/// Sender half of the updater's stop signal.
pub type StopHandle = watch::Sender<bool>;

pub fn stop_channel() -> (StopHandle, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Signals the updater to stop and waits for its task to finish.
pub async fn stop_and_join(
    stop: &StopHandle,
    task: JoinHandle<()>,
) -> Result<(), tokio::task::JoinError> {
    if stop.send(true).is_err() {
        tracing::debug!("updater already stopped");
    }
    task.await
}

/// Advances the simulation once per tick.
///
/// Vehicle metrics accumulate; driver metrics are redrawn every tick.
pub struct Updater<R> {
    telemetry: SharedTelemetry,
    rng: R,
    period: Duration,
}

impl<R: Rng> Updater<R> {
    pub fn new(telemetry: SharedTelemetry, rng: R, period: Duration) -> Self {
        Self {
            telemetry,
            rng,
            period,
        }
    }

    pub fn tick(&mut self) {
        let rng = &mut self.rng;
        let d_mileage = rng.gen_range(0.0..MILEAGE_STEP);
        let d_hours = rng.gen_range(0.0..ENGINE_HOURS_STEP);
        let d_wear = rng.gen_range(0.0..PART_WEAR_STEP);
        let speed = rng.gen_range(0.0..SPEED_MAX);
        let acceleration = rng.gen_range(0.0..ACCELERATION_MAX);
        let braking = rng.gen_range(0.0..BRAKING_MAX);

        self.telemetry.update(|t| {
            t.vehicle.mileage += d_mileage;
            t.vehicle.engine_hours += d_hours;
            t.vehicle.part_wear += d_wear;
            t.driver.speed = speed;
            t.driver.acceleration = acceleration;
            t.driver.braking = braking;
        });
        tracing::trace!(
            "tick mileage+={:.3} hours+={:.3} wear+={:.4} speed={:.1} accel={:.2} brake={:.2}",
            d_mileage, d_hours, d_wear, speed, acceleration, braking
        );
    }

    /// Sleeps one period, ticks, repeats. Returns once `stop` reads true
    /// or its sender is dropped.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        tracing::info!("updater started; period={:?}", self.period);
        loop {
            if *stop.borrow() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.period) => self.tick(),
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("updater stopped");
    }
}
