use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    model::Models,
    state::SharedTelemetry,
    types::{AlertOut, StatusOut},
};

pub const ALERT_MESSAGE: &str = "Maintenance alert triggered!";

const DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub telemetry: SharedTelemetry,
    pub models: Arc<Models>,
    pub log_predictions: bool,
}

impl AppState {
    pub fn new(telemetry: SharedTelemetry, models: Models) -> Self {
        Self {
            telemetry,
            models: Arc::new(models),
            log_predictions: false,
        }
    }

    pub fn with_prediction_logging(mut self, enabled: bool) -> Self {
        self.log_predictions = enabled;
        self
    }

    pub fn status(&self) -> StatusOut {
        let snap = self.telemetry.snapshot();
        let p = self.models.predict(&snap.vehicle, &snap.driver);

        if self.log_predictions {
            tracing::info!(
                "status maintenance_score={:.3} behavior_score={:.3} alert={:?} behavior={:?}",
                p.maintenance_score, p.behavior_score, p.maintenance_alert, p.driver_behavior
            );
        } else {
            tracing::debug!(
                "status maintenance_score={:.3} behavior_score={:.3}",
                p.maintenance_score, p.behavior_score
            );
        }

        StatusOut {
            maintenance_alert: p.maintenance_alert.to_string(),
            driver_behavior: p.driver_behavior,
            vehicle_data: snap.vehicle,
            driver_data: snap.driver,
        }
    }
}

pub fn trigger_alert() -> AlertOut {
    tracing::info!("manual maintenance alert triggered");
    AlertOut {
        message: ALERT_MESSAGE.to_string(),
    }
}

// ---------- Handlers ----------

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn get_status(State(state): State<AppState>) -> Json<StatusOut> {
    Json(state.status())
}

async fn get_trigger_alert() -> Json<AlertOut> {
    Json(trigger_alert())
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/status", get(get_status))
        .route("/trigger_alert", get(get_trigger_alert))
        .fallback(not_found)
        .with_state(state)
}
