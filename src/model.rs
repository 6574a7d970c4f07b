use nalgebra::{DMatrix, DVector};

use crate::error::{DashboardError, Result};
use crate::types::{DriverState, VehicleState};

pub const MAINTENANCE_THRESHOLD: f64 = 1.0;
pub const NO_ISSUES: &str = "No issues";
pub const MAINTENANCE_SOON: &str = "Maintenance required soon";

// (mileage, engine_hours, part_wear) -> maintenance score
const MAINTENANCE_ROWS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [10.0, 100.0, 1.0],
    [20.0, 200.0, 2.0],
    [30.0, 300.0, 3.0],
];
const MAINTENANCE_TARGETS: [f64; 4] = [0.0, 1.0, 1.0, 2.0];

// (speed, acceleration, braking) -> behavior label
const BEHAVIOR_ROWS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [50.0, 2.0, 1.0],
    [60.0, 3.0, 2.0],
    [70.0, 4.0, 3.0],
];
const BEHAVIOR_LABELS: [&str; 4] = ["Good", "Average", "Poor", "Very Poor"];

// Singular values below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Ordinary least squares with intercept.
///
/// Solved through the SVD pseudo-inverse on centered data, which yields the
/// minimum-norm least-squares weights. Both built-in tables have collinear
/// columns, so the fit is not unique without that choice.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    weights: DVector<f64>,
    intercept: f64,
}

impl LinearRegression {
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Self> {
        let x = to_matrix(rows)?;
        if targets.len() != x.nrows() {
            return Err(DashboardError::TargetMismatch {
                rows: x.nrows(),
                targets: targets.len(),
            });
        }
        let y = DVector::from_column_slice(targets);

        let x_mean = x.row_mean();
        let y_mean = y.mean();
        let xc = DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] - x_mean[j]);
        let yc = y.add_scalar(-y_mean);

        let svd = xc.svd(true, true);
        let cutoff = svd.singular_values.max() * RANK_TOLERANCE;
        let weights = svd.solve(&yc, cutoff).map_err(DashboardError::Solve)?;
        let intercept = y_mean - weights.dot(&x_mean.transpose());

        Ok(Self { weights, intercept })
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.weights.len());
        self.weights
            .iter()
            .zip(x)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        self.weights.as_slice()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let width = rows.first().ok_or(DashboardError::EmptyTrainingSet)?.len();
    if width == 0 {
        return Err(DashboardError::NoFeatures);
    }
    let mut flat = Vec::with_capacity(rows.len() * width);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(DashboardError::FeatureWidth {
                row,
                got: values.len(),
                expected: width,
            });
        }
        flat.extend_from_slice(values);
    }
    Ok(DMatrix::from_row_slice(rows.len(), width, &flat))
}

/// Bijection between string labels and class indices, sorted lexicographically.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit(labels: &[&str]) -> Self {
        let mut classes: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceModel {
    regressor: LinearRegression,
}

impl MaintenanceModel {
    pub fn fit() -> Result<Self> {
        let rows: Vec<Vec<f64>> = MAINTENANCE_ROWS.iter().map(|r| r.to_vec()).collect();
        let regressor = LinearRegression::fit(&rows, &MAINTENANCE_TARGETS)?;
        Ok(Self { regressor })
    }

    pub fn score(&self, vehicle: &VehicleState) -> f64 {
        self.regressor.predict(&vehicle.features())
    }

    /// Literal threshold: only scores strictly below 1.0 are healthy.
    pub fn alert(score: f64) -> &'static str {
        if score < MAINTENANCE_THRESHOLD {
            NO_ISSUES
        } else {
            MAINTENANCE_SOON
        }
    }

    pub fn regressor(&self) -> &LinearRegression {
        &self.regressor
    }
}

#[derive(Debug, Clone)]
pub struct BehaviorModel {
    regressor: LinearRegression,
    encoder: LabelEncoder,
}

impl BehaviorModel {
    pub fn fit() -> Result<Self> {
        let encoder = LabelEncoder::fit(&BEHAVIOR_LABELS);
        let targets: Vec<f64> = BEHAVIOR_LABELS
            .iter()
            .filter_map(|label| encoder.encode(label))
            .map(|idx| idx as f64)
            .collect();
        let rows: Vec<Vec<f64>> = BEHAVIOR_ROWS.iter().map(|r| r.to_vec()).collect();
        let regressor = LinearRegression::fit(&rows, &targets)?;
        Ok(Self { regressor, encoder })
    }

    pub fn score(&self, driver: &DriverState) -> f64 {
        self.regressor.predict(&driver.features())
    }

    /// Truncates toward zero, then clamps into the trained class range.
    pub fn class_index(&self, score: f64) -> usize {
        let last = self.encoder.classes().len().saturating_sub(1) as i64;
        // `as` saturates NaN to 0 and infinities to the i64 bounds.
        (score.trunc() as i64).clamp(0, last) as usize
    }

    pub fn label(&self, score: f64) -> &str {
        self.encoder.decode(self.class_index(score)).unwrap_or("")
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn regressor(&self) -> &LinearRegression {
        &self.regressor
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub maintenance_score: f64,
    pub behavior_score: f64,
    pub maintenance_alert: &'static str,
    pub driver_behavior: String,
}

/// Both fitted models; built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Models {
    pub maintenance: MaintenanceModel,
    pub behavior: BehaviorModel,
}

impl Models {
    pub fn fit() -> Result<Self> {
        Ok(Self {
            maintenance: MaintenanceModel::fit()?,
            behavior: BehaviorModel::fit()?,
        })
    }

    pub fn predict(&self, vehicle: &VehicleState, driver: &DriverState) -> Prediction {
        let maintenance_score = self.maintenance.score(vehicle);
        let behavior_score = self.behavior.score(driver);
        Prediction {
            maintenance_score,
            behavior_score,
            maintenance_alert: MaintenanceModel::alert(maintenance_score),
            driver_behavior: self.behavior.label(behavior_score).to_string(),
        }
    }
}
