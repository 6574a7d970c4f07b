use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config path in {var} is not valid unicode")]
    ConfigEnv { var: &'static str },

    #[error("training table is empty")]
    EmptyTrainingSet,

    #[error("training rows have no features")]
    NoFeatures,

    #[error("training table has {rows} rows but {targets} targets")]
    TargetMismatch { rows: usize, targets: usize },

    #[error("training row {row} has {got} features, expected {expected}")]
    FeatureWidth {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("least-squares solve failed: {0}")]
    Solve(&'static str),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
