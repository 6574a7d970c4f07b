use serde::Deserialize;
use std::{
    env::VarError,
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{DashboardError, Result};

const CONFIG_VAR: &str = "DASHBOARD_CONFIG";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind_addr: String,
    pub port: u16,
    pub tick_ms: u64,
    pub log_predictions: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            tick_ms: 1000,
            log_predictions: false,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| DashboardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| DashboardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the file named by `DASHBOARD_CONFIG`, then env overrides.
    pub fn from_env() -> Result<Self> {
        let base = match config_path(std::env::var(CONFIG_VAR))? {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(raw) = lookup("PORT") {
            match raw.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("ignoring unparsable PORT={:?}", raw),
            }
        }
        if let Some(raw) = lookup("TICK_MS") {
            match raw.parse() {
                Ok(ms) => self.tick_ms = ms,
                Err(_) => tracing::warn!("ignoring unparsable TICK_MS={:?}", raw),
            }
        }
        if let Some(flag) = lookup("LOG_PRED") {
            self.log_predictions = flag == "1";
        }
        self
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let raw = format!("{}:{}", self.bind_addr, self.port);
        raw.parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("invalid listen address {}: {}", raw, e))
    }
}

// Unset means defaults; a value that is not unicode is an error, not a skip.
fn config_path(raw: std::result::Result<String, VarError>) -> Result<Option<PathBuf>> {
    match raw {
        Ok(path) => Ok(Some(PathBuf::from(path))),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(DashboardError::ConfigEnv { var: CONFIG_VAR }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, ffi::OsString, io::Write};
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_tick_once_a_second_on_port_5000() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.tick(), Duration::from_secs(1));
        assert!(!cfg.log_predictions);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "port": 8080, "tick_ms": 250 }}"#).unwrap();

        let cfg = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.tick_ms, 250);
        assert_eq!(cfg.bind_addr, "0.0.0.0");
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigParse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigRead { .. }));
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "not-a-port"),
            ("TICK_MS", "50"),
            ("LOG_PRED", "1"),
        ]
        .into_iter()
        .collect();

        let cfg = DashboardConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.bind_addr, "127.0.0.1");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.tick_ms, 50);
        assert!(cfg.log_predictions);
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn config_path_distinguishes_unset_from_garbled() {
        assert_eq!(config_path(Err(VarError::NotPresent)).unwrap(), None);
        assert_eq!(
            config_path(Ok("dash.json".to_string())).unwrap(),
            Some(PathBuf::from("dash.json"))
        );

        let err = config_path(Err(VarError::NotUnicode(OsString::from("bad")))).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigEnv { var: "DASHBOARD_CONFIG" }));
    }
}
