//! RON configuration of the `directory` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use directory_core::SessionConfig;
use directory_engine::{
    EngineSettings, HttpSettings, PreviewSettings, ProbeSettings, SearchSettings,
    DEFAULT_FAVICON_SERVICE,
};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "directory.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding collections and uploaded blobs.
    pub store_root: PathBuf,
    pub collections: Vec<String>,
    pub fetch_cap: usize,
    pub debounce_ms: u64,
    pub probe_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub favicon_delay_ms: u64,
    /// Origin relative image paths are resolved against.
    pub origin: String,
    pub page_path: String,
    pub public_base_url: String,
    pub favicon_service: String,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        let probe = ProbeSettings::default();
        let http = HttpSettings::default();
        Self {
            store_root: PathBuf::from("directory-data"),
            collections: SearchSettings::default().collections,
            fetch_cap: SearchSettings::default().fetch_cap,
            debounce_ms: session.debounce.as_millis() as u64,
            probe_timeout_ms: probe.timeout.as_millis() as u64,
            connect_timeout_ms: http.connect_timeout.as_millis() as u64,
            request_timeout_ms: http.request_timeout.as_millis() as u64,
            favicon_delay_ms: PreviewSettings::default().favicon_delay.as_millis() as u64,
            origin: "http://localhost:8080".to_string(),
            page_path: session.page_path,
            public_base_url: "http://localhost:8080/blobs".to_string(),
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
            log_destination: LogDestination::Terminal,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> anyhow::Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        let config = ron::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn to_ron(&self) -> anyhow::Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new(),
        )?)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            page_path: self.page_path.clone(),
            ..SessionConfig::default()
        }
    }

    pub fn engine(&self) -> EngineSettings {
        EngineSettings {
            store_root: self.store_root.clone(),
            public_base_url: self.public_base_url.clone(),
            favicon_service: self.favicon_service.clone(),
            http: HttpSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                ..HttpSettings::default()
            },
            probe: ProbeSettings {
                timeout: Duration::from_millis(self.probe_timeout_ms),
                ..ProbeSettings::default()
            },
            search: SearchSettings {
                collections: self.collections.clone(),
                fetch_cap: self.fetch_cap,
                origin: self.origin.clone(),
            },
            preview: PreviewSettings {
                favicon_delay: Duration::from_millis(self.favicon_delay_ms),
            },
        }
    }

    /// Worst-case wait for one preview lookup.
    pub fn preview_budget(&self) -> Duration {
        Duration::from_millis(self.favicon_delay_ms + 4 * self.probe_timeout_ms + 1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        assert_eq!(AppConfig::read(&temp.path().join("none.ron")).unwrap(), None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "(collections: [\"images\"], fetch_cap: 20, log_destination: Both)").unwrap();

        let config = AppConfig::read(&path).unwrap().unwrap();
        assert_eq!(config.collections, vec!["images".to_string()]);
        assert_eq!(config.fetch_cap, 20);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.debounce_ms, 350);

        let engine = config.engine();
        assert_eq!(engine.search.fetch_cap, 20);
        assert_eq!(engine.probe.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unparsable_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "(collections: 7").unwrap();
        assert!(AppConfig::read(&path).is_err());
    }

    #[test]
    fn default_config_round_trips_through_ron() {
        let text = AppConfig::default().to_ron().unwrap();
        let parsed: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
