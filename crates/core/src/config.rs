use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Defaults for the percentile-bootstrap kernel (see `crate::stats::bootstrap`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub iterations: usize,
    pub confidence_level: f64,
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            confidence_level: 0.95,
            seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            bootstrap: BootstrapConfig::default(),
        }
    }
}
