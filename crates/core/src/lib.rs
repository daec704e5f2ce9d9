pub mod config;
pub mod config_loader;
pub mod error;
pub mod stats;
pub mod types;

pub use config::{AppConfig, BootstrapConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use error::AppError;
pub use types::{
    AnalysisResponse, ConfidenceInterval, MetricDetail, MetricDetails, MetricMap, MetricResult,
    OverallRow, TransactionLine, Unit, VariationMap, VirtualTransaction,
};
