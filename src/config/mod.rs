mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    CompanionConfig, Config, NavigationConfig, ReportsConfig, RewardsConfig, ServerConfig,
};
