mod initialize;
pub use initialize::Initializer;

mod config;
pub use config::{Config, IndexConfig, RedisConfig};

pub mod env {
    pub const LOG_DIRECTIVE: &str = "TYPEDKVS_LOG";
    pub const URL: &str = "TYPEDKVS_URL";
    pub const CONFIG_PATH: &str = "TYPEDKVS_CONFIG_PATH";
}
