mod structs;

pub use structs::*;

use std::sync::{Arc, OnceLock};

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .clone()
}

/// Initialize the global configuration
///
/// Loads configuration from "config.toml" in the current directory.
/// If the file doesn't exist, uses in-memory defaults.
pub fn init_config() {
    CONFIG.get_or_init(|| Arc::new(StaticConfig::load()));
}

/// 测试专用：注入一份配置（已初始化时忽略）
pub fn init_config_with(config: StaticConfig) {
    let _ = CONFIG.set(Arc::new(config));
}
