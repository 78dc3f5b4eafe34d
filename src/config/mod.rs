// ==========================================
// 零售生产与补货核心 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件与环境变量覆写
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod engine_config_reader;
pub mod error;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_config_path, ConfigManager};
pub use engine_config::EngineConfig;
pub use engine_config_reader::EngineConfigReader;
pub use error::ConfigError;
