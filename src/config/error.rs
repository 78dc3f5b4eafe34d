// ==========================================
// 零售生产与补货核心 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置格式错误: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值非法 (key={key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}
