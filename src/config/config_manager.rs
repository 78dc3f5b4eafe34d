// ==========================================
// 零售生产与补货核心 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 扁平 key-value (JSON 文件 + 环境变量覆写)
// 优先级: 环境变量 RETAIL_OPS_<KEY> > 配置文件 > 默认值
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::config::engine_config_reader::EngineConfigReader;
use crate::config::error::ConfigError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "RETAIL_OPS_";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "RETAIL_OPS_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Clone, Default)]
pub struct ConfigManager {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl ConfigManager {
    /// 创建空配置 (全部取默认值)
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有键值创建
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 文件内容为扁平对象,值可以是字符串/数字/布尔
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

        let parsed: BTreeMap<String, Value> = serde_json::from_str(&raw)?;
        let mut values = HashMap::with_capacity(parsed.len());
        for (key, value) in parsed {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key,
                        message: format!("不支持的值类型: {}", other),
                    })
                }
            };
            values.insert(key, text);
        }

        tracing::info!(path = %path.display(), count = values.len(), "配置文件已加载");
        Ok(Self::from_map(values))
    }

    /// 加载默认配置
    ///
    /// 1. RETAIL_OPS_CONFIG 指定的文件,或平台配置目录下的 retail-ops/config.json
    /// 2. 文件不存在时使用默认值
    /// 3. 应用 RETAIL_OPS_<KEY> 环境变量覆写
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path);

        let manager = match path {
            Some(p) if p.exists() => Self::load_from_file(&p)?,
            Some(p) => {
                tracing::debug!(path = %p.display(), "配置文件不存在,使用默认值");
                Self::new()
            }
            None => Self::new(),
        };

        manager.apply_overrides(std::env::vars())?;
        Ok(manager)
    }

    /// 应用环境变量覆写
    ///
    /// 只接受 `config_keys::ALL` 中声明的键; 返回覆写数量
    pub fn apply_overrides<I>(&self, vars: I) -> Result<usize, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut count = 0;
        for (name, value) in vars {
            let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = suffix.to_lowercase();
            if config_keys::ALL.contains(&key.as_str()) {
                self.set_config_value(&key, &value)?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<String> {
        match self.values.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    /// 写入配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut guard = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        guard.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }

    /// 读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn get_f64_or_default(&self, key: &str, default: f64) -> f64 {
        let value = self.get_config_or_default(key, &default.to_string());
        value.parse::<f64>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %value, "配置值格式错误,使用默认值");
            default
        })
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> bool {
        match self.get_config_value(key) {
            None => default,
            Some(v) => match v.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    tracing::warn!(config_key = key, raw_value = %v, "配置值格式错误,使用默认值");
                    default
                }
            },
        }
    }

    /// 获取所有配置的快照 (JSON, 键有序)
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let guard = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        let ordered: BTreeMap<&String, &String> = guard.iter().collect();
        Ok(serde_json::to_string(&ordered)?)
    }

    /// 从配置快照恢复
    ///
    /// # 返回
    /// 恢复的配置项数量 (会覆盖同名键)
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, ConfigError> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;
        let mut guard = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let count = config_map.len();
        guard.extend(config_map);
        Ok(count)
    }

    /// 构造校验后的引擎参数
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::from_reader(self)
    }
}

/// 平台默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("retail-ops").join("config.json"))
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
impl EngineConfigReader for ConfigManager {
    fn get_daily_capacity_hours(&self) -> f64 {
        self.get_f64_or_default(config_keys::DAILY_CAPACITY_HOURS, 8.0)
    }

    fn get_default_buffer_hours(&self) -> f64 {
        self.get_f64_or_default(config_keys::DEFAULT_BUFFER_HOURS, 0.0)
    }

    fn get_low_stock_critical_ratio(&self) -> f64 {
        self.get_f64_or_default(config_keys::LOW_STOCK_CRITICAL_RATIO, 0.25)
    }

    fn get_low_stock_high_ratio(&self) -> f64 {
        self.get_f64_or_default(config_keys::LOW_STOCK_HIGH_RATIO, 0.5)
    }

    fn is_replenishment_enabled(&self) -> bool {
        self.get_bool_or_default(config_keys::REPLENISHMENT_ENABLED, true)
    }

    fn get_temperature_tolerance_c(&self) -> f64 {
        self.get_f64_or_default(config_keys::TEMPERATURE_TOLERANCE_C, 2.0)
    }

    fn get_humidity_tolerance_pct(&self) -> f64 {
        self.get_f64_or_default(config_keys::HUMIDITY_TOLERANCE_PCT, 5.0)
    }

    fn get_locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, "zh-CN")
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排程
    pub const DAILY_CAPACITY_HOURS: &str = "daily_capacity_hours";
    pub const DEFAULT_BUFFER_HOURS: &str = "default_buffer_hours";

    // 补货
    pub const LOW_STOCK_CRITICAL_RATIO: &str = "low_stock_critical_ratio";
    pub const LOW_STOCK_HIGH_RATIO: &str = "low_stock_high_ratio";
    pub const REPLENISHMENT_ENABLED: &str = "replenishment_enabled";

    // 环境监控
    pub const TEMPERATURE_TOLERANCE_C: &str = "temperature_tolerance_c";
    pub const HUMIDITY_TOLERANCE_PCT: &str = "humidity_tolerance_pct";

    // 展示
    pub const LOCALE: &str = "locale";

    pub const ALL: &[&str] = &[
        DAILY_CAPACITY_HOURS,
        DEFAULT_BUFFER_HOURS,
        LOW_STOCK_CRITICAL_RATIO,
        LOW_STOCK_HIGH_RATIO,
        REPLENISHMENT_ENABLED,
        TEMPERATURE_TOLERANCE_C,
        HUMIDITY_TOLERANCE_PCT,
        LOCALE,
    ];
}
