use crate::config::engine_config_reader::EngineConfigReader;
use crate::config::error::ConfigError;
use crate::domain::resource::DEFAULT_DAILY_CAPACITY_HOURS;
use crate::engine::replenishment::{DEFAULT_CRITICAL_RATIO, DEFAULT_HIGH_RATIO};
use serde::{Deserialize, Serialize};

/// 引擎参数 (校验后的强类型配置)
///
/// 由 ConfigManager 读取后构造,作为显式参数传入各引擎
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// 每日产能 (小时)
    pub daily_capacity_hours: f64,

    /// 默认缓冲时长 (小时)
    pub default_buffer_hours: f64,

    /// 低库存分级阈值
    pub low_stock_critical_ratio: f64,
    pub low_stock_high_ratio: f64,

    /// 补货引擎开关
    pub replenishment_enabled: bool,

    /// 环境监控容差
    pub temperature_tolerance_c: f64,
    pub humidity_tolerance_pct: f64,

    /// 消息语言
    pub locale: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_capacity_hours: DEFAULT_DAILY_CAPACITY_HOURS,
            default_buffer_hours: 0.0,
            low_stock_critical_ratio: DEFAULT_CRITICAL_RATIO,
            low_stock_high_ratio: DEFAULT_HIGH_RATIO,
            replenishment_enabled: true,
            temperature_tolerance_c: 2.0,
            humidity_tolerance_pct: 5.0,
            locale: "zh-CN".to_string(),
        }
    }
}

impl EngineConfig {
    /// 从配置读取器构造并校验
    pub fn from_reader(reader: &dyn EngineConfigReader) -> Result<Self, ConfigError> {
        let config = Self {
            daily_capacity_hours: reader.get_daily_capacity_hours(),
            default_buffer_hours: reader.get_default_buffer_hours(),
            low_stock_critical_ratio: reader.get_low_stock_critical_ratio(),
            low_stock_high_ratio: reader.get_low_stock_high_ratio(),
            replenishment_enabled: reader.is_replenishment_enabled(),
            temperature_tolerance_c: reader.get_temperature_tolerance_c(),
            humidity_tolerance_pct: reader.get_humidity_tolerance_pct(),
            locale: reader.get_locale(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 参数校验
    ///
    /// - 每日产能 > 0
    /// - 缓冲时长 >= 0
    /// - 0 < critical_ratio <= high_ratio <= 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if !(self.daily_capacity_hours > 0.0) {
            return Err(invalid("daily_capacity_hours", "必须 > 0"));
        }
        if !(self.default_buffer_hours >= 0.0) {
            return Err(invalid("default_buffer_hours", "必须 >= 0"));
        }
        if !(self.low_stock_critical_ratio > 0.0) {
            return Err(invalid("low_stock_critical_ratio", "必须 > 0"));
        }
        if !(self.low_stock_high_ratio >= self.low_stock_critical_ratio
            && self.low_stock_high_ratio <= 1.0)
        {
            return Err(invalid(
                "low_stock_high_ratio",
                "必须介于 low_stock_critical_ratio 与 1 之间",
            ));
        }
        if !(self.temperature_tolerance_c >= 0.0) || !(self.humidity_tolerance_pct >= 0.0) {
            return Err(invalid("tolerance", "环境容差必须 >= 0"));
        }
        Ok(())
    }
}
