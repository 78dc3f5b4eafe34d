// ==========================================
// 零售生产与补货核心 - 生产资源领域模型
// ==========================================
// 职责: 设备/人员/场地等可调度资源
// 红线: 资源在单次调用中只读
// ==========================================

use crate::domain::types::ResourceType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 默认每日产能 (工作小时)
pub const DEFAULT_DAILY_CAPACITY_HOURS: f64 = 8.0;

// ==========================================
// ProductionResource - 生产资源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionResource {
    pub id: String,
    pub name: String,
    pub resource_type: ResourceType,
    #[serde(default = "default_capacity")]
    pub capacity: u32, // 可同时承载的单位数

    // ===== 时间窗口 =====
    #[serde(default)]
    pub availability: Vec<TimeWindow>,
    #[serde(default)]
    pub maintenance: Vec<TimeWindow>,

    // ===== 属性 =====
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,

    /// 资源自声明的每日产能小时数 (缺省时使用全局配置)
    #[serde(default)]
    pub daily_capacity_hours: Option<f64>,
}

fn default_capacity() -> u32 {
    1
}

impl ProductionResource {
    /// 实际使用的每日产能
    ///
    /// 资源未声明或声明值非正时回退到 `fallback_hours`
    pub fn effective_daily_capacity(&self, fallback_hours: f64) -> f64 {
        match self.daily_capacity_hours {
            Some(h) if h > 0.0 => h,
            _ => fallback_hours,
        }
    }
}

// ==========================================
// TimeWindow - 时间窗口 [start, end)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// 是否完整包含另一个区间
    pub fn contains(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= start && end <= self.end
    }

    /// 是否与另一个区间重叠
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}
