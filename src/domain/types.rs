// ==========================================
// 零售生产与补货核心 - 领域类型定义
// ==========================================
// 职责: 批次/工序/资源/补货告警相关的枚举类型
// 序列化格式: SCREAMING_SNAKE_CASE (与外部存储一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 生产批次状态 (Batch Status)
// ==========================================
// 终态: Completed / Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Planned,    // 已计划
    InProgress, // 生产中
    Aging,      // 熟成中
    OnHold,     // 暂停
    Completed,  // 已完成
    Cancelled,  // 已取消
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl BatchStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PLANNED" => Some(BatchStatus::Planned),
            "IN_PROGRESS" => Some(BatchStatus::InProgress),
            "AGING" => Some(BatchStatus::Aging),
            "ON_HOLD" => Some(BatchStatus::OnHold),
            "COMPLETED" => Some(BatchStatus::Completed),
            "CANCELLED" => Some(BatchStatus::Cancelled),
            _ => None,
        }
    }

    /// 转换为存储字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BatchStatus::Planned => "PLANNED",
            BatchStatus::InProgress => "IN_PROGRESS",
            BatchStatus::Aging => "AGING",
            BatchStatus::OnHold => "ON_HOLD",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Cancelled => "CANCELLED",
        }
    }

    /// 是否终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Cancelled)
    }

    /// 状态流转是否合法
    ///
    /// # 规则
    /// - Planned → InProgress / OnHold / Cancelled
    /// - InProgress → Aging / OnHold / Completed / Cancelled
    /// - Aging → Completed / OnHold / Cancelled
    /// - OnHold → Planned / InProgress / Aging / Cancelled
    /// - 终态不可再流转
    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        use BatchStatus::*;
        match (self, next) {
            (Planned, InProgress) | (Planned, OnHold) | (Planned, Cancelled) => true,
            (InProgress, Aging)
            | (InProgress, OnHold)
            | (InProgress, Completed)
            | (InProgress, Cancelled) => true,
            (Aging, Completed) | (Aging, OnHold) | (Aging, Cancelled) => true,
            (OnHold, Planned) | (OnHold, InProgress) | (OnHold, Aging) | (OnHold, Cancelled) => {
                true
            }
            _ => false,
        }
    }
}

// ==========================================
// 工序状态 (Stage Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Pending,    // 待开始
    InProgress, // 进行中
    Completed,  // 已完成
    Skipped,    // 已跳过
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "PENDING"),
            StageStatus::InProgress => write!(f, "IN_PROGRESS"),
            StageStatus::Completed => write!(f, "COMPLETED"),
            StageStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

// ==========================================
// 排程优先级 (Schedule Priority)
// ==========================================
// 顺序: Low < Medium < High < Urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for SchedulePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulePriority::Low => write!(f, "LOW"),
            SchedulePriority::Medium => write!(f, "MEDIUM"),
            SchedulePriority::High => write!(f, "HIGH"),
            SchedulePriority::Urgent => write!(f, "URGENT"),
        }
    }
}

impl Default for SchedulePriority {
    fn default() -> Self {
        SchedulePriority::Medium
    }
}

// ==========================================
// 资源类型 (Resource Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Equipment, // 设备
    Person,    // 人员
    Facility,  // 场地
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Equipment => write!(f, "EQUIPMENT"),
            ResourceType::Person => write!(f, "PERSON"),
            ResourceType::Facility => write!(f, "FACILITY"),
        }
    }
}

// ==========================================
// 补货告警类型 (Alert Type)
// ==========================================
// LowStock / OutOfStock / Overstock: 由规则引擎计算
// SeasonalAdjustment / DemandSpike / SlowMoving: 分析侧打标,引擎原样透传
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowStock,
    OutOfStock,
    Overstock,
    SeasonalAdjustment,
    DemandSpike,
    SlowMoving,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl AlertType {
    /// 转换为存储字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "LOW_STOCK",
            AlertType::OutOfStock => "OUT_OF_STOCK",
            AlertType::Overstock => "OVERSTOCK",
            AlertType::SeasonalAdjustment => "SEASONAL_ADJUSTMENT",
            AlertType::DemandSpike => "DEMAND_SPIKE",
            AlertType::SlowMoving => "SLOW_MOVING",
        }
    }

    /// 是否由库存阈值规则计算得出
    pub fn is_threshold_type(&self) -> bool {
        match self {
            AlertType::LowStock | AlertType::OutOfStock | AlertType::Overstock => true,
            AlertType::SeasonalAdjustment | AlertType::DemandSpike | AlertType::SlowMoving => {
                false
            }
        }
    }

    /// 是否需要补货 (会产生建议订货量)
    pub fn needs_reorder(&self) -> bool {
        matches!(self, AlertType::LowStock | AlertType::OutOfStock)
    }
}

// ==========================================
// 告警优先级 (Alert Priority)
// ==========================================
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPriority::Low => write!(f, "LOW"),
            AlertPriority::Medium => write!(f, "MEDIUM"),
            AlertPriority::High => write!(f, "HIGH"),
            AlertPriority::Critical => write!(f, "CRITICAL"),
        }
    }
}
