// ==========================================
// 零售生产与补货核心 - 排程领域模型
// ==========================================
// 职责: 排程批次 (派生对象) 与冲突类型
// 不变量: scheduled_end > scheduled_start, estimated_duration_hours > 0
// ==========================================

use crate::domain::batch::ProductionBatch;
use crate::domain::types::SchedulePriority;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduledBatch - 已排程批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBatch {
    #[serde(flatten)]
    pub batch: ProductionBatch,

    // ===== 时间 =====
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime, // = start + estimated_duration + buffer_time

    // ===== 分配 =====
    pub assigned_resources: Vec<String>, // 资源ID (去重,保持输入顺序)
    pub priority: SchedulePriority,
    #[serde(default)]
    pub dependencies: Vec<String>, // 必须先完成的批次ID

    // ===== 时长 (小时) =====
    pub estimated_duration_hours: f64,
    #[serde(default)]
    pub buffer_time_hours: f64,
}

impl ScheduledBatch {
    /// 批次ID
    pub fn id(&self) -> &str {
        &self.batch.id
    }

    /// 开工日期 (用于按日归组)
    pub fn start_date(&self) -> NaiveDate {
        self.scheduled_start.date()
    }

    /// 是否分配了指定资源
    pub fn uses_resource(&self, resource_id: &str) -> bool {
        self.assigned_resources.iter().any(|r| r == resource_id)
    }

    /// 排程时间与资源是否与另一条完全一致 (用于幂等重排)
    pub fn same_slot_as(&self, other: &ScheduledBatch) -> bool {
        self.scheduled_start == other.scheduled_start
            && self.scheduled_end == other.scheduled_end
            && self.assigned_resources == other.assigned_resources
            && self.priority == other.priority
            && self.dependencies == other.dependencies
    }
}

// ==========================================
// Conflict - 排程冲突 (三类)
// ==========================================
// 检测结果仅供参考,不做自动消解
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conflict {
    /// 资源超负荷: 当日原始利用率 > 100%
    #[serde(rename_all = "camelCase")]
    ResourceOverbooked {
        resource_id: String,
        date: NaiveDate,
        batch_id: String,                // 触发检测的首个批次
        utilization_pct: f64,            // 原始利用率 (未截断)
        affected_batch_ids: Vec<String>, // 当日占用该资源的全部批次
    },

    /// 依赖违例: 前置批次结束晚于本批次开工
    #[serde(rename_all = "camelCase")]
    DependencyViolation {
        batch_id: String,
        dependency_id: String,
        dependency_end: NaiveDateTime,
        batch_start: NaiveDateTime,
    },

    /// 原料短缺: 库存 < 配方用量
    #[serde(rename_all = "camelCase")]
    MaterialShortage {
        batch_id: String,
        material_id: String,
        required: f64,
        available: f64,
    },
}

impl Conflict {
    /// 冲突所属批次
    pub fn batch_id(&self) -> &str {
        match self {
            Conflict::ResourceOverbooked { batch_id, .. }
            | Conflict::DependencyViolation { batch_id, .. }
            | Conflict::MaterialShortage { batch_id, .. } => batch_id,
        }
    }

    /// 冲突类型标识
    pub fn kind(&self) -> &'static str {
        match self {
            Conflict::ResourceOverbooked { .. } => "RESOURCE_OVERBOOKED",
            Conflict::DependencyViolation { .. } => "DEPENDENCY_VIOLATION",
            Conflict::MaterialShortage { .. } => "MATERIAL_SHORTAGE",
        }
    }
}
