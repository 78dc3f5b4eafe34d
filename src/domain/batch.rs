// ==========================================
// 零售生产与补货核心 - 生产批次领域模型
// ==========================================
// 职责: 生产批次、工序、配方引用
// 红线: 不含调度逻辑,不读取系统时钟
// ==========================================

use crate::domain::material::Recipe;
use crate::domain::types::{BatchStatus, StageStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionBatch - 生产批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionBatch {
    pub id: String,           // 批次ID
    pub batch_number: String, // 批次号

    // ===== 配方 =====
    #[serde(default)]
    pub recipe: Option<Recipe>, // 配方 (含原料清单)

    // ===== 数量 =====
    pub planned_quantity: f64,
    #[serde(default)]
    pub actual_quantity: Option<f64>,
    pub unit: String,

    // ===== 状态 =====
    pub status: BatchStatus,

    // ===== 工序 =====
    #[serde(default)]
    pub stages: Vec<ProcessingStage>, // 按 order 排列
}

impl ProductionBatch {
    /// 按 order 排序后的工序
    pub fn ordered_stages(&self) -> Vec<&ProcessingStage> {
        let mut stages: Vec<&ProcessingStage> = self.stages.iter().collect();
        stages.sort_by_key(|s| s.order);
        stages
    }

    /// 必需工序总时长 (小时)
    ///
    /// 用于在未显式给出预计时长时推导 estimated_duration
    pub fn required_stage_hours(&self) -> f64 {
        let minutes: f64 = self
            .stages
            .iter()
            .filter(|s| s.is_required)
            .map(|s| s.duration_minutes.max(0) as f64)
            .sum();
        minutes / 60.0
    }
}

// ==========================================
// ProcessingStage - 加工工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStage {
    pub id: String,
    pub name: String,
    pub order: u32,             // 工序顺序
    pub duration_minutes: i64,  // 计划时长 (分钟)
    pub status: StageStatus,
    #[serde(default)]
    pub started_at: Option<NaiveDateTime>,

    // ===== 环境目标 =====
    #[serde(default)]
    pub target_temperature_c: Option<f64>,
    #[serde(default)]
    pub target_humidity_pct: Option<f64>,
    #[serde(default)]
    pub sensor_tags: Vec<String>, // IoT 传感器标识

    // ===== 质检 =====
    #[serde(default = "default_true")]
    pub is_required: bool,
    #[serde(default)]
    pub requires_quality_check: bool,
}

fn default_true() -> bool {
    true
}
