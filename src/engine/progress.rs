// ==========================================
// 零售生产与补货核心 - 工序进度与环境监控
// ==========================================
// 职责: 工序/批次进度计算, 环境读数偏差判定
// 规则: 工序进度 = (now - started_at) / duration, 截断到 100%
// 红线: now 必须由调用方传入,不读取系统时钟
// ==========================================

use crate::domain::batch::{ProcessingStage, ProductionBatch};
use crate::domain::types::StageStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 传感器读数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_tag: String,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentMetric {
    Temperature,
    Humidity,
}

/// 环境偏差
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDeviation {
    pub stage_id: String,
    pub sensor_tag: String,
    pub metric: EnvironmentMetric,
    pub target: f64,
    pub actual: f64,
    pub tolerance: f64,
}

// ==========================================
// ProgressTracker - 进度跟踪
// ==========================================
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    temperature_tolerance_c: f64,
    humidity_tolerance_pct: f64,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(2.0, 5.0)
    }
}

impl ProgressTracker {
    pub fn new(temperature_tolerance_c: f64, humidity_tolerance_pct: f64) -> Self {
        Self {
            temperature_tolerance_c,
            humidity_tolerance_pct,
        }
    }

    /// 工序进度 (0 - 100)
    pub fn stage_progress(&self, stage: &ProcessingStage, now: NaiveDateTime) -> f64 {
        match stage.status {
            StageStatus::Completed => 100.0,
            StageStatus::Pending | StageStatus::Skipped => 0.0,
            StageStatus::InProgress => {
                let Some(started_at) = stage.started_at else {
                    return 0.0;
                };
                if stage.duration_minutes <= 0 {
                    return 100.0;
                }
                let elapsed_secs = (now - started_at).num_seconds().max(0) as f64;
                let planned_secs = stage.duration_minutes as f64 * 60.0;
                (elapsed_secs / planned_secs * 100.0).min(100.0)
            }
        }
    }

    /// 批次整体进度 (0 - 100),按工序时长加权,跳过的工序不计入
    pub fn batch_progress(&self, batch: &ProductionBatch, now: NaiveDateTime) -> f64 {
        let counted: Vec<&ProcessingStage> = batch
            .stages
            .iter()
            .filter(|s| s.status != StageStatus::Skipped)
            .collect();
        if counted.is_empty() {
            return if batch.status.is_terminal() { 100.0 } else { 0.0 };
        }

        let total_minutes: f64 = counted
            .iter()
            .map(|s| s.duration_minutes.max(0) as f64)
            .sum();
        if total_minutes == 0.0 {
            let done = counted
                .iter()
                .filter(|s| s.status == StageStatus::Completed)
                .count();
            return done as f64 / counted.len() as f64 * 100.0;
        }

        let weighted: f64 = counted
            .iter()
            .map(|s| self.stage_progress(s, now) * s.duration_minutes.max(0) as f64)
            .sum();
        weighted / total_minutes
    }

    /// 剩余分钟数 (进行中工序)
    pub fn remaining_minutes(&self, stage: &ProcessingStage, now: NaiveDateTime) -> i64 {
        match (stage.status, stage.started_at) {
            (StageStatus::Completed, _) | (StageStatus::Skipped, _) => 0,
            (StageStatus::InProgress, Some(started_at)) => {
                let elapsed = (now - started_at).num_minutes().max(0);
                stage.duration_minutes.saturating_sub(elapsed).max(0)
            }
            _ => stage.duration_minutes.max(0),
        }
    }

    /// 当前工序 (按 order 第一个进行中的工序)
    pub fn current_stage<'a>(&self, batch: &'a ProductionBatch) -> Option<&'a ProcessingStage> {
        batch
            .ordered_stages()
            .into_iter()
            .find(|s| s.status == StageStatus::InProgress)
    }

    /// 下一工序 (按 order 第一个待开始的工序)
    pub fn next_stage<'a>(&self, batch: &'a ProductionBatch) -> Option<&'a ProcessingStage> {
        batch
            .ordered_stages()
            .into_iter()
            .find(|s| s.status == StageStatus::Pending)
    }

    /// 环境读数与工序目标比较
    ///
    /// 读数的传感器不属于该工序时不做判定; 工序未声明传感器时接受任意读数
    pub fn check_environment(
        &self,
        stage: &ProcessingStage,
        reading: &SensorReading,
    ) -> Vec<EnvironmentDeviation> {
        if !stage.sensor_tags.is_empty() && !stage.sensor_tags.contains(&reading.sensor_tag) {
            return Vec::new();
        }

        let checks = [
            (
                EnvironmentMetric::Temperature,
                stage.target_temperature_c,
                reading.temperature_c,
                self.temperature_tolerance_c,
            ),
            (
                EnvironmentMetric::Humidity,
                stage.target_humidity_pct,
                reading.humidity_pct,
                self.humidity_tolerance_pct,
            ),
        ];

        checks
            .into_iter()
            .filter_map(|(metric, target, actual, tolerance)| {
                let (target, actual) = (target?, actual?);
                ((actual - target).abs() > tolerance).then(|| EnvironmentDeviation {
                    stage_id: stage.id.clone(),
                    sensor_tag: reading.sensor_tag.clone(),
                    metric,
                    target,
                    actual,
                    tolerance,
                })
            })
            .collect()
    }
}
