// ==========================================
// 零售生产与补货核心 - 批次排程引擎
// ==========================================
// 职责: 纯构造 ScheduledBatch,不做搜索优化
// 规则: scheduled_end = start + estimated_duration + buffer_time
// 校验: 时长必须为正 / 资源必须存在 / 终态批次不可排程
// 说明: 允许过去的开工时间 (补录历史排程),仅记录告警日志
// ==========================================

use crate::domain::batch::ProductionBatch;
use crate::domain::resource::{ProductionResource, TimeWindow};
use crate::domain::schedule::ScheduledBatch;
use crate::domain::types::{BatchStatus, SchedulePriority};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ==========================================
// ScheduleRequest - 排程请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub batch: ProductionBatch,
    pub start: NaiveDateTime,
    pub resource_ids: Vec<String>,
    #[serde(default)]
    pub priority: SchedulePriority,
    /// 缓冲时长 (小时); None 时使用引擎默认值
    #[serde(default)]
    pub buffer_time_hours: Option<f64>,
    /// 预计时长 (小时); None 时按必需工序时长推导
    #[serde(default)]
    pub estimated_duration_hours: Option<f64>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ScheduleRequest {
    pub fn new(batch: ProductionBatch, start: NaiveDateTime, resource_ids: Vec<String>) -> Self {
        Self {
            batch,
            start,
            resource_ids,
            priority: SchedulePriority::default(),
            buffer_time_hours: None,
            estimated_duration_hours: None,
            dependencies: Vec::new(),
        }
    }

    pub fn priority(mut self, priority: SchedulePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn buffer_hours(mut self, hours: f64) -> Self {
        self.buffer_time_hours = Some(hours);
        self
    }

    pub fn duration_hours(mut self, hours: f64) -> Self {
        self.estimated_duration_hours = Some(hours);
        self
    }

    pub fn depends_on(mut self, batch_id: &str) -> Self {
        self.dependencies.push(batch_id.to_string());
        self
    }
}

/// 写入排程表的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
    Unchanged, // 重复排程同一时段,视为空操作
}

/// 资源可用性问题 (提示性,不阻断排程)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityIssue {
    #[serde(rename_all = "camelCase")]
    OutsideAvailability { resource_id: String },
    #[serde(rename_all = "camelCase")]
    DuringMaintenance {
        resource_id: String,
        window: TimeWindow,
    },
}

// ==========================================
// BatchScheduler - 批次排程引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BatchScheduler {
    default_buffer_hours: f64,
}

impl BatchScheduler {
    /// 构造函数
    ///
    /// # 参数
    /// - `default_buffer_hours`: 请求未指定缓冲时长时使用
    pub fn new(default_buffer_hours: f64) -> Self {
        Self {
            default_buffer_hours,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 排程单个批次
    ///
    /// # 参数
    /// - `request`: 排程请求
    /// - `resources`: 可用资源池 (只读)
    /// - `now`: 当前时间; 提供时对过去的开工时间记录告警
    ///
    /// # 返回
    /// - Ok(ScheduledBatch)
    /// - Err(EngineError): 校验失败,无部分输出
    pub fn schedule_batch(
        &self,
        request: ScheduleRequest,
        resources: &[ProductionResource],
        now: Option<NaiveDateTime>,
    ) -> EngineResult<ScheduledBatch> {
        let ScheduleRequest {
            batch,
            start,
            resource_ids,
            priority,
            buffer_time_hours,
            estimated_duration_hours,
            dependencies,
        } = request;

        // 1. 终态批次不可排程
        if batch.status.is_terminal() {
            return Err(EngineError::TerminalBatch {
                batch_id: batch.id.clone(),
                status: batch.status.to_string(),
            });
        }

        // 2. 时长校验 (NaN 同样拒绝)
        let duration_hours =
            estimated_duration_hours.unwrap_or_else(|| batch.required_stage_hours());
        if !(duration_hours > 0.0) {
            return Err(EngineError::NonPositiveDuration {
                batch_id: batch.id.clone(),
                hours: duration_hours,
            });
        }

        let buffer_hours = buffer_time_hours.unwrap_or(self.default_buffer_hours);
        if !(buffer_hours >= 0.0) {
            return Err(EngineError::NegativeBufferTime {
                batch_id: batch.id.clone(),
                hours: buffer_hours,
            });
        }

        // 3. 资源校验 + 去重 (保持输入顺序)
        let mut assigned: Vec<String> = Vec::with_capacity(resource_ids.len());
        for resource_id in resource_ids {
            if !resources.iter().any(|r| r.id == resource_id) {
                return Err(EngineError::UnknownResource(resource_id));
            }
            if !assigned.contains(&resource_id) {
                assigned.push(resource_id);
            }
        }

        // 4. 依赖去重,剔除自依赖
        let mut deps: Vec<String> = Vec::with_capacity(dependencies.len());
        for dep in dependencies {
            if dep == batch.id {
                warn!(batch_id = %batch.id, "批次依赖自身,已忽略");
                continue;
            }
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        // 5. 计算结束时间
        let total = hours_to_duration(duration_hours + buffer_hours)
            .ok_or_else(|| EngineError::TimeOverflow(batch.id.clone()))?;
        let end = start
            .checked_add_signed(total)
            .ok_or_else(|| EngineError::TimeOverflow(batch.id.clone()))?;

        // 毫秒取整后时段必须严格为正
        if end <= start {
            return Err(EngineError::NonPositiveDuration {
                batch_id: batch.id.clone(),
                hours: duration_hours,
            });
        }

        if let Some(now) = now {
            if start < now {
                warn!(
                    batch_id = %batch.id,
                    start = %start,
                    now = %now,
                    "开工时间早于当前时间,按补录处理"
                );
            }
        }

        debug!(
            batch_id = %batch.id,
            start = %start,
            end = %end,
            resources = ?assigned,
            "批次排程完成"
        );

        Ok(ScheduledBatch {
            batch,
            scheduled_start: start,
            scheduled_end: end,
            assigned_resources: assigned,
            priority,
            dependencies: deps,
            estimated_duration_hours: duration_hours,
            buffer_time_hours: buffer_hours,
        })
    }

    /// 写入排程表 (按批次ID覆盖)
    ///
    /// 已存在且时段完全一致时不做修改
    pub fn upsert(&self, schedule: &mut Vec<ScheduledBatch>, item: ScheduledBatch) -> UpsertOutcome {
        match schedule.iter_mut().find(|s| s.id() == item.id()) {
            Some(existing) if existing.same_slot_as(&item) => UpsertOutcome::Unchanged,
            Some(existing) => {
                *existing = item;
                UpsertOutcome::Replaced
            }
            None => {
                schedule.push(item);
                UpsertOutcome::Inserted
            }
        }
    }

    /// 变更批次状态
    pub fn transition_status(
        &self,
        batch: &mut ProductionBatch,
        next: BatchStatus,
    ) -> EngineResult<()> {
        if batch.status == next {
            return Ok(());
        }
        if !batch.status.can_transition_to(next) {
            return Err(EngineError::InvalidStateTransition {
                from: batch.status.to_string(),
                to: next.to_string(),
            });
        }
        batch.status = next;
        Ok(())
    }

    /// 检查排程时段是否落在资源可用窗口内、且避开维护窗口
    ///
    /// 资源未声明可用窗口时视为全天可用
    pub fn check_availability(
        &self,
        scheduled: &ScheduledBatch,
        resources: &[ProductionResource],
    ) -> Vec<AvailabilityIssue> {
        let (start, end) = (scheduled.scheduled_start, scheduled.scheduled_end);
        let mut issues = Vec::new();

        for resource_id in &scheduled.assigned_resources {
            let Some(resource) = resources.iter().find(|r| &r.id == resource_id) else {
                continue;
            };

            if !resource.availability.is_empty()
                && !resource.availability.iter().any(|w| w.contains(start, end))
            {
                issues.push(AvailabilityIssue::OutsideAvailability {
                    resource_id: resource_id.clone(),
                });
            }

            for window in resource.maintenance.iter().filter(|w| w.overlaps(start, end)) {
                issues.push(AvailabilityIssue::DuringMaintenance {
                    resource_id: resource_id.clone(),
                    window: *window,
                });
            }
        }

        issues
    }
}

/// 小时数转换为 chrono::Duration (毫秒精度)
fn hours_to_duration(hours: f64) -> Option<Duration> {
    let millis = (hours * 3_600_000.0).round();
    if !millis.is_finite() || millis > i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}
