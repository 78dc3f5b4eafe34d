// ==========================================
// 零售生产与补货核心 - 引擎编排器
// ==========================================
// 用途: 协调排程检查与补货评估的执行顺序
// 流程:
//   排程检查: 冲突检测 → 资源日负荷 → 可用性提示 → 发布冲突复核请求
//   补货评估: 开关检查 → 规则评估 → 汇总 → 采购请求 → 发布采购请求
// 说明: 发布失败只记录日志,不影响计算结果
// ==========================================

use crate::config::EngineConfig;
use crate::domain::material::Material;
use crate::domain::replenishment::{
    PurchaseOrderRequest, ReplenishmentAlert, ReplenishmentRule, StockSnapshot,
};
use crate::domain::resource::ProductionResource;
use crate::domain::schedule::{Conflict, ScheduledBatch};
use crate::engine::conflict::ConflictDetector;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::events::{ActionRequest, OptionalActionPublisher};
use crate::engine::progress::ProgressTracker;
use crate::engine::replenishment::{AlertSummary, ReplenishmentEngine};
use crate::engine::scheduler::{AvailabilityIssue, BatchScheduler, ScheduleRequest, UpsertOutcome};
use crate::engine::utilization::{ResourceLoad, UtilizationCalculator};
use chrono::{NaiveDate, NaiveDateTime};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ScheduleReport - 排程检查结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub conflicts: Vec<Conflict>,
    pub conflict_messages: Vec<String>,
    /// 排程涉及的每一天 × 每个资源 (日期升序,资源按输入顺序)
    pub resource_loads: Vec<ResourceLoad>,
    pub availability_issues: Vec<BatchAvailability>,
}

/// 被拒绝的排程请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRequest {
    pub batch_id: String,
    pub reason: String,
}

/// 单个批次的可用性提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAvailability {
    pub batch_id: String,
    pub issues: Vec<AvailabilityIssue>,
}

// ==========================================
// ReplenishmentReport - 补货评估结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishmentReport {
    /// 补货引擎关闭时为 true,其余字段为空
    pub skipped: bool,
    pub alerts: Vec<ReplenishmentAlert>,
    pub summary: AlertSummary,
    pub auto_approved_orders: Vec<PurchaseOrderRequest>,
    pub pending_orders: Vec<PurchaseOrderRequest>,
}

// ==========================================
// PlanningOrchestrator - 引擎编排器
// ==========================================
pub struct PlanningOrchestrator {
    config: EngineConfig,
    scheduler: BatchScheduler,
    detector: ConflictDetector,
    utilization: UtilizationCalculator,
    replenishment: ReplenishmentEngine,
    progress: ProgressTracker,
    publisher: OptionalActionPublisher,
}

impl PlanningOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 校验后的引擎参数
    /// - publisher: 动作请求发布者 (可为空)
    pub fn new(config: EngineConfig, publisher: OptionalActionPublisher) -> Self {
        let utilization = UtilizationCalculator::new(config.daily_capacity_hours);
        Self {
            scheduler: BatchScheduler::new(config.default_buffer_hours),
            detector: ConflictDetector::new(utilization.clone()),
            replenishment: ReplenishmentEngine::new(
                config.low_stock_critical_ratio,
                config.low_stock_high_ratio,
            ),
            progress: ProgressTracker::new(
                config.temperature_tolerance_c,
                config.humidity_tolerance_pct,
            ),
            utilization,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }

    /// 使用配置容差的进度/环境跟踪器
    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    // ==========================================
    // 排程检查
    // ==========================================

    /// 按顺序处理排程请求并写入排程表
    ///
    /// 单个请求校验失败不影响其他请求
    #[instrument(skip_all, fields(request_count = requests.len()))]
    pub fn apply_schedule_requests(
        &self,
        schedule: &mut Vec<ScheduledBatch>,
        requests: Vec<ScheduleRequest>,
        resources: &[ProductionResource],
        now: Option<NaiveDateTime>,
    ) -> Vec<RejectedRequest> {
        let mut rejected = Vec::new();
        for request in requests {
            let batch_id = request.batch.id.clone();
            match self.scheduler.schedule_batch(request, resources, now) {
                Ok(scheduled) => {
                    let outcome = self.scheduler.upsert(schedule, scheduled);
                    if outcome == UpsertOutcome::Unchanged {
                        debug!(batch_id = %batch_id, "排程未变化");
                    }
                }
                Err(e) => {
                    warn!(batch_id = %batch_id, error = %e, "排程请求被拒绝");
                    rejected.push(RejectedRequest {
                        batch_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        rejected
    }

    #[instrument(skip_all, fields(batch_count = batches.len()))]
    pub fn run_schedule_check(
        &self,
        batches: &[ScheduledBatch],
        resources: &[ProductionResource],
        materials: &[Material],
    ) -> ScheduleReport {
        let conflicts = self.detector.detect_conflicts(batches, resources, materials);
        let conflict_messages = conflicts.iter().map(ConflictDetector::describe).collect();

        let dates: BTreeSet<NaiveDate> = batches.iter().map(|b| b.start_date()).collect();
        let resource_loads = dates
            .into_iter()
            .flat_map(|date| self.utilization.daily_load(resources, batches, date))
            .collect();

        let availability_issues = batches
            .iter()
            .filter_map(|batch| {
                let issues = self.scheduler.check_availability(batch, resources);
                (!issues.is_empty()).then(|| BatchAvailability {
                    batch_id: batch.id().to_string(),
                    issues,
                })
            })
            .collect();

        if !conflicts.is_empty() {
            self.publish(ActionRequest::ReviewConflicts {
                scope: "schedule".to_string(),
                conflicts: conflicts.clone(),
            });
        }

        ScheduleReport {
            conflicts,
            conflict_messages,
            resource_loads,
            availability_issues,
        }
    }

    // ==========================================
    // 补货评估
    // ==========================================

    /// 同步补货评估
    #[instrument(skip_all, fields(snapshot_count = snapshots.len()))]
    pub fn run_replenishment(
        &self,
        snapshots: &[StockSnapshot],
        rules: &[ReplenishmentRule],
        tagged: &[ReplenishmentAlert],
        now: NaiveDateTime,
    ) -> ReplenishmentReport {
        if !self.config.replenishment_enabled {
            info!("补货引擎已关闭,跳过评估");
            return Self::skipped_report();
        }

        let alerts = self
            .replenishment
            .evaluate_with_tagged(snapshots, rules, tagged, now);
        self.finish_replenishment(alerts, rules, now)
    }

    /// 按门店并发评估
    ///
    /// 各门店在独立的阻塞任务中评估,结果按快照下标归位后合并;
    /// 输出与 `run_replenishment` 完全一致
    #[instrument(skip_all, fields(snapshot_count = snapshots.len()))]
    pub async fn evaluate_by_store(
        &self,
        snapshots: Vec<StockSnapshot>,
        rules: Vec<ReplenishmentRule>,
        tagged: Vec<ReplenishmentAlert>,
        now: NaiveDateTime,
    ) -> EngineResult<ReplenishmentReport> {
        if !self.config.replenishment_enabled {
            info!("补货引擎已关闭,跳过评估");
            return Ok(Self::skipped_report());
        }

        // 门店 → 快照下标 (门店按首次出现顺序)
        let mut stores: Vec<(String, Vec<usize>)> = Vec::new();
        for (idx, snapshot) in snapshots.iter().enumerate() {
            match stores.iter_mut().find(|(id, _)| id == &snapshot.store_id) {
                Some((_, indices)) => indices.push(idx),
                None => stores.push((snapshot.store_id.clone(), vec![idx])),
            }
        }
        debug!(store_count = stores.len(), "按门店拆分评估任务");

        let rules = Arc::new(rules);
        let tasks = stores.iter().map(|(_, indices)| {
            let engine = self.replenishment.clone();
            let rules = Arc::clone(&rules);
            let store_snapshots: Vec<(usize, StockSnapshot)> = indices
                .iter()
                .map(|&idx| (idx, snapshots[idx].clone()))
                .collect();
            tokio::task::spawn_blocking(move || {
                store_snapshots
                    .into_iter()
                    .map(|(idx, snapshot)| (idx, engine.evaluate_snapshot(&snapshot, &rules, now)))
                    .collect::<Vec<_>>()
            })
        });

        let results = join_all(tasks).await;

        let mut evaluated: Vec<Option<ReplenishmentAlert>> = vec![None; snapshots.len()];
        for ((store_id, _), result) in stores.iter().zip(results) {
            let store_alerts = result.map_err(|e| EngineError::TaskFailed {
                store_id: store_id.clone(),
                message: e.to_string(),
            })?;
            for (idx, alert) in store_alerts {
                evaluated[idx] = alert;
            }
        }

        let alerts = ReplenishmentEngine::merge_tagged(&snapshots, evaluated, &tagged);
        Ok(self.finish_replenishment(alerts, &rules, now))
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn finish_replenishment(
        &self,
        alerts: Vec<ReplenishmentAlert>,
        rules: &[ReplenishmentRule],
        now: NaiveDateTime,
    ) -> ReplenishmentReport {
        let summary = ReplenishmentEngine::summarize(&alerts);
        let mut auto_approved_orders = Vec::new();
        let mut pending_orders = Vec::new();

        for alert in &alerts {
            let Some(rule_id) = &alert.rule_id else {
                continue;
            };
            let Some(rule) = rules.iter().find(|r| &r.id == rule_id) else {
                warn!(alert_id = %alert.id, rule_id = %rule_id, "告警引用的规则不存在");
                continue;
            };

            match ReplenishmentEngine::build_purchase_order(alert, rule, now) {
                Ok(Some(order)) => {
                    self.publish(ActionRequest::CreatePurchaseOrder(order.clone()));
                    if order.auto_approved {
                        auto_approved_orders.push(order);
                    } else {
                        pending_orders.push(order);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "采购请求构造失败"),
            }
        }

        info!(
            alert_count = alerts.len(),
            auto_approved = auto_approved_orders.len(),
            pending = pending_orders.len(),
            "补货评估完成"
        );

        ReplenishmentReport {
            skipped: false,
            alerts,
            summary,
            auto_approved_orders,
            pending_orders,
        }
    }

    fn skipped_report() -> ReplenishmentReport {
        ReplenishmentReport {
            skipped: true,
            ..ReplenishmentReport::default()
        }
    }

    fn publish(&self, request: ActionRequest) {
        let action = request.as_str().to_string();
        match self.publisher.publish(request) {
            Ok(Some(ticket)) => debug!(action = %action, ticket = %ticket, "动作请求已发布"),
            Ok(None) => {}
            Err(e) => warn!(action = %action, error = %e, "动作请求发布失败"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AlertType;
    use crate::engine::events::CollectingActionPublisher;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn rule(id: &str, store: Option<&str>, auto_approve: bool) -> ReplenishmentRule {
        ReplenishmentRule {
            id: id.to_string(),
            store_id: store.map(str::to_string),
            product_id: None,
            min_level: 10.0,
            max_level: 50.0,
            reorder_quantity: 40.0,
            lead_time_days: 2,
            auto_approve,
            is_active: true,
        }
    }

    fn snapshot(product: &str, store: &str, stock: f64) -> StockSnapshot {
        StockSnapshot {
            product_id: product.to_string(),
            store_id: store.to_string(),
            current_stock: stock,
        }
    }

    #[test]
    fn test_disabled_engine_skips() {
        let config = EngineConfig {
            replenishment_enabled: false,
            ..EngineConfig::default()
        };
        let orchestrator = PlanningOrchestrator::new(config, OptionalActionPublisher::none());
        let report = orchestrator.run_replenishment(
            &[snapshot("P1", "S1", 0.0)],
            &[rule("R1", None, true)],
            &[],
            now(),
        );
        assert!(report.skipped);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_orders_split_by_approval() {
        let publisher = Arc::new(CollectingActionPublisher::new());
        let orchestrator = PlanningOrchestrator::new(
            EngineConfig::default(),
            OptionalActionPublisher::new(publisher.clone()),
        );
        let report = orchestrator.run_replenishment(
            &[snapshot("P1", "S1", 8.0), snapshot("P2", "S1", 0.0)],
            &[rule("R1", None, true)],
            &[],
            now(),
        );

        // 8 < 10 → MEDIUM 可自动审批; 0 → CRITICAL 需人工确认
        assert_eq!(report.auto_approved_orders.len(), 1);
        assert_eq!(report.pending_orders.len(), 1);
        assert_eq!(report.pending_orders[0].product_id, "P2");
        assert_eq!(
            report.auto_approved_orders[0].expected_delivery,
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
        assert_eq!(publisher.drain().len(), 2);
    }

    #[tokio::test]
    async fn test_evaluate_by_store_keeps_input_order() {
        let orchestrator =
            PlanningOrchestrator::new(EngineConfig::default(), OptionalActionPublisher::none());
        let snapshots = vec![
            snapshot("P1", "S2", 0.0),
            snapshot("P1", "S1", 0.0),
            snapshot("P2", "S2", 100.0),
        ];
        let report = orchestrator
            .evaluate_by_store(snapshots, vec![rule("R1", None, false)], vec![], now())
            .await
            .unwrap();

        let keys: Vec<(String, String)> = report
            .alerts
            .iter()
            .map(|a| (a.store_id.clone(), a.product_id.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("S2".to_string(), "P1".to_string()),
                ("S1".to_string(), "P1".to_string()),
                ("S2".to_string(), "P2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_evaluate_by_store_matches_sequential_with_tagged() {
        let orchestrator =
            PlanningOrchestrator::new(EngineConfig::default(), OptionalActionPublisher::none());
        let snapshots = vec![
            snapshot("P1", "S2", 0.0),
            snapshot("P1", "S1", 0.0),
            snapshot("P2", "S2", 0.0),
        ];
        let rules = vec![rule("R1", None, false)];
        let mut spike = ReplenishmentEngine::default()
            .evaluate(&[snapshot("P1", "S2", 0.0)], &rules, now())
            .remove(0);
        spike.id = "T-SPIKE".to_string();
        spike.alert_type = AlertType::DemandSpike;
        spike.rule_id = None;
        // 门店存在但商品没有快照
        let mut no_snapshot = spike.clone();
        no_snapshot.id = "T-NOSNAP".to_string();
        no_snapshot.product_id = "P9".to_string();
        let tagged = vec![no_snapshot, spike];

        let sequential = orchestrator.run_replenishment(&snapshots, &rules, &tagged, now());
        let concurrent = orchestrator
            .evaluate_by_store(snapshots, rules, tagged, now())
            .await
            .unwrap();

        assert_eq!(sequential.alerts, concurrent.alerts);
        let ids: Vec<&str> = concurrent.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids[1], "T-SPIKE");
        assert_eq!(ids[4], "T-NOSNAP");
    }
}
