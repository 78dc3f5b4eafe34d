// ==========================================
// 零售生产与补货核心 - 补货规则引擎
// ==========================================
// 职责: 库存快照 × 补货规则 → 补货告警
// 输入: 库存快照 + 规则 + 分析侧预打标告警 + now
// 输出: ReplenishmentAlert 列表 (保持快照输入顺序)
// 规则:
//   - 库存 == 0            → OUT_OF_STOCK / CRITICAL
//   - 0 < 库存 < min       → LOW_STOCK, 按缺口分级 CRITICAL / HIGH / MEDIUM
//   - 库存 > max           → OVERSTOCK / LOW
//   - 其余                 → 无告警
// 红线: CRITICAL 告警即使规则开启自动审批也必须人工确认
// ==========================================

use crate::domain::replenishment::{
    PurchaseOrderRequest, ReplenishmentAlert, ReplenishmentRule, StockSnapshot,
};
use crate::domain::types::{AlertPriority, AlertType};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::rule_resolver::RuleResolver;
use crate::i18n::t_with_args;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 低库存分级阈值 (相对 min_level 的比例)
pub const DEFAULT_CRITICAL_RATIO: f64 = 0.25;
pub const DEFAULT_HIGH_RATIO: f64 = 0.5;

// ==========================================
// AlertSummary - 告警汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub open: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub by_type: BTreeMap<String, usize>,
    pub suggested_order_total: f64, // 未处理告警的建议订货量合计
}

// ==========================================
// ReplenishmentEngine - 补货规则引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct ReplenishmentEngine {
    critical_ratio: f64,
    high_ratio: f64,
}

impl Default for ReplenishmentEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CRITICAL_RATIO, DEFAULT_HIGH_RATIO)
    }
}

impl ReplenishmentEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `critical_ratio`: 库存 <= min × critical_ratio 判为 CRITICAL
    /// - `high_ratio`: 库存 <= min × high_ratio 判为 HIGH
    pub fn new(critical_ratio: f64, high_ratio: f64) -> Self {
        Self {
            critical_ratio,
            high_ratio,
        }
    }

    // ==========================================
    // 分类
    // ==========================================

    /// 按规则对库存分类
    ///
    /// 负库存 (超卖) 按缺货处理
    pub fn classify(
        &self,
        current_stock: f64,
        rule: &ReplenishmentRule,
    ) -> Option<(AlertType, AlertPriority)> {
        if current_stock <= 0.0 {
            return Some((AlertType::OutOfStock, AlertPriority::Critical));
        }

        if current_stock < rule.min_level {
            let priority = if current_stock <= rule.min_level * self.critical_ratio {
                AlertPriority::Critical
            } else if current_stock <= rule.min_level * self.high_ratio {
                AlertPriority::High
            } else {
                AlertPriority::Medium
            };
            return Some((AlertType::LowStock, priority));
        }

        if current_stock > rule.max_level {
            return Some((AlertType::Overstock, AlertPriority::Low));
        }

        None
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 评估库存快照
    pub fn evaluate(
        &self,
        snapshots: &[StockSnapshot],
        rules: &[ReplenishmentRule],
        now: NaiveDateTime,
    ) -> Vec<ReplenishmentAlert> {
        self.evaluate_with_tagged(snapshots, rules, &[], now)
    }

    /// 评估库存快照,并透传分析侧预打标告警
    ///
    /// 预打标告警紧跟同一 (商品, 门店) 的阈值告警输出;
    /// 没有对应快照的预打标告警按原顺序追加在末尾
    #[instrument(skip_all, fields(snapshot_count = snapshots.len(), rule_count = rules.len()))]
    pub fn evaluate_with_tagged(
        &self,
        snapshots: &[StockSnapshot],
        rules: &[ReplenishmentRule],
        tagged: &[ReplenishmentAlert],
        now: NaiveDateTime,
    ) -> Vec<ReplenishmentAlert> {
        let evaluated: Vec<Option<ReplenishmentAlert>> = snapshots
            .iter()
            .map(|snapshot| self.evaluate_snapshot(snapshot, rules, now))
            .collect();

        let alerts = Self::merge_tagged(snapshots, evaluated, tagged);
        info!(alert_count = alerts.len(), "补货规则评估完成");
        alerts
    }

    /// 合并逐快照评估结果与预打标告警
    ///
    /// `evaluated` 与 `snapshots` 按下标一一对应; 输出顺序只取决于输入顺序,
    /// 与评估是否并发执行无关
    pub fn merge_tagged(
        snapshots: &[StockSnapshot],
        evaluated: Vec<Option<ReplenishmentAlert>>,
        tagged: &[ReplenishmentAlert],
    ) -> Vec<ReplenishmentAlert> {
        let passthrough: Vec<&ReplenishmentAlert> = tagged
            .iter()
            .filter(|a| {
                if a.alert_type.is_threshold_type() {
                    warn!(
                        alert_id = %a.id,
                        alert_type = %a.alert_type,
                        "预打标告警使用了阈值类型,已忽略"
                    );
                    false
                } else {
                    true
                }
            })
            .collect();
        let mut emitted = vec![false; passthrough.len()];
        let mut alerts = Vec::new();

        for (snapshot, alert) in snapshots.iter().zip(evaluated) {
            if let Some(alert) = alert {
                alerts.push(alert);
            }

            for (idx, tagged_alert) in passthrough.iter().enumerate() {
                if !emitted[idx]
                    && tagged_alert.key() == (snapshot.product_id.as_str(), snapshot.store_id.as_str())
                {
                    alerts.push((*tagged_alert).clone());
                    emitted[idx] = true;
                }
            }
        }

        for (idx, tagged_alert) in passthrough.iter().enumerate() {
            if !emitted[idx] {
                alerts.push((*tagged_alert).clone());
            }
        }

        alerts
    }

    /// 评估单个快照
    pub fn evaluate_snapshot(
        &self,
        snapshot: &StockSnapshot,
        rules: &[ReplenishmentRule],
        now: NaiveDateTime,
    ) -> Option<ReplenishmentAlert> {
        let Some(rule) =
            RuleResolver::resolve_applicable_rule(&snapshot.product_id, &snapshot.store_id, rules)
        else {
            debug!(
                product_id = %snapshot.product_id,
                store_id = %snapshot.store_id,
                "无适用规则,跳过"
            );
            return None;
        };

        let (alert_type, priority) = self.classify(snapshot.current_stock, rule)?;
        let suggested_order = if alert_type.needs_reorder() {
            rule.reorder_quantity
        } else {
            0.0
        };

        debug!(
            product_id = %snapshot.product_id,
            store_id = %snapshot.store_id,
            rule_id = %rule.id,
            alert_type = %alert_type,
            priority = %priority,
            "生成补货告警"
        );

        Some(ReplenishmentAlert {
            id: Self::alert_id(rule, snapshot, now),
            product_id: snapshot.product_id.clone(),
            store_id: snapshot.store_id.clone(),
            alert_type,
            priority,
            current_stock: snapshot.current_stock,
            suggested_order,
            message: Self::render_message(alert_type, snapshot, rule),
            is_resolved: false,
            created_at: now,
            resolved_at: None,
            rule_id: Some(rule.id.clone()),
        })
    }

    /// 告警ID: 由 (规则, 商品, 门店, 库存, now) 派生,相同输入得到相同ID
    fn alert_id(rule: &ReplenishmentRule, snapshot: &StockSnapshot, now: NaiveDateTime) -> String {
        let name = format!(
            "{}|{}|{}|{}|{}",
            rule.id,
            snapshot.product_id,
            snapshot.store_id,
            snapshot.current_stock,
            now.format("%Y-%m-%dT%H:%M:%S%.f")
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    /// 处理告警 (单向: 未处理 → 已处理)
    ///
    /// 已处理的告警原样返回,可安全重试
    pub fn resolve_alert(alert: &ReplenishmentAlert, now: NaiveDateTime) -> ReplenishmentAlert {
        if alert.is_resolved {
            debug!(alert_id = %alert.id, "告警已处理,忽略重复操作");
            return alert.clone();
        }
        ReplenishmentAlert {
            is_resolved: true,
            resolved_at: Some(now),
            ..alert.clone()
        }
    }

    /// 是否允许自动审批
    ///
    /// 规则开启自动审批且启用,并且告警不是 CRITICAL
    pub fn should_auto_approve(alert: &ReplenishmentAlert, rule: &ReplenishmentRule) -> bool {
        rule.auto_approve && rule.is_active && alert.priority != AlertPriority::Critical
    }

    /// 构造采购请求
    ///
    /// # 返回
    /// - Ok(Some): 未处理且需要补货的告警
    /// - Ok(None): 已处理 / 不需要补货 / 建议量为 0
    /// - Err(RuleMismatch): 告警记录的规则与传入规则不一致
    pub fn build_purchase_order(
        alert: &ReplenishmentAlert,
        rule: &ReplenishmentRule,
        now: NaiveDateTime,
    ) -> EngineResult<Option<PurchaseOrderRequest>> {
        if let Some(rule_id) = &alert.rule_id {
            if rule_id != &rule.id {
                return Err(EngineError::RuleMismatch {
                    alert_id: alert.id.clone(),
                    rule_id: rule.id.clone(),
                });
            }
        }

        if alert.is_resolved || !alert.alert_type.needs_reorder() || alert.suggested_order <= 0.0 {
            return Ok(None);
        }

        Ok(Some(PurchaseOrderRequest {
            request_id: Uuid::new_v4().to_string(),
            alert_id: alert.id.clone(),
            rule_id: rule.id.clone(),
            product_id: alert.product_id.clone(),
            store_id: alert.store_id.clone(),
            quantity: alert.suggested_order,
            expected_delivery: now.date() + Duration::days(rule.lead_time_days.max(0)),
            auto_approved: Self::should_auto_approve(alert, rule),
            requested_at: now,
        }))
    }

    /// 告警汇总
    pub fn summarize(alerts: &[ReplenishmentAlert]) -> AlertSummary {
        let mut summary = AlertSummary {
            total: alerts.len(),
            ..AlertSummary::default()
        };

        for alert in alerts {
            *summary
                .by_type
                .entry(alert.alert_type.to_db_str().to_string())
                .or_insert(0) += 1;

            if alert.is_resolved {
                continue;
            }
            summary.open += 1;
            summary.suggested_order_total += alert.suggested_order;
            match alert.priority {
                AlertPriority::Critical => summary.critical += 1,
                AlertPriority::High => summary.high += 1,
                AlertPriority::Medium => summary.medium += 1,
                AlertPriority::Low => summary.low += 1,
            }
        }

        summary
    }

    // ==========================================
    // 可解释性方法
    // ==========================================

    fn render_message(
        alert_type: AlertType,
        snapshot: &StockSnapshot,
        rule: &ReplenishmentRule,
    ) -> String {
        let key = match alert_type {
            AlertType::OutOfStock => "alert.out_of_stock",
            AlertType::LowStock => "alert.low_stock",
            AlertType::Overstock => "alert.overstock",
            AlertType::SeasonalAdjustment => "alert.seasonal_adjustment",
            AlertType::DemandSpike => "alert.demand_spike",
            AlertType::SlowMoving => "alert.slow_moving",
        };
        t_with_args(
            key,
            &[
                ("product", &snapshot.product_id),
                ("store", &snapshot.store_id),
                ("stock", &snapshot.current_stock.to_string()),
                ("min", &rule.min_level.to_string()),
                ("max", &rule.max_level.to_string()),
                ("reorder", &rule.reorder_quantity.to_string()),
            ],
        )
    }
}
