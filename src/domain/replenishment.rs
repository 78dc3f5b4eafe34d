// ==========================================
// 零售生产与补货核心 - 补货领域模型
// ==========================================
// 职责: 补货规则、库存快照、补货告警、采购请求
// 红线: 告警已处理状态不可回退
// ==========================================

use crate::domain::types::{AlertPriority, AlertType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ReplenishmentRule - 补货规则
// ==========================================
// 作用域: store_id / product_id 均可选,均为空即全局规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishmentRule {
    pub id: String,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,

    // ===== 阈值 =====
    pub min_level: f64,
    pub max_level: f64,
    pub reorder_quantity: f64,
    #[serde(default)]
    pub lead_time_days: i64,

    // ===== 开关 =====
    #[serde(default)]
    pub auto_approve: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ReplenishmentRule {
    /// 规则作用域
    pub fn scope(&self) -> RuleScope {
        match (&self.store_id, &self.product_id) {
            (Some(_), Some(_)) => RuleScope::StoreProduct,
            (Some(_), None) => RuleScope::Store,
            (None, Some(_)) => RuleScope::Product,
            (None, None) => RuleScope::Global,
        }
    }

    /// 规则是否覆盖指定的 (商品, 门店)
    ///
    /// 只看作用域,不看 is_active
    pub fn covers(&self, product_id: &str, store_id: &str) -> bool {
        let store_ok = self.store_id.as_deref().map_or(true, |s| s == store_id);
        let product_ok = self.product_id.as_deref().map_or(true, |p| p == product_id);
        store_ok && product_ok
    }
}

// ==========================================
// RuleScope - 规则作用域
// ==========================================
// 具体程度: StoreProduct > Store > Product > Global
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleScope {
    Global,
    Product,
    Store,
    StoreProduct,
}

impl RuleScope {
    /// 具体程度 (越大越具体)
    pub fn specificity(&self) -> u8 {
        match self {
            RuleScope::Global => 0,
            RuleScope::Product => 1,
            RuleScope::Store => 2,
            RuleScope::StoreProduct => 3,
        }
    }
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleScope::Global => write!(f, "GLOBAL"),
            RuleScope::Product => write!(f, "PRODUCT"),
            RuleScope::Store => write!(f, "STORE"),
            RuleScope::StoreProduct => write!(f, "STORE_PRODUCT"),
        }
    }
}

// ==========================================
// StockSnapshot - 库存快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub product_id: String,
    pub store_id: String,
    pub current_stock: f64,
}

// ==========================================
// ReplenishmentAlert - 补货告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishmentAlert {
    pub id: String,
    pub product_id: String,
    pub store_id: String,
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub current_stock: f64,
    pub suggested_order: f64,
    pub message: String,

    // ===== 生命周期 =====
    #[serde(default)]
    pub is_resolved: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub resolved_at: Option<NaiveDateTime>,

    /// 命中的规则 (分析侧打标的告警可能为空)
    #[serde(default)]
    pub rule_id: Option<String>,
}

impl ReplenishmentAlert {
    /// (商品, 门店) 键
    pub fn key(&self) -> (&str, &str) {
        (&self.product_id, &self.store_id)
    }
}

// ==========================================
// PurchaseOrderRequest - 采购请求
// ==========================================
// 引擎只计算"是否"与"采购什么",落单由外部完成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRequest {
    pub request_id: String,
    pub alert_id: String,
    pub rule_id: String,
    pub product_id: String,
    pub store_id: String,
    pub quantity: f64,
    pub expected_delivery: NaiveDate, // = 请求日 + lead_time_days
    pub auto_approved: bool,
    pub requested_at: NaiveDateTime,
}
