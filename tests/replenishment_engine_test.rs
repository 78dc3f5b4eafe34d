// ==========================================
// 补货规则引擎集成测试
// ==========================================
// 测试目标: 规则解析 → 库存分类 → 告警生命周期 → 采购请求
// 覆盖范围: 分类阈值表 / 规则具体程度 / 处理幂等 / 自动审批约束
// ==========================================

mod test_helpers;

use retail_ops_core::domain::types::{AlertPriority, AlertType};
use retail_ops_core::engine::{ReplenishmentEngine, RuleResolver};
use test_helpers::*;

#[test]
fn test_classification_table_with_min_20() {
    let rule = RuleBuilder::new("R1").levels(20.0, 100.0).build();
    let engine = ReplenishmentEngine::default();

    let cases = [
        (0.0, Some((AlertType::OutOfStock, AlertPriority::Critical))),
        (4.0, Some((AlertType::LowStock, AlertPriority::Critical))),
        (8.0, Some((AlertType::LowStock, AlertPriority::High))),
        (16.0, Some((AlertType::LowStock, AlertPriority::Medium))),
        (20.0, None),
        (60.0, None),
        (100.0, None),
        (101.0, Some((AlertType::Overstock, AlertPriority::Low))),
    ];

    for (current, expected) in cases {
        assert_eq!(engine.classify(current, &rule), expected, "stock={}", current);
    }
}

#[test]
fn test_store_product_rule_beats_global() {
    let rules = vec![
        RuleBuilder::new("GLOBAL").levels(5.0, 100.0).build(),
        RuleBuilder::new("SPECIFIC")
            .store("S1")
            .product("P1")
            .levels(20.0, 100.0)
            .build(),
    ];

    let resolved = RuleResolver::resolve_applicable_rule("P1", "S1", &rules).unwrap();
    assert_eq!(resolved.id, "SPECIFIC");

    // 库存 10: 全局规则下无告警,具体规则下低库存
    let alerts = ReplenishmentEngine::default().evaluate(&[stock("P1", "S1", 10.0)], &rules, at(9, 0));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::LowStock);
    assert_eq!(alerts[0].rule_id.as_deref(), Some("SPECIFIC"));

    // 其他门店只命中全局规则
    let alerts = ReplenishmentEngine::default().evaluate(&[stock("P1", "S2", 10.0)], &rules, at(9, 0));
    assert!(alerts.is_empty());
}

#[test]
fn test_inactive_rule_is_ignored() {
    let rules = vec![
        RuleBuilder::new("GLOBAL").levels(5.0, 100.0).build(),
        RuleBuilder::new("OFF").store("S1").levels(50.0, 100.0).inactive().build(),
    ];

    let resolved = RuleResolver::resolve_applicable_rule("P1", "S1", &rules).unwrap();
    assert_eq!(resolved.id, "GLOBAL");
}

#[test]
fn test_no_rule_means_no_alert() {
    let rules = vec![RuleBuilder::new("R-S9").store("S9").build()];
    let alerts =
        ReplenishmentEngine::default().evaluate(&[stock("P1", "S1", 0.0)], &rules, at(9, 0));
    assert!(alerts.is_empty());
}

#[test]
fn test_resolve_alert_twice_is_idempotent() {
    let rules = vec![RuleBuilder::new("R1").build()];
    let alerts =
        ReplenishmentEngine::default().evaluate(&[stock("P1", "S1", 3.0)], &rules, at(9, 0));
    let alert = &alerts[0];

    let once = ReplenishmentEngine::resolve_alert(alert, at(10, 0));
    let twice = ReplenishmentEngine::resolve_alert(&once, at(11, 0));

    assert!(once.is_resolved);
    assert_eq!(once.resolved_at, Some(at(10, 0)));
    assert_eq!(once, twice);
}

#[test]
fn test_critical_alert_never_auto_approved() {
    let rule = RuleBuilder::new("R1").levels(20.0, 100.0).auto_approve().build();
    let engine = ReplenishmentEngine::default();

    let critical = engine
        .evaluate_snapshot(&stock("P1", "S1", 0.0), std::slice::from_ref(&rule), at(9, 0))
        .unwrap();
    let medium = engine
        .evaluate_snapshot(&stock("P1", "S1", 16.0), std::slice::from_ref(&rule), at(9, 0))
        .unwrap();

    assert_eq!(critical.priority, AlertPriority::Critical);
    assert!(!ReplenishmentEngine::should_auto_approve(&critical, &rule));
    assert!(ReplenishmentEngine::should_auto_approve(&medium, &rule));
}

#[test]
fn test_purchase_order_for_low_stock() {
    let rule = RuleBuilder::new("R1").reorder(75.0).build();
    let alert = ReplenishmentEngine::default()
        .evaluate_snapshot(&stock("P1", "S1", 2.0), std::slice::from_ref(&rule), at(9, 0))
        .unwrap();

    let order = ReplenishmentEngine::build_purchase_order(&alert, &rule, at(9, 0))
        .unwrap()
        .unwrap();

    assert_eq!(order.quantity, 75.0);
    assert_eq!(order.alert_id, alert.id);
    assert_eq!(order.expected_delivery, day(2026, 3, 5));
    assert!(!order.auto_approved);

    // 已处理的告警不再生成采购请求
    let resolved = ReplenishmentEngine::resolve_alert(&alert, at(10, 0));
    assert!(ReplenishmentEngine::build_purchase_order(&resolved, &rule, at(10, 0))
        .unwrap()
        .is_none());
}

#[test]
fn test_overstock_has_no_suggested_order() {
    let rules = vec![RuleBuilder::new("R1").build()];
    let alerts =
        ReplenishmentEngine::default().evaluate(&[stock("P1", "S1", 150.0)], &rules, at(9, 0));

    assert_eq!(alerts[0].alert_type, AlertType::Overstock);
    assert_eq!(alerts[0].suggested_order, 0.0);
}

#[test]
fn test_summary_counts_open_alerts() {
    let rules = vec![RuleBuilder::new("R1").levels(20.0, 100.0).build()];
    let mut alerts = ReplenishmentEngine::default().evaluate(
        &[
            stock("P1", "S1", 0.0),
            stock("P2", "S1", 8.0),
            stock("P3", "S1", 200.0),
        ],
        &rules,
        at(9, 0),
    );
    alerts[1] = ReplenishmentEngine::resolve_alert(&alerts[1], at(10, 0));

    let summary = ReplenishmentEngine::summarize(&alerts);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.open, 2);
    assert_eq!(summary.critical, 1);
    assert_eq!(summary.high, 0);
    assert_eq!(summary.low, 1);
    assert_eq!(summary.suggested_order_total, 50.0);
    assert_eq!(summary.by_type.get("LOW_STOCK"), Some(&1));
}
