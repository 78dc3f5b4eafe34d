// ==========================================
// 零售生产与补货核心 - 补货规则解析
// ==========================================
// 职责: 为 (商品, 门店) 选出适用规则
// 规则: 门店+商品 > 仅门店 > 仅商品 > 全局; 只考虑启用的规则
// 并列: 同一具体程度多条命中时取输入顺序第一条
// ==========================================

use crate::domain::replenishment::ReplenishmentRule;
use crate::engine::error::{EngineError, EngineResult};
use tracing::warn;

pub struct RuleResolver;

impl RuleResolver {
    /// 解析适用规则
    ///
    /// # 返回
    /// - Some(rule): 最具体的启用规则
    /// - None: 无规则覆盖
    pub fn resolve_applicable_rule<'a>(
        product_id: &str,
        store_id: &str,
        rules: &'a [ReplenishmentRule],
    ) -> Option<&'a ReplenishmentRule> {
        let mut best: Option<&ReplenishmentRule> = None;
        let mut tie_count = 0usize;

        for rule in rules
            .iter()
            .filter(|r| r.is_active && r.covers(product_id, store_id))
        {
            match best {
                None => best = Some(rule),
                Some(current) => {
                    let (new_rank, cur_rank) =
                        (rule.scope().specificity(), current.scope().specificity());
                    if new_rank > cur_rank {
                        best = Some(rule);
                        tie_count = 0;
                    } else if new_rank == cur_rank {
                        tie_count += 1;
                    }
                }
            }
        }

        if let Some(rule) = best {
            if tie_count > 0 {
                warn!(
                    product_id = %product_id,
                    store_id = %store_id,
                    rule_id = %rule.id,
                    scope = %rule.scope(),
                    tie_count,
                    "同一作用域存在多条规则,取输入顺序第一条"
                );
            }
        }

        best
    }

    /// 规则取值校验
    ///
    /// - min_level >= 0, max_level >= min_level
    /// - reorder_quantity > 0
    /// - lead_time_days >= 0
    pub fn validate_rule(rule: &ReplenishmentRule) -> EngineResult<()> {
        let invalid = |reason: &str| EngineError::InvalidRule {
            rule_id: rule.id.clone(),
            reason: reason.to_string(),
        };

        if rule.id.trim().is_empty() {
            return Err(invalid("rule id 为空"));
        }
        if !(rule.min_level >= 0.0) {
            return Err(invalid("min_level 必须 >= 0"));
        }
        if !(rule.max_level >= rule.min_level) {
            return Err(invalid("max_level 必须 >= min_level"));
        }
        if !(rule.reorder_quantity > 0.0) {
            return Err(invalid("reorder_quantity 必须 > 0"));
        }
        if rule.lead_time_days < 0 {
            return Err(invalid("lead_time_days 必须 >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, store: Option<&str>, product: Option<&str>, min: f64) -> ReplenishmentRule {
        ReplenishmentRule {
            id: id.to_string(),
            store_id: store.map(|s| s.to_string()),
            product_id: product.map(|s| s.to_string()),
            min_level: min,
            max_level: 100.0,
            reorder_quantity: 30.0,
            lead_time_days: 3,
            auto_approve: false,
            is_active: true,
        }
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let rules = vec![
            rule("G", None, None, 5.0),
            rule("P", None, Some("P1"), 6.0),
            rule("SP", Some("S1"), Some("P1"), 20.0),
            rule("S", Some("S1"), None, 7.0),
        ];

        let hit = RuleResolver::resolve_applicable_rule("P1", "S1", &rules).unwrap();
        assert_eq!(hit.id, "SP");

        let hit = RuleResolver::resolve_applicable_rule("P2", "S1", &rules).unwrap();
        assert_eq!(hit.id, "S");

        let hit = RuleResolver::resolve_applicable_rule("P1", "S2", &rules).unwrap();
        assert_eq!(hit.id, "P");

        let hit = RuleResolver::resolve_applicable_rule("P9", "S9", &rules).unwrap();
        assert_eq!(hit.id, "G");
    }

    #[test]
    fn test_inactive_rules_are_ignored() {
        let mut specific = rule("SP", Some("S1"), Some("P1"), 20.0);
        specific.is_active = false;
        let rules = vec![specific, rule("G", None, None, 5.0)];

        let hit = RuleResolver::resolve_applicable_rule("P1", "S1", &rules).unwrap();
        assert_eq!(hit.id, "G");
    }

    #[test]
    fn test_tie_takes_first_in_input_order() {
        let rules = vec![
            rule("S-first", Some("S1"), None, 5.0),
            rule("S-second", Some("S1"), None, 9.0),
        ];
        let hit = RuleResolver::resolve_applicable_rule("P1", "S1", &rules).unwrap();
        assert_eq!(hit.id, "S-first");
    }

    #[test]
    fn test_no_rule_returns_none() {
        let rules = vec![rule("S", Some("S2"), None, 5.0)];
        assert!(RuleResolver::resolve_applicable_rule("P1", "S1", &rules).is_none());
    }

    #[test]
    fn test_validate_rule() {
        assert!(RuleResolver::validate_rule(&rule("G", None, None, 5.0)).is_ok());

        let mut bad = rule("B", None, None, 50.0);
        bad.max_level = 10.0;
        assert!(RuleResolver::validate_rule(&bad).is_err());

        let mut bad = rule("B", None, None, 5.0);
        bad.reorder_quantity = 0.0;
        assert!(RuleResolver::validate_rule(&bad).is_err());

        let mut bad = rule("B", None, None, 5.0);
        bad.lead_time_days = -1;
        assert!(RuleResolver::validate_rule(&bad).is_err());
    }
}
