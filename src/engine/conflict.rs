// ==========================================
// 零售生产与补货核心 - 排程冲突检测引擎
// ==========================================
// 职责: 三类冲突检测 (顺序固定,便于结果复现)
//   1. 资源超负荷 (原始利用率 > 100%)
//   2. 依赖违例 (前置批次结束 > 本批次开工)
//   3. 原料短缺 (库存 < 配方用量)
// 红线: 检测仅供参考,不做自动消解
// 数据质量: 缺失的依赖批次 / 缺失的原料直接跳过,不报错
// ==========================================

use crate::domain::material::Material;
use crate::domain::resource::ProductionResource;
use crate::domain::schedule::{Conflict, ScheduledBatch};
use crate::engine::utilization::UtilizationCalculator;
use crate::i18n::t_with_args;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

// ==========================================
// ConflictDetector - 冲突检测引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    utilization: UtilizationCalculator,
}

impl ConflictDetector {
    /// 构造函数
    pub fn new(utilization: UtilizationCalculator) -> Self {
        Self { utilization }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 检测全部冲突
    ///
    /// # 参数
    /// - `batches`: 已排程批次 (输出顺序跟随此顺序)
    /// - `resources`: 资源池 (用于读取资源自声明产能)
    /// - `materials`: 原料库存
    ///
    /// # 返回
    /// 冲突列表: 超负荷 → 依赖违例 → 原料短缺
    #[instrument(skip_all, fields(batch_count = batches.len()))]
    pub fn detect_conflicts(
        &self,
        batches: &[ScheduledBatch],
        resources: &[ProductionResource],
        materials: &[Material],
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        conflicts.extend(self.detect_overbooking(batches, resources));
        conflicts.extend(self.detect_dependency_violations(batches));
        conflicts.extend(self.detect_material_shortages(batches, materials));

        info!(conflict_count = conflicts.len(), "冲突检测完成");
        conflicts
    }

    /// 资源超负荷检测
    ///
    /// 同一 (资源, 日期) 只报告一次,挂在输入顺序中首个占用该资源的批次上
    pub fn detect_overbooking(
        &self,
        batches: &[ScheduledBatch],
        resources: &[ProductionResource],
    ) -> Vec<Conflict> {
        let mut evaluated: HashMap<(&str, NaiveDate), f64> = HashMap::new();
        let mut conflicts = Vec::new();

        for batch in batches {
            let date = batch.start_date();
            for resource_id in &batch.assigned_resources {
                let key = (resource_id.as_str(), date);
                if evaluated.contains_key(&key) {
                    continue;
                }

                let capacity = resources
                    .iter()
                    .find(|r| &r.id == resource_id)
                    .map(|r| r.effective_daily_capacity(self.utilization.default_capacity_hours()))
                    .unwrap_or_else(|| self.utilization.default_capacity_hours());
                let raw = self
                    .utilization
                    .compute_utilization_with_capacity(resource_id, date, batches, capacity);
                evaluated.insert(key, raw);

                if raw > 100.0 {
                    debug!(
                        resource_id = %resource_id,
                        date = %date,
                        utilization = raw,
                        "资源超负荷"
                    );
                    let affected_batch_ids = batches
                        .iter()
                        .filter(|b| b.start_date() == date && b.uses_resource(resource_id))
                        .map(|b| b.id().to_string())
                        .collect();
                    conflicts.push(Conflict::ResourceOverbooked {
                        resource_id: resource_id.clone(),
                        date,
                        batch_id: batch.id().to_string(),
                        utilization_pct: raw,
                        affected_batch_ids,
                    });
                }
            }
        }

        conflicts
    }

    /// 依赖违例检测
    pub fn detect_dependency_violations(&self, batches: &[ScheduledBatch]) -> Vec<Conflict> {
        // 同ID重复出现时以首条为准
        let mut by_id: HashMap<&str, &ScheduledBatch> = HashMap::new();
        for batch in batches {
            by_id.entry(batch.id()).or_insert(batch);
        }

        let mut conflicts = Vec::new();
        for batch in batches {
            for dependency_id in &batch.dependencies {
                let Some(dependency) = by_id.get(dependency_id.as_str()) else {
                    debug!(
                        batch_id = %batch.id(),
                        dependency_id = %dependency_id,
                        "依赖批次不在当前快照中,跳过"
                    );
                    continue;
                };

                if dependency.scheduled_end > batch.scheduled_start {
                    conflicts.push(Conflict::DependencyViolation {
                        batch_id: batch.id().to_string(),
                        dependency_id: dependency_id.clone(),
                        dependency_end: dependency.scheduled_end,
                        batch_start: batch.scheduled_start,
                    });
                }
            }
        }

        conflicts
    }

    /// 原料短缺检测
    ///
    /// 按配方单行用量与当前库存比较,不跨批次累计
    pub fn detect_material_shortages(
        &self,
        batches: &[ScheduledBatch],
        materials: &[Material],
    ) -> Vec<Conflict> {
        let by_id: HashMap<&str, &Material> = materials
            .iter()
            .rev()
            .map(|m| (m.id.as_str(), m))
            .collect();

        let mut conflicts = Vec::new();
        for batch in batches {
            let Some(recipe) = &batch.batch.recipe else {
                continue;
            };

            for ingredient in &recipe.ingredients {
                let Some(material) = by_id.get(ingredient.material_id.as_str()) else {
                    debug!(
                        batch_id = %batch.id(),
                        material_id = %ingredient.material_id,
                        "原料不在当前快照中,跳过"
                    );
                    continue;
                };

                if material.current_stock < ingredient.quantity {
                    conflicts.push(Conflict::MaterialShortage {
                        batch_id: batch.id().to_string(),
                        material_id: material.id.clone(),
                        required: ingredient.quantity,
                        available: material.current_stock,
                    });
                }
            }
        }

        conflicts
    }

    // ==========================================
    // 可解释性方法
    // ==========================================

    /// 生成冲突说明 (按当前语言)
    pub fn describe(conflict: &Conflict) -> String {
        match conflict {
            Conflict::ResourceOverbooked {
                resource_id,
                date,
                utilization_pct,
                ..
            } => t_with_args(
                "conflict.resource_overbooked",
                &[
                    ("resource", resource_id),
                    ("date", &date.to_string()),
                    ("utilization", &format!("{:.1}", utilization_pct)),
                ],
            ),
            Conflict::DependencyViolation {
                batch_id,
                dependency_id,
                ..
            } => t_with_args(
                "conflict.dependency_violation",
                &[("batch", batch_id), ("dependency", dependency_id)],
            ),
            Conflict::MaterialShortage {
                batch_id,
                material_id,
                required,
                available,
            } => t_with_args(
                "conflict.material_shortage",
                &[
                    ("batch", batch_id),
                    ("material", material_id),
                    ("required", &required.to_string()),
                    ("available", &available.to_string()),
                ],
            ),
        }
    }
}
