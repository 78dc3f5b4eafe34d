// ==========================================
// 零售生产与补货核心 - 资源利用率计算
// ==========================================
// 职责: 按资源/日计算占用小时与利用率
// 规则: 利用率 = 当日开工批次预计时长之和 / 每日产能 × 100
// 两个口径:
//   - 原始值 (不截断): 冲突检测使用, > 100 即超负荷信号
//   - 展示值 (截断到 [0, 100]): 进度条使用
// ==========================================

use crate::domain::resource::{ProductionResource, DEFAULT_DAILY_CAPACITY_HOURS};
use crate::domain::schedule::ScheduledBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ResourceLoad - 资源单日负荷视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLoad {
    pub resource_id: String,
    pub date: NaiveDate,
    pub booked_hours: f64,
    pub capacity_hours: f64,
    pub utilization_pct: f64, // 原始值
    pub display_pct: f64,     // 截断值
    pub batch_ids: Vec<String>,
}

impl ResourceLoad {
    pub fn is_overbooked(&self) -> bool {
        self.utilization_pct > 100.0
    }
}

// ==========================================
// UtilizationCalculator - 利用率计算器
// ==========================================
#[derive(Debug, Clone)]
pub struct UtilizationCalculator {
    default_capacity_hours: f64,
}

impl Default for UtilizationCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_CAPACITY_HOURS)
    }
}

impl UtilizationCalculator {
    /// 构造函数
    ///
    /// # 参数
    /// - `default_capacity_hours`: 资源未自声明产能时使用的每日产能
    pub fn new(default_capacity_hours: f64) -> Self {
        Self {
            default_capacity_hours,
        }
    }

    pub fn default_capacity_hours(&self) -> f64 {
        self.default_capacity_hours
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 资源在指定日期的占用小时数
    ///
    /// 只统计 scheduled_start 落在该日的批次,不按跨日拆分
    pub fn booked_hours(
        &self,
        resource_id: &str,
        date: NaiveDate,
        batches: &[ScheduledBatch],
    ) -> f64 {
        batches
            .iter()
            .filter(|b| b.start_date() == date && b.uses_resource(resource_id))
            .map(|b| b.estimated_duration_hours)
            .sum()
    }

    /// 计算原始利用率 (百分比,不截断),使用默认每日产能
    pub fn compute_utilization(
        &self,
        resource_id: &str,
        date: NaiveDate,
        batches: &[ScheduledBatch],
    ) -> f64 {
        self.compute_utilization_with_capacity(
            resource_id,
            date,
            batches,
            self.default_capacity_hours,
        )
    }

    /// 计算原始利用率 (百分比,不截断),使用指定每日产能
    pub fn compute_utilization_with_capacity(
        &self,
        resource_id: &str,
        date: NaiveDate,
        batches: &[ScheduledBatch],
        capacity_hours: f64,
    ) -> f64 {
        if capacity_hours <= 0.0 {
            return 0.0;
        }
        self.booked_hours(resource_id, date, batches) / capacity_hours * 100.0
    }

    /// 计算原始利用率,优先使用资源自声明产能
    pub fn resource_utilization(
        &self,
        resource: &ProductionResource,
        date: NaiveDate,
        batches: &[ScheduledBatch],
    ) -> f64 {
        let capacity = resource.effective_daily_capacity(self.default_capacity_hours);
        self.compute_utilization_with_capacity(&resource.id, date, batches, capacity)
    }

    /// 展示口径: 截断到 [0, 100]
    pub fn display_utilization(raw_pct: f64) -> f64 {
        raw_pct.clamp(0.0, 100.0)
    }

    /// 展示口径利用率,使用默认每日产能
    pub fn compute_display_utilization(
        &self,
        resource_id: &str,
        date: NaiveDate,
        batches: &[ScheduledBatch],
    ) -> f64 {
        Self::display_utilization(self.compute_utilization(resource_id, date, batches))
    }

    // ==========================================
    // 视图
    // ==========================================

    /// 全部资源的单日负荷 (按资源输入顺序)
    pub fn daily_load(
        &self,
        resources: &[ProductionResource],
        batches: &[ScheduledBatch],
        date: NaiveDate,
    ) -> Vec<ResourceLoad> {
        resources
            .iter()
            .map(|resource| {
                let capacity_hours =
                    resource.effective_daily_capacity(self.default_capacity_hours);
                let booked_hours = self.booked_hours(&resource.id, date, batches);
                let utilization_pct = if capacity_hours > 0.0 {
                    booked_hours / capacity_hours * 100.0
                } else {
                    0.0
                };
                let batch_ids = batches
                    .iter()
                    .filter(|b| b.start_date() == date && b.uses_resource(&resource.id))
                    .map(|b| b.id().to_string())
                    .collect();

                ResourceLoad {
                    resource_id: resource.id.clone(),
                    date,
                    booked_hours,
                    capacity_hours,
                    utilization_pct,
                    display_pct: Self::display_utilization(utilization_pct),
                    batch_ids,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::ProductionBatch;
    use crate::domain::types::{BatchStatus, SchedulePriority};
    use chrono::{Duration, NaiveDateTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn scheduled(id: &str, start: NaiveDateTime, hours: f64, resources: &[&str]) -> ScheduledBatch {
        ScheduledBatch {
            batch: ProductionBatch {
                id: id.to_string(),
                batch_number: format!("B-{}", id),
                recipe: None,
                planned_quantity: 10.0,
                actual_quantity: None,
                unit: "kg".to_string(),
                status: BatchStatus::Planned,
                stages: vec![],
            },
            scheduled_start: start,
            scheduled_end: start + Duration::minutes((hours * 60.0) as i64),
            assigned_resources: resources.iter().map(|r| r.to_string()).collect(),
            priority: SchedulePriority::Medium,
            dependencies: vec![],
            estimated_duration_hours: hours,
            buffer_time_hours: 0.0,
        }
    }

    #[test]
    fn test_utilization_raw_and_display() {
        let calc = UtilizationCalculator::default();
        let start = day().and_hms_opt(8, 0, 0).unwrap();
        let batches = vec![
            scheduled("A", start, 5.0, &["OVEN"]),
            scheduled("B", start + Duration::hours(5), 5.0, &["OVEN"]),
        ];

        let raw = calc.compute_utilization("OVEN", day(), &batches);
        assert!((raw - 125.0).abs() < 1e-9);
        assert_eq!(calc.compute_display_utilization("OVEN", day(), &batches), 100.0);
    }

    #[test]
    fn test_utilization_ignores_other_days_and_resources() {
        let calc = UtilizationCalculator::default();
        let start = day().and_hms_opt(8, 0, 0).unwrap();
        let batches = vec![
            scheduled("A", start, 4.0, &["OVEN"]),
            scheduled("B", start + Duration::days(1), 4.0, &["OVEN"]),
            scheduled("C", start, 4.0, &["MIXER"]),
        ];

        assert!((calc.compute_utilization("OVEN", day(), &batches) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_monotonic_when_adding_batch() {
        let calc = UtilizationCalculator::default();
        let start = day().and_hms_opt(6, 0, 0).unwrap();
        let mut batches = Vec::new();
        let mut last = calc.compute_utilization("OVEN", day(), &batches);

        for (i, hours) in [1.5, 0.25, 3.0, 6.0].iter().enumerate() {
            batches.push(scheduled(&format!("X{}", i), start, *hours, &["OVEN"]));
            let now = calc.compute_utilization("OVEN", day(), &batches);
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_zero_capacity_yields_zero() {
        let calc = UtilizationCalculator::default();
        let start = day().and_hms_opt(8, 0, 0).unwrap();
        let batches = vec![scheduled("A", start, 5.0, &["OVEN"])];
        assert_eq!(
            calc.compute_utilization_with_capacity("OVEN", day(), &batches, 0.0),
            0.0
        );
    }
}
