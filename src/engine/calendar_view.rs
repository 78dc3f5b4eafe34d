// ==========================================
// 零售生产与补货核心 - 排程日历视图
// ==========================================
// 职责: 按 scheduled_start 所在日期对排程批次归组 (日/周/月)
// 说明: 纯投影,无独立状态; 同日内保持输入顺序
// ==========================================

use crate::domain::schedule::ScheduledBatch;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// 按日期归组后的视图
pub type DayBuckets<'a> = BTreeMap<NaiveDate, Vec<&'a ScheduledBatch>>;

pub struct CalendarView;

impl CalendarView {
    /// 日视图
    pub fn day(batches: &[ScheduledBatch], date: NaiveDate) -> Vec<&ScheduledBatch> {
        batches.iter().filter(|b| b.start_date() == date).collect()
    }

    /// 周视图 (周一为一周起始)
    ///
    /// 返回一周 7 天,无批次的日期为空列表
    pub fn week(batches: &[ScheduledBatch], any_day: NaiveDate) -> DayBuckets<'_> {
        let monday = Self::week_start(any_day);
        let days = (0..7).map(|offset| monday + Duration::days(offset));
        Self::bucket(batches, days)
    }

    /// 月视图
    ///
    /// 返回当月全部日期; 无效的年月返回空视图
    pub fn month(batches: &[ScheduledBatch], year: i32, month: u32) -> DayBuckets<'_> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return BTreeMap::new();
        };
        let days = first
            .iter_days()
            .take_while(|d| d.month() == month && d.year() == year);
        Self::bucket(batches, days)
    }

    /// 所在周的周一
    pub fn week_start(date: NaiveDate) -> NaiveDate {
        date - Duration::days(date.weekday().num_days_from_monday() as i64)
    }

    fn bucket(
        batches: &[ScheduledBatch],
        days: impl Iterator<Item = NaiveDate>,
    ) -> DayBuckets<'_> {
        let mut buckets: DayBuckets<'_> = days.map(|d| (d, Vec::new())).collect();
        for batch in batches {
            if let Some(bucket) = buckets.get_mut(&batch.start_date()) {
                bucket.push(batch);
            }
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::ProductionBatch;
    use crate::domain::types::{BatchStatus, SchedulePriority};

    fn scheduled(id: &str, date: NaiveDate, hour: u32) -> ScheduledBatch {
        let start = date.and_hms_opt(hour, 0, 0).unwrap();
        ScheduledBatch {
            batch: ProductionBatch {
                id: id.to_string(),
                batch_number: id.to_string(),
                recipe: None,
                planned_quantity: 1.0,
                actual_quantity: None,
                unit: "pcs".to_string(),
                status: BatchStatus::Planned,
                stages: vec![],
            },
            scheduled_start: start,
            scheduled_end: start + Duration::hours(1),
            assigned_resources: vec![],
            priority: SchedulePriority::Low,
            dependencies: vec![],
            estimated_duration_hours: 1.0,
            buffer_time_hours: 0.0,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_day_view_keeps_input_order() {
        let batches = vec![scheduled("B", d(4), 14), scheduled("A", d(4), 8), scheduled("C", d(5), 8)];
        let ids: Vec<&str> = CalendarView::day(&batches, d(4)).iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_week_view_starts_monday() {
        // 2026-03-04 是周三
        let batches = vec![scheduled("A", d(2), 8), scheduled("B", d(8), 8), scheduled("C", d(9), 8)];
        let week = CalendarView::week(&batches, d(4));

        assert_eq!(week.len(), 7);
        assert_eq!(*week.keys().next().unwrap(), d(2));
        assert_eq!(week[&d(2)].len(), 1);
        assert_eq!(week[&d(8)].len(), 1);
        assert!(!week.contains_key(&d(9)));
    }

    #[test]
    fn test_month_view_covers_all_days() {
        let batches = vec![scheduled("A", d(31), 8)];
        let month = CalendarView::month(&batches, 2026, 3);
        assert_eq!(month.len(), 31);
        assert_eq!(month[&d(31)].len(), 1);
        assert!(CalendarView::month(&batches, 2026, 13).is_empty());
    }
}
