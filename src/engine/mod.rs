// ==========================================
// 零售生产与补货核心 - 引擎层
// ==========================================
// 职责: 排程构造、冲突检测、补货规则评估
// 红线: 引擎为纯计算,不做 I/O; now 由调用方传入
// 红线: 所有检测结果必须可解释 (附带说明文本)
// ==========================================

pub mod calendar_view;
pub mod conflict;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod progress;
pub mod replenishment;
pub mod rule_resolver;
pub mod scheduler;
pub mod utilization;

// 重导出核心引擎
pub use calendar_view::{CalendarView, DayBuckets};
pub use conflict::ConflictDetector;
pub use error::{EngineError, EngineResult};
pub use events::{
    ActionRequest, ActionRequestPublisher, CollectingActionPublisher, NoOpActionPublisher,
    OptionalActionPublisher,
};
pub use orchestrator::{
    BatchAvailability, PlanningOrchestrator, RejectedRequest, ReplenishmentReport, ScheduleReport,
};
pub use progress::{EnvironmentDeviation, EnvironmentMetric, ProgressTracker, SensorReading};
pub use replenishment::{AlertSummary, ReplenishmentEngine};
pub use rule_resolver::RuleResolver;
pub use scheduler::{AvailabilityIssue, BatchScheduler, ScheduleRequest, UpsertOutcome};
pub use utilization::{ResourceLoad, UtilizationCalculator};
