// ==========================================
// 零售生产与补货核心 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含引擎逻辑,所有实体由外部协作方提供并回传
// ==========================================

pub mod batch;
pub mod material;
pub mod replenishment;
pub mod resource;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use batch::{ProcessingStage, ProductionBatch};
pub use material::{Material, Recipe, RecipeIngredient};
pub use replenishment::{
    PurchaseOrderRequest, ReplenishmentAlert, ReplenishmentRule, RuleScope, StockSnapshot,
};
pub use resource::{ProductionResource, TimeWindow, DEFAULT_DAILY_CAPACITY_HOURS};
pub use schedule::{Conflict, ScheduledBatch};
pub use types::{
    AlertPriority, AlertType, BatchStatus, ResourceType, SchedulePriority, StageStatus,
};
