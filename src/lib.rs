// ==========================================
// 零售生产与补货核心 - 核心库
// ==========================================
// 职责: 生产批次排程 + 冲突检测 + 补货规则评估
// 系统定位: 决策支持 (引擎只给出建议,写操作由外部协作方执行)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据源 - 引擎输入
pub mod datasource;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertPriority, AlertType, BatchStatus, ResourceType, SchedulePriority, StageStatus,
};

// 领域实体
pub use domain::{
    Conflict, Material, ProcessingStage, ProductionBatch, ProductionResource,
    PurchaseOrderRequest, Recipe, ReplenishmentAlert, ReplenishmentRule, ScheduledBatch,
    StockSnapshot,
};

// 引擎
pub use engine::{
    BatchScheduler, ConflictDetector, EngineError, PlanningOrchestrator, ReplenishmentEngine,
    RuleResolver, UtilizationCalculator,
};

// 配置
pub use config::{ConfigManager, EngineConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "零售生产与补货核心";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
