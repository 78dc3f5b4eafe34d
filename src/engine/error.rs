// ==========================================
// 零售生产与补货核心 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仅承载校验错误; 数据质量问题 (缺失依赖/缺失原料/规则并列)
//       不视为错误,由引擎跳过并记录日志
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 排程校验 =====
    #[error("预计时长必须为正: batch_id={batch_id}, estimated_duration_hours={hours}")]
    NonPositiveDuration { batch_id: String, hours: f64 },

    #[error("缓冲时长不能为负: batch_id={batch_id}, buffer_time_hours={hours}")]
    NegativeBufferTime { batch_id: String, hours: f64 },

    #[error("未知资源: {0}")]
    UnknownResource(String),

    #[error("批次已处于终态,不可排程: batch_id={batch_id}, status={status}")]
    TerminalBatch { batch_id: String, status: String },

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("时间计算溢出: batch_id={0}")]
    TimeOverflow(String),

    // ===== 补货规则校验 =====
    #[error("无效的补货规则 (rule_id={rule_id}): {reason}")]
    InvalidRule { rule_id: String, reason: String },

    #[error("告警与规则不匹配: alert_id={alert_id}, rule_id={rule_id}")]
    RuleMismatch { alert_id: String, rule_id: String },

    // ===== 编排 =====
    #[error("门店评估任务失败: store_id={store_id}: {message}")]
    TaskFailed { store_id: String, message: String },
}

/// 引擎层 Result 别名
pub type EngineResult<T> = Result<T, EngineError>;
