// ==========================================
// 零售生产与补货核心 - 引擎层动作请求发布
// ==========================================
// 职责: 定义动作请求发布 trait,实现依赖倒置
// 说明: 引擎只计算"是否"与"做什么",由外部协作方执行写操作
//       (落采购单 / 持久化排程 / 推送冲突提示)
// ==========================================

use crate::domain::replenishment::PurchaseOrderRequest;
use crate::domain::schedule::Conflict;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 动作请求类型
// ==========================================

/// 引擎向外部请求执行的动作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionRequest {
    /// 创建采购单 (auto_approved=false 时需要人工确认)
    CreatePurchaseOrder(PurchaseOrderRequest),
    /// 通知操作员处理排程冲突
    ReviewConflicts {
        scope: String,
        conflicts: Vec<Conflict>,
    },
}

impl ActionRequest {
    /// 字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            ActionRequest::CreatePurchaseOrder(_) => "CreatePurchaseOrder",
            ActionRequest::ReviewConflicts { .. } => "ReviewConflicts",
        }
    }
}

// ==========================================
// 发布 Trait
// ==========================================

/// 动作请求发布者
///
/// # 实现说明
/// - 由外部协作方实现 (消息队列 / 数据库待办表 / 通知服务)
/// - 发布失败不影响引擎计算结果,调用方记录日志即可
pub trait ActionRequestPublisher: Send + Sync {
    /// 发布动作请求
    ///
    /// # 返回
    /// - `Ok(ticket)`: 外部系统返回的受理编号 (不支持时为空字符串)
    /// - `Err`: 发布失败
    fn publish(&self, request: ActionRequest) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作发布者
///
/// 用于不需要对外发布的场景 (如命令行试算、单元测试)
#[derive(Debug, Clone, Default)]
pub struct NoOpActionPublisher;

impl ActionRequestPublisher for NoOpActionPublisher {
    fn publish(&self, request: ActionRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(action = request.as_str(), "NoOpActionPublisher: 跳过动作发布");
        Ok(String::new())
    }
}

/// 内存收集发布者
///
/// 将请求按顺序收集在内存中,供调用方在计算结束后统一处理
#[derive(Debug, Default)]
pub struct CollectingActionPublisher {
    requests: Mutex<Vec<ActionRequest>>,
}

impl CollectingActionPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出已收集的请求
    pub fn drain(&self) -> Vec<ActionRequest> {
        let mut guard = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *guard)
    }
}

impl ActionRequestPublisher for CollectingActionPublisher {
    fn publish(&self, request: ActionRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
        let mut guard = self
            .requests
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        guard.push(request);
        Ok(guard.len().to_string())
    }
}

/// 可选的发布者包装
///
/// 简化 Option<Arc<dyn ActionRequestPublisher>> 的使用
#[derive(Clone, Default)]
pub struct OptionalActionPublisher {
    inner: Option<Arc<dyn ActionRequestPublisher>>,
}

impl OptionalActionPublisher {
    pub fn new(publisher: Arc<dyn ActionRequestPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_some(&self) -> bool {
        self.inner.is_some()
    }

    /// 发布请求; 未配置发布者时返回 Ok(None)
    pub fn publish(
        &self,
        request: ActionRequest,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(request).map(Some),
            None => Ok(None),
        }
    }
}
