// ==========================================
// 零售生产与补货核心 - 规划数据源
// ==========================================
// 职责: 定义引擎输入的读取接口 (排程 / 资源 / 原料 / 规则 / 库存 / 预打标告警)
// 实现: JsonSnapshotSource (单个 JSON 快照文件,供命令行使用)
// 说明: 引擎本身不做 I/O; 数据源只在编排入口处调用
// ==========================================

use crate::domain::material::Material;
use crate::domain::replenishment::{ReplenishmentAlert, ReplenishmentRule, StockSnapshot};
use crate::domain::resource::ProductionResource;
use crate::domain::schedule::ScheduledBatch;
use crate::engine::scheduler::ScheduleRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ==========================================
// PlanningSnapshot - 规划输入快照
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningSnapshot {
    /// 评估时间; 为空时由调用方提供
    #[serde(default)]
    pub now: Option<NaiveDateTime>,
    #[serde(default)]
    pub schedule: Vec<ScheduledBatch>,
    /// 待排程请求 (按顺序写入排程表)
    #[serde(default)]
    pub schedule_requests: Vec<ScheduleRequest>,
    #[serde(default)]
    pub resources: Vec<ProductionResource>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub rules: Vec<ReplenishmentRule>,
    #[serde(default)]
    pub stock: Vec<StockSnapshot>,
    #[serde(default)]
    pub tagged_alerts: Vec<ReplenishmentAlert>,
}

// ==========================================
// PlanningDataSource Trait
// ==========================================
// 实现者: JsonSnapshotSource; 数据库 / 服务接口由外部协作方实现
#[async_trait]
pub trait PlanningDataSource: Send + Sync {
    async fn load_schedule(&self) -> Result<Vec<ScheduledBatch>>;

    async fn load_schedule_requests(&self) -> Result<Vec<ScheduleRequest>>;

    async fn load_resources(&self) -> Result<Vec<ProductionResource>>;

    async fn load_materials(&self) -> Result<Vec<Material>>;

    async fn load_rules(&self) -> Result<Vec<ReplenishmentRule>>;

    async fn load_stock(&self) -> Result<Vec<StockSnapshot>>;

    async fn load_tagged_alerts(&self) -> Result<Vec<ReplenishmentAlert>>;

    /// 一次性读取全部输入 (各项并发读取)
    async fn load_all(&self) -> Result<PlanningSnapshot> {
        let (schedule, schedule_requests, resources, materials, rules, stock, tagged_alerts) =
            tokio::try_join!(
                self.load_schedule(),
                self.load_schedule_requests(),
                self.load_resources(),
                self.load_materials(),
                self.load_rules(),
                self.load_stock(),
                self.load_tagged_alerts(),
            )?;

        Ok(PlanningSnapshot {
            now: None,
            schedule,
            schedule_requests,
            resources,
            materials,
            rules,
            stock,
            tagged_alerts,
        })
    }
}

// ==========================================
// JsonSnapshotSource - JSON 快照文件数据源
// ==========================================
pub struct JsonSnapshotSource {
    path: PathBuf,
    snapshot: PlanningSnapshot,
}

impl JsonSnapshotSource {
    /// 读取并解析快照文件
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("读取规划快照失败: {}", path.display()))?;
        let snapshot: PlanningSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("解析规划快照失败: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            batches = snapshot.schedule.len(),
            requests = snapshot.schedule_requests.len(),
            stock = snapshot.stock.len(),
            rules = snapshot.rules.len(),
            "规划快照已加载"
        );
        Ok(Self { path, snapshot })
    }

    /// 使用内存中的快照 (测试 / 嵌入调用)
    pub fn from_snapshot(snapshot: PlanningSnapshot) -> Self {
        Self {
            path: PathBuf::new(),
            snapshot,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 快照自带的评估时间
    pub fn now(&self) -> Option<NaiveDateTime> {
        self.snapshot.now
    }
}

#[async_trait]
impl PlanningDataSource for JsonSnapshotSource {
    async fn load_schedule(&self) -> Result<Vec<ScheduledBatch>> {
        Ok(self.snapshot.schedule.clone())
    }

    async fn load_schedule_requests(&self) -> Result<Vec<ScheduleRequest>> {
        Ok(self.snapshot.schedule_requests.clone())
    }

    async fn load_resources(&self) -> Result<Vec<ProductionResource>> {
        Ok(self.snapshot.resources.clone())
    }

    async fn load_materials(&self) -> Result<Vec<Material>> {
        Ok(self.snapshot.materials.clone())
    }

    async fn load_rules(&self) -> Result<Vec<ReplenishmentRule>> {
        Ok(self.snapshot.rules.clone())
    }

    async fn load_stock(&self) -> Result<Vec<StockSnapshot>> {
        Ok(self.snapshot.stock.clone())
    }

    async fn load_tagged_alerts(&self) -> Result<Vec<ReplenishmentAlert>> {
        Ok(self.snapshot.tagged_alerts.clone())
    }

    async fn load_all(&self) -> Result<PlanningSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_open_snapshot_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "now": "2026-03-02T08:00:00",
                "stock": [{{"productId": "P1", "storeId": "S1", "currentStock": 4}}],
                "rules": [{{"id": "R1", "minLevel": 10, "maxLevel": 100, "reorderQuantity": 50}}]
            }}"#
        )
        .unwrap();

        let source = JsonSnapshotSource::open(file.path()).await.unwrap();
        let snapshot = source.load_all().await.unwrap();

        assert!(source.now().is_some());
        assert_eq!(snapshot.stock.len(), 1);
        assert_eq!(snapshot.rules[0].lead_time_days, 0);
        assert!(snapshot.rules[0].is_active);
        assert!(snapshot.schedule.is_empty());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = JsonSnapshotSource::open("/nonexistent/snapshot.json").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_default_load_all_joins_parts() {
        struct Partial;

        #[async_trait]
        impl PlanningDataSource for Partial {
            async fn load_schedule(&self) -> Result<Vec<ScheduledBatch>> {
                Ok(vec![])
            }
            async fn load_schedule_requests(&self) -> Result<Vec<ScheduleRequest>> {
                Ok(vec![])
            }
            async fn load_resources(&self) -> Result<Vec<ProductionResource>> {
                Ok(vec![])
            }
            async fn load_materials(&self) -> Result<Vec<Material>> {
                Ok(vec![])
            }
            async fn load_rules(&self) -> Result<Vec<ReplenishmentRule>> {
                anyhow::bail!("rules unavailable")
            }
            async fn load_stock(&self) -> Result<Vec<StockSnapshot>> {
                Ok(vec![])
            }
            async fn load_tagged_alerts(&self) -> Result<Vec<ReplenishmentAlert>> {
                Ok(vec![])
            }
        }

        let err = Partial.load_all().await.unwrap_err();
        assert!(err.to_string().contains("rules unavailable"));
    }
}
