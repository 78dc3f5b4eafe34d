// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use retail_ops_core::domain::{
    Material, ProcessingStage, ProductionBatch, ProductionResource, Recipe, RecipeIngredient,
    ReplenishmentRule, ScheduledBatch, StockSnapshot,
};
use retail_ops_core::domain::types::{
    BatchStatus, ResourceType, SchedulePriority, StageStatus,
};

/// 2026-03-02 (周一) 的指定时刻
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day(2026, 3, 2).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// ProductionBatch 构建器
// ==========================================

pub struct BatchBuilder {
    id: String,
    status: BatchStatus,
    stages: Vec<ProcessingStage>,
    ingredients: Vec<RecipeIngredient>,
}

impl BatchBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: BatchStatus::Planned,
            stages: Vec::new(),
            ingredients: Vec::new(),
        }
    }

    pub fn status(mut self, status: BatchStatus) -> Self {
        self.status = status;
        self
    }

    pub fn stage(mut self, name: &str, minutes: i64) -> Self {
        let order = self.stages.len() as u32 + 1;
        self.stages.push(ProcessingStage {
            id: format!("{}-S{}", self.id, order),
            name: name.to_string(),
            order,
            duration_minutes: minutes,
            status: StageStatus::Pending,
            started_at: None,
            target_temperature_c: None,
            target_humidity_pct: None,
            sensor_tags: Vec::new(),
            is_required: true,
            requires_quality_check: false,
        });
        self
    }

    pub fn ingredient(mut self, material_id: &str, quantity: f64) -> Self {
        self.ingredients.push(RecipeIngredient {
            material_id: material_id.to_string(),
            quantity,
            unit: "kg".to_string(),
        });
        self
    }

    pub fn build(self) -> ProductionBatch {
        let recipe = (!self.ingredients.is_empty()).then(|| Recipe {
            id: format!("RCP-{}", self.id),
            name: format!("recipe {}", self.id),
            ingredients: self.ingredients,
        });
        ProductionBatch {
            batch_number: format!("NO-{}", self.id),
            id: self.id,
            recipe,
            planned_quantity: 100.0,
            actual_quantity: None,
            unit: "kg".to_string(),
            status: self.status,
            stages: self.stages,
        }
    }
}

// ==========================================
// ScheduledBatch 构建器
// ==========================================

pub struct ScheduledBuilder {
    batch: ProductionBatch,
    start: NaiveDateTime,
    duration_hours: f64,
    resources: Vec<String>,
    dependencies: Vec<String>,
}

impl ScheduledBuilder {
    pub fn new(id: &str, start: NaiveDateTime, duration_hours: f64) -> Self {
        Self {
            batch: BatchBuilder::new(id).build(),
            start,
            duration_hours,
            resources: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn batch(mut self, batch: ProductionBatch) -> Self {
        self.batch = batch;
        self
    }

    pub fn resource(mut self, resource_id: &str) -> Self {
        self.resources.push(resource_id.to_string());
        self
    }

    pub fn depends_on(mut self, batch_id: &str) -> Self {
        self.dependencies.push(batch_id.to_string());
        self
    }

    pub fn build(self) -> ScheduledBatch {
        let millis = (self.duration_hours * 3_600_000.0) as i64;
        ScheduledBatch {
            batch: self.batch,
            scheduled_start: self.start,
            scheduled_end: self.start + chrono::Duration::milliseconds(millis),
            assigned_resources: self.resources,
            priority: SchedulePriority::Medium,
            dependencies: self.dependencies,
            estimated_duration_hours: self.duration_hours,
            buffer_time_hours: 0.0,
        }
    }
}

// ==========================================
// ProductionResource / Material
// ==========================================

pub fn resource(id: &str) -> ProductionResource {
    ProductionResource {
        id: id.to_string(),
        name: format!("resource {}", id),
        resource_type: ResourceType::Equipment,
        capacity: 1,
        availability: Vec::new(),
        maintenance: Vec::new(),
        skills: Vec::new(),
        location: None,
        daily_capacity_hours: None,
    }
}

pub fn material(id: &str, stock: f64) -> Material {
    Material {
        id: id.to_string(),
        name: format!("material {}", id),
        current_stock: stock,
        unit: "kg".to_string(),
    }
}

// ==========================================
// ReplenishmentRule 构建器
// ==========================================

pub struct RuleBuilder {
    rule: ReplenishmentRule,
}

impl RuleBuilder {
    /// 全局规则: min 10 / max 100 / 补货 50 / 提前期 3 天
    pub fn new(id: &str) -> Self {
        Self {
            rule: ReplenishmentRule {
                id: id.to_string(),
                store_id: None,
                product_id: None,
                min_level: 10.0,
                max_level: 100.0,
                reorder_quantity: 50.0,
                lead_time_days: 3,
                auto_approve: false,
                is_active: true,
            },
        }
    }

    pub fn store(mut self, store_id: &str) -> Self {
        self.rule.store_id = Some(store_id.to_string());
        self
    }

    pub fn product(mut self, product_id: &str) -> Self {
        self.rule.product_id = Some(product_id.to_string());
        self
    }

    pub fn levels(mut self, min: f64, max: f64) -> Self {
        self.rule.min_level = min;
        self.rule.max_level = max;
        self
    }

    pub fn reorder(mut self, quantity: f64) -> Self {
        self.rule.reorder_quantity = quantity;
        self
    }

    pub fn auto_approve(mut self) -> Self {
        self.rule.auto_approve = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.rule.is_active = false;
        self
    }

    pub fn build(self) -> ReplenishmentRule {
        self.rule
    }
}

pub fn stock(product_id: &str, store_id: &str, current: f64) -> StockSnapshot {
    StockSnapshot {
        product_id: product_id.to_string(),
        store_id: store_id.to_string(),
        current_stock: current,
    }
}
