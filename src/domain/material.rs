// ==========================================
// 零售生产与补货核心 - 原料与配方领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Material - 原料库存
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    pub current_stock: f64, // 当前库存
    pub unit: String,
}

// ==========================================
// Recipe - 配方
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

/// 配方原料行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub material_id: String,
    pub quantity: f64, // 所需数量
    pub unit: String,
}
