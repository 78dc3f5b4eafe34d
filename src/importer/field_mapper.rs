// ==========================================
// 零售生产与补货核心 - 字段映射器
// ==========================================
// 职责: 原始行记录 → 强类型字段 (支持列名别名)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;

pub struct FieldMapper;

impl FieldMapper {
    /// 列名别名 (英文字段名 / 中文表头)
    fn aliases(key: &str) -> &'static [&'static str] {
        match key {
            "id" => &["id", "rule_id", "规则编号"],
            "store_id" => &["store_id", "storeId", "门店"],
            "product_id" => &["product_id", "productId", "商品"],
            "min_level" => &["min_level", "minLevel", "最低库存"],
            "max_level" => &["max_level", "maxLevel", "最高库存"],
            "reorder_quantity" => &["reorder_quantity", "reorderQuantity", "补货量"],
            "lead_time_days" => &["lead_time_days", "leadTimeDays", "提前期(天)"],
            "auto_approve" => &["auto_approve", "autoApprove", "自动审批"],
            "is_active" => &["is_active", "isActive", "启用"],
            "current_stock" => &["current_stock", "currentStock", "当前库存"],
            _ => &[],
        }
    }

    /// 提取字符串字段 (缺失或空值返回 None)
    pub fn get_string(record: &RawRecord, key: &str) -> Option<String> {
        let aliases = Self::aliases(key);
        if aliases.is_empty() {
            return record.get(key).map(str::to_string);
        }
        aliases
            .iter()
            .find_map(|alias| record.get(alias))
            .map(str::to_string)
    }

    /// 提取必填字符串字段
    pub fn require_string(record: &RawRecord, key: &str) -> ImportResult<String> {
        Self::get_string(record, key).ok_or_else(|| ImportError::MissingField {
            row: record.row_number,
            field: key.to_string(),
        })
    }

    /// 解析必填浮点数
    pub fn require_f64(record: &RawRecord, key: &str) -> ImportResult<f64> {
        let raw = Self::require_string(record, key)?;
        Self::parse_f64(&raw, record.row_number, key)
    }

    /// 解析可选整数
    pub fn optional_i64(record: &RawRecord, key: &str) -> ImportResult<Option<i64>> {
        match Self::get_string(record, key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: record.row_number,
                    field: key.to_string(),
                    message: format!("{} ({})", e, raw),
                }),
        }
    }

    /// 解析可选布尔值
    ///
    /// 接受 true/false, 1/0, Y/N, 是/否
    pub fn optional_bool(record: &RawRecord, key: &str) -> ImportResult<Option<bool>> {
        let Some(raw) = Self::get_string(record, key) else {
            return Ok(None);
        };
        match raw.to_uppercase().as_str() {
            "TRUE" | "1" | "Y" | "YES" | "是" => Ok(Some(true)),
            "FALSE" | "0" | "N" | "NO" | "否" => Ok(Some(false)),
            _ => Err(ImportError::TypeConversionError {
                row: record.row_number,
                field: key.to_string(),
                message: format!("无法识别的布尔值: {}", raw),
            }),
        }
    }

    fn parse_f64(raw: &str, row: usize, field: &str) -> ImportResult<f64> {
        let value = raw
            .parse::<f64>()
            .map_err(|e| ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("{} ({})", e, raw),
            })?;
        if !value.is_finite() {
            return Err(ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("非有限数值: {}", raw),
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row_number: 7,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_alias_lookup() {
        let r = record(&[("门店", "S1"), ("minLevel", "5")]);
        assert_eq!(FieldMapper::get_string(&r, "store_id"), Some("S1".to_string()));
        assert_eq!(FieldMapper::require_f64(&r, "min_level").unwrap(), 5.0);
    }

    #[test]
    fn test_type_error_carries_row() {
        let r = record(&[("min_level", "abc")]);
        let err = FieldMapper::require_f64(&r, "min_level").unwrap_err();
        assert_eq!(err.row(), Some(7));
    }

    #[test]
    fn test_bool_variants() {
        let r = record(&[("auto_approve", "是"), ("is_active", "n")]);
        assert_eq!(FieldMapper::optional_bool(&r, "auto_approve").unwrap(), Some(true));
        assert_eq!(FieldMapper::optional_bool(&r, "is_active").unwrap(), Some(false));
        assert!(FieldMapper::optional_bool(&record(&[("auto_approve", "maybe")]), "auto_approve").is_err());
    }
}
