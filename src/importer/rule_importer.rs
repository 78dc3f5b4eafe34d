// ==========================================
// 零售生产与补货核心 - 补货规则导入
// ==========================================
// 流程: 文件解析 → 字段映射 → 规则校验 → 重复 ID 检查
// 说明: 行级错误不中断导入,汇总到 ImportReport
// 列: id, store_id, product_id, min_level, max_level,
//     reorder_quantity, lead_time_days, auto_approve, is_active
// ==========================================

use crate::domain::replenishment::ReplenishmentRule;
use crate::engine::rule_resolver::RuleResolver;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser, RawRecord};
use crate::importer::ImportReport;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument, warn};

pub struct RuleImporter<P: FileParser = CsvParser> {
    parser: P,
}

impl Default for RuleImporter<CsvParser> {
    fn default() -> Self {
        Self::new(CsvParser)
    }
}

impl<P: FileParser> RuleImporter<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// 从文件导入补货规则
    ///
    /// # 返回
    /// - Ok(ImportReport): 成功行 + 行级错误
    /// - Err: 文件级错误 (不存在 / 格式 / CSV 结构)
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub fn import_from_file<Q: AsRef<Path>>(
        &self,
        path: Q,
    ) -> ImportResult<ImportReport<ReplenishmentRule>> {
        let records = self.parser.parse_to_raw_records(path.as_ref())?;
        let report = Self::map_records(&records);

        info!(
            success = report.success_count(),
            failed = report.fail_count(),
            "补货规则导入完成"
        );
        Ok(report)
    }

    /// 映射并校验行记录
    pub fn map_records(records: &[RawRecord]) -> ImportReport<ReplenishmentRule> {
        let mut report = ImportReport::new(records.len());
        let mut seen_ids = HashSet::new();

        for record in records {
            match Self::map_record(record) {
                Ok(rule) if !seen_ids.insert(rule.id.clone()) => {
                    warn!(row = record.row_number, rule_id = %rule.id, "规则 ID 重复");
                    report.errors.push(ImportError::RuleValidation {
                        row: record.row_number,
                        message: format!("规则 ID 重复: {}", rule.id),
                    });
                }
                Ok(rule) => report.records.push(rule),
                Err(e) => {
                    warn!(row = record.row_number, error = %e, "规则行导入失败");
                    report.errors.push(e);
                }
            }
        }

        report
    }

    fn map_record(record: &RawRecord) -> ImportResult<ReplenishmentRule> {
        let rule = ReplenishmentRule {
            id: FieldMapper::require_string(record, "id")?,
            store_id: FieldMapper::get_string(record, "store_id"),
            product_id: FieldMapper::get_string(record, "product_id"),
            min_level: FieldMapper::require_f64(record, "min_level")?,
            max_level: FieldMapper::require_f64(record, "max_level")?,
            reorder_quantity: FieldMapper::require_f64(record, "reorder_quantity")?,
            lead_time_days: FieldMapper::optional_i64(record, "lead_time_days")?.unwrap_or(0),
            auto_approve: FieldMapper::optional_bool(record, "auto_approve")?.unwrap_or(false),
            is_active: FieldMapper::optional_bool(record, "is_active")?.unwrap_or(true),
        };

        RuleResolver::validate_rule(&rule).map_err(|e| ImportError::RuleValidation {
            row: record.row_number,
            message: e.to_string(),
        })?;

        Ok(rule)
    }
}
