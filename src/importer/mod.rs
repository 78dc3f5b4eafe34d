// ==========================================
// 零售生产与补货核心 - 导入层
// ==========================================
// 职责: 外部 CSV 数据导入 (补货规则 / 库存快照)
// 说明: 文件级错误直接返回; 行级错误收集后继续
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod rule_importer;
pub mod stock_importer;

pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, FileParser, RawRecord};
pub use rule_importer::RuleImporter;
pub use stock_importer::StockImporter;

/// 导入结果
#[derive(Debug, Default)]
pub struct ImportReport<T> {
    pub total_rows: usize,
    pub records: Vec<T>,
    pub errors: Vec<ImportError>,
}

impl<T> ImportReport<T> {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    pub fn fail_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
