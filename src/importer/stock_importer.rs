// ==========================================
// 零售生产与补货核心 - 库存快照导入
// ==========================================
// 列: product_id, store_id, current_stock
// 说明: 负库存 (超卖) 原样保留,由补货引擎按缺货处理
// ==========================================

use crate::domain::replenishment::StockSnapshot;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser, RawRecord};
use crate::importer::ImportReport;
use std::path::Path;
use tracing::{info, instrument, warn};

pub struct StockImporter<P: FileParser = CsvParser> {
    parser: P,
}

impl Default for StockImporter<CsvParser> {
    fn default() -> Self {
        Self::new(CsvParser)
    }
}

impl<P: FileParser> StockImporter<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub fn import_from_file<Q: AsRef<Path>>(
        &self,
        path: Q,
    ) -> ImportResult<ImportReport<StockSnapshot>> {
        let records = self.parser.parse_to_raw_records(path.as_ref())?;
        let report = Self::map_records(&records);

        info!(
            success = report.success_count(),
            failed = report.fail_count(),
            "库存快照导入完成"
        );
        Ok(report)
    }

    pub fn map_records(records: &[RawRecord]) -> ImportReport<StockSnapshot> {
        let mut report = ImportReport::new(records.len());
        for record in records {
            match Self::map_record(record) {
                Ok(snapshot) => {
                    if snapshot.current_stock < 0.0 {
                        warn!(
                            row = record.row_number,
                            product_id = %snapshot.product_id,
                            store_id = %snapshot.store_id,
                            "负库存"
                        );
                    }
                    report.records.push(snapshot);
                }
                Err(e) => {
                    warn!(row = record.row_number, error = %e, "库存行导入失败");
                    report.errors.push(e);
                }
            }
        }
        report
    }

    fn map_record(record: &RawRecord) -> ImportResult<StockSnapshot> {
        Ok(StockSnapshot {
            product_id: FieldMapper::require_string(record, "product_id")?,
            store_id: FieldMapper::require_string(record, "store_id")?,
            current_stock: FieldMapper::require_f64(record, "current_stock")?,
        })
    }
}
