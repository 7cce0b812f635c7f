// ==========================================
// 药品库存再分配系统 - 导出层
// ==========================================
// 职责: 台账 → CSV / JSON；已导出 CSV 的重新导入
// 说明: CSV 为持久化形式，不写 Excel
// ==========================================

pub mod error;
pub mod format;
pub mod ledger_csv;
pub mod ledger_json;

pub use error::{ExportError, ExportResult};
pub use format::ExportFormat;

use crate::domain::ledger::Ledger;
use std::path::Path;

/// 按格式写出台账文件
pub fn export_ledger<P: AsRef<Path>>(
    ledger: &Ledger,
    path: P,
    format: ExportFormat,
) -> ExportResult<()> {
    match format {
        ExportFormat::Csv => ledger_csv::write_ledger_file(ledger, path),
        ExportFormat::Json => ledger_json::write_ledger_file(ledger, path),
    }
}
