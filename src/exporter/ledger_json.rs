// ==========================================
// 药品库存再分配系统 - 台账 JSON 导出
// ==========================================
// 格式: { "layout": ..., "summary": ..., "rows": [...] }
// 说明: "SC" / 空白单元格按字符串输出，NaN 输出为 null
// ==========================================

use crate::domain::ledger::{Ledger, LedgerLayout, LedgerRow, LedgerSummary};
use crate::exporter::error::ExportResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct LedgerDocument<'a> {
    layout: LedgerLayout,
    summary: LedgerSummary,
    rows: &'a [LedgerRow],
}

/// 写出台账（pretty JSON）
pub fn write_ledger<W: Write>(ledger: &Ledger, writer: W) -> ExportResult<()> {
    let document = LedgerDocument {
        layout: ledger.layout,
        summary: ledger.summary(),
        rows: &ledger.rows,
    };
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// 写出台账到文件
pub fn write_ledger_file<P: AsRef<Path>>(ledger: &Ledger, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_ledger(ledger, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), rows = ledger.len(), "台账已导出为 JSON");
    Ok(())
}
