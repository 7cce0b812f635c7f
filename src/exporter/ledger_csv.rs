// ==========================================
// 药品库存再分配系统 - 台账 CSV 导出 / 重新导入
// ==========================================
// 格式: 第一行为版式表头，每条台账行一行，列顺序同 LedgerLayout::headers
// 数值: 最短往返表示，NaN 写为 "NaN"，空白单元格写为空串
// 往返: 重新导入后再次导出，未修改的单元格字节一致
// ==========================================

use crate::domain::ledger::{DemandTrace, Ledger, LedgerCell, LedgerLayout, LedgerRow};
use crate::domain::types::StockState;
use crate::exporter::error::{ExportError, ExportResult};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// 写出台账
pub fn write_ledger<W: Write>(ledger: &Ledger, writer: W) -> ExportResult<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(ledger.layout.headers())?;
    for row in &ledger.rows {
        csv_writer.write_record(row.to_cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// 写出台账到文件
pub fn write_ledger_file<P: AsRef<Path>>(ledger: &Ledger, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_ledger(ledger, file)?;
    info!(path = %path.display(), rows = ledger.len(), "台账已导出为 CSV");
    Ok(())
}

/// 读取已导出的台账
pub fn read_ledger<R: Read>(reader: R) -> ExportResult<Ledger> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let layout = LedgerLayout::detect(&headers)
        .ok_or_else(|| ExportError::HeaderMismatch(headers.join(",")))?;
    let names = layout.headers();

    let mut rows = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        rows.push(parse_row(&record, index, &names)?);
    }

    debug!(layout = ?layout, rows = rows.len(), "台账 CSV 读取完成");
    Ok(Ledger::new(layout, rows))
}

/// 从文件读取已导出的台账
pub fn read_ledger_file<P: AsRef<Path>>(path: P) -> ExportResult<Ledger> {
    let file = File::open(path.as_ref())?;
    read_ledger(file)
}

fn parse_row(record: &StringRecord, index: usize, names: &[&str; 14]) -> ExportResult<LedgerRow> {
    let text = |col: usize| record.get(col).unwrap_or("");

    let invalid = |col: usize| ExportError::InvalidCell {
        row: index + 1,
        column: names[col].to_string(),
        value: text(col).to_string(),
    };
    let number = |col: usize| text(col).parse::<f64>().map_err(|_| invalid(col));
    let cell = |col: usize| LedgerCell::parse(text(col)).ok_or_else(|| invalid(col));

    let state: StockState = text(13).parse().map_err(|_| invalid(13))?;

    Ok(LedgerRow {
        network_id: text(0).to_string(),
        facility_id: text(1).to_string(),
        medication_code: text(2).to_string(),
        medication_name: text(3).to_string(),
        unit_price: number(4)?,
        current_stock: cell(5)?,
        supply: cell(6)?,
        received: cell(7)?,
        final_stock: cell(8)?,
        monetary_total: number(9)?,
        origin_label: text(10).to_string(),
        destination_label: text(11).to_string(),
        availability: number(12)?,
        state,
        original_order_index: index,
        trace: DemandTrace::default(),
    })
}
