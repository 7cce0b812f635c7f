// ==========================================
// 药品库存再分配系统 - 库存导入器
// ==========================================
// 导入流程:
//   1. 文件读取与解析（第一个工作表，表头转小写）
//   2. 结构校验: 必需列缺失 → MissingColumns（列出全部缺失列）
//   3. 月份列识别（财政年度顺序，septiembre 视为 setiembre）
//   4. 字段映射与数值强制转换
// 附加列只记录日志，不拒绝
// ==========================================

use crate::domain::inventory::{columns, InventoryTable};
use crate::domain::types::Month;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{CoercionAnomaly, FieldMapper as FieldMapperTrait, RawSheet};
use std::path::Path;
use tracing::{debug, info, warn};

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub table: InventoryTable,
    /// 既非必需列也非月份列的附加列
    pub extra_columns: Vec<String>,
    pub coercion_anomalies: Vec<CoercionAnomaly>,
}

impl ImportOutcome {
    pub fn months(&self) -> Vec<Month> {
        self.table.months()
    }
}

pub struct InventoryImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl InventoryImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
        }
    }

    /// 从文件导入（.csv / .xlsx / .xls）
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportOutcome> {
        let path = file_path.as_ref();
        info!(path = %path.display(), "开始导入库存文件");

        let sheet = self.parser.parse(path)?;
        self.import_sheet(sheet)
    }

    /// 从已解析的原始表导入
    pub fn import_sheet(&self, sheet: RawSheet) -> ImportResult<ImportOutcome> {
        let missing: Vec<String> = columns::REQUIRED
            .iter()
            .filter(|c| !sheet.headers.iter().any(|h| h == *c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            warn!(missing = ?missing, "库存文件缺少必需列");
            return Err(ImportError::MissingColumns(missing));
        }

        let month_columns = Self::month_columns(&sheet.headers);
        if month_columns.is_empty() {
            warn!("库存文件没有月份列");
        }

        let mut records = Vec::with_capacity(sheet.rows.len());
        let mut anomalies = Vec::new();
        for (row_index, row) in sheet.rows.iter().enumerate() {
            let (record, row_anomalies) = self.mapper.map_row(row, &month_columns, row_index);
            records.push(record);
            anomalies.extend(row_anomalies);
        }

        let table = InventoryTable::new(sheet.headers, records);
        let extra_columns = table.extra_columns();
        if !extra_columns.is_empty() {
            info!(extra = ?extra_columns, "忽略附加列");
        }
        if !anomalies.is_empty() {
            debug!(count = anomalies.len(), "数值单元格无法解析，按 NaN 处理");
        }

        info!(
            records = table.len(),
            months = month_columns.len(),
            anomalies = anomalies.len(),
            "库存文件导入完成"
        );

        Ok(ImportOutcome {
            table,
            extra_columns,
            coercion_anomalies: anomalies,
        })
    }

    /// 月份 → 实际列名（同一月份出现多列时取第一列）
    fn month_columns(headers: &[String]) -> Vec<(Month, String)> {
        Month::present_in(headers)
            .into_iter()
            .filter_map(|month| {
                headers
                    .iter()
                    .find(|h| Month::from_column(h) == Some(month))
                    .map(|h| (month, h.clone()))
            })
            .collect()
    }
}

impl Default for InventoryImporter {
    fn default() -> Self {
        Self::new()
    }
}
