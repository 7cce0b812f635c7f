// ==========================================
// 药品库存再分配系统 - 导入接口
// ==========================================
// 职责: 定义导入管道各阶段的接口（不包含实现）
// 管道: 文件解析 → 基础清洗 → 字段映射（数值强制转换）→ 结构校验
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::domain::types::Month;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawSheet - 解析后的原始表
// ==========================================
/// 原始表: 表头已去空白并转小写，数据行已跳过全空白行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawSheet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 数值单元格强制转换失败记录（不阻断导入）
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionAnomaly {
    /// 数据行序号（从 0 开始，不含表头）
    pub row: usize,
    pub column: String,
    pub value: String,
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 读取文件的第一个工作表
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
pub trait DataCleaner: Send + Sync {
    /// 去除首尾空白
    fn clean_text(&self, value: &str) -> String;

    /// 空白字符串视为缺失
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 数值强制转换: 缺失 → Ok(NaN)，无法解析 → Err(原文)
    fn coerce_numeric(&self, value: Option<&str>) -> Result<f64, String>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// 原始行 → InventoryRecord
    ///
    /// # 参数
    /// - row: 列名（小写）→ 单元格文本
    /// - month_columns: 输入中存在的月份列（月份 → 实际列名）
    /// - row_index: 数据行序号，写入 original_order_index
    ///
    /// # 返回
    /// 记录与本行的数值转换异常
    fn map_row(
        &self,
        row: &HashMap<String, String>,
        month_columns: &[(Month, String)],
        row_index: usize,
    ) -> (InventoryRecord, Vec<CoercionAnomaly>);
}
