// ==========================================
// 药品库存再分配系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 读写失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("导出格式不支持: {0}（仅支持 csv/json）")]
    UnsupportedFormat(String),

    #[error("表头与台账版式不符: {0}")]
    HeaderMismatch(String),

    #[error("单元格格式错误 (行 {row}, 列 {column}): {value}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
