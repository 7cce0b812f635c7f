// ==========================================
// 药品库存再分配系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值强制转换
// 口径: 缺失单元格 → NaN（不计异常）；无法解析 → NaN（计异常）
// ==========================================

use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn coerce_numeric(&self, value: Option<&str>) -> Result<f64, String> {
        match self.normalize_null(value) {
            None => Ok(f64::NAN),
            Some(text) => text.parse::<f64>().map_err(|_| text),
        }
    }
}
