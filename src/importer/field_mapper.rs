// ==========================================
// 药品库存再分配系统 - 字段映射器实现
// ==========================================
// 职责: 原始行（小写列名）→ InventoryRecord + 数值强制转换
// 规则: 数值列解析失败记为 NaN 并返回 CoercionAnomaly，不中断导入
// ==========================================

use crate::domain::inventory::{columns, InventoryRecord};
use crate::domain::types::Month;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::{
    CoercionAnomaly, DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};
use std::collections::{BTreeMap, HashMap};

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 提取文本字段（缺失为空串）
    fn get_text(&self, row: &HashMap<String, String>, key: &str) -> String {
        row.get(key)
            .map(|v| self.cleaner.clean_text(v))
            .unwrap_or_default()
    }

    /// 提取数值字段，失败时记录异常
    fn get_number(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_index: usize,
        anomalies: &mut Vec<CoercionAnomaly>,
    ) -> f64 {
        match self
            .cleaner
            .coerce_numeric(row.get(key).map(String::as_str))
        {
            Ok(value) => value,
            Err(value) => {
                anomalies.push(CoercionAnomaly {
                    row: row_index,
                    column: key.to_string(),
                    value,
                });
                f64::NAN
            }
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_row(
        &self,
        row: &HashMap<String, String>,
        month_columns: &[(Month, String)],
        row_index: usize,
    ) -> (InventoryRecord, Vec<CoercionAnomaly>) {
        let mut anomalies = Vec::new();

        let mut monthly_consumption = BTreeMap::new();
        for (month, column) in month_columns {
            let value = self.get_number(row, column, row_index, &mut anomalies);
            monthly_consumption.insert(*month, value);
        }

        let record = InventoryRecord {
            network_id: self.get_text(row, columns::NETWORK),
            facility_code: self.get_text(row, columns::FACILITY_CODE),
            facility_id: self.get_text(row, columns::FACILITY),
            medication_code: self.get_text(row, columns::MEDICATION_CODE),
            medication_name: self.get_text(row, columns::MEDICATION_NAME),
            medication_type: self.get_text(row, columns::TYPE),
            unit_price: self.get_number(row, columns::PRICE, row_index, &mut anomalies),
            current_stock: self.get_number(row, columns::STOCK, row_index, &mut anomalies),
            availability_score: self.get_number(
                row,
                columns::AVAILABILITY,
                row_index,
                &mut anomalies,
            ),
            monthly_consumption,
            baseline_consumption: self.get_number(row, columns::CPA, row_index, &mut anomalies),
            baseline_denominator: self.get_number(
                row,
                columns::TOTAL,
                row_index,
                &mut anomalies,
            ),
            supply_percentage: None,
            original_order_index: row_index,
        };

        (record, anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_row_basic() {
        let row = row(&[
            ("micro red", "PURUS"),
            ("codigo_est", "001"),
            ("establecimiento", " ESPERANZA "),
            ("codigo", "M01"),
            ("medicamentos", "PARACETAMOL 500MG"),
            ("precio", "0.15"),
            ("tipo", "E"),
            ("stock", "120"),
            ("total", "300"),
            ("cpa", "25"),
            ("disponibilidad", "4.8"),
            ("septiembre", "10"),
        ]);

        let months = vec![(Month::Setiembre, "septiembre".to_string())];
        let (record, anomalies) = FieldMapper::new().map_row(&row, &months, 7);

        assert!(anomalies.is_empty());
        assert_eq!(record.facility_id, "ESPERANZA");
        assert_eq!(record.current_stock, 120.0);
        assert_eq!(record.baseline_consumption, 25.0);
        assert_eq!(record.baseline_denominator, 300.0);
        assert_eq!(record.consumption(Month::Setiembre), 10.0);
        assert_eq!(record.original_order_index, 7);
    }

    #[test]
    fn test_map_row_coercion_anomaly_becomes_nan() {
        let row = row(&[("stock", "sin dato"), ("precio", ""), ("enero", "x")]);
        let months = vec![(Month::Enero, "enero".to_string())];
        let (record, anomalies) = FieldMapper::new().map_row(&row, &months, 0);

        assert!(record.current_stock.is_nan());
        assert!(record.unit_price.is_nan());
        assert!(record.consumption(Month::Enero).is_nan());

        // 空白价格不计异常
        let columns: Vec<&str> = anomalies.iter().map(|a| a.column.as_str()).collect();
        assert_eq!(columns, vec!["enero", "stock"]);
        assert_eq!(anomalies[1].value, "sin dato");
    }
}
