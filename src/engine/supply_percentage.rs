// ==========================================
// 药品库存再分配系统 - 供应百分比派生
// ==========================================
// 职责: supply_percentage = cpa / total * 100
// 口径: 除零 / NaN 不做特殊处理，按 IEEE 754 结果（inf / NaN）保留
// ==========================================

use crate::domain::inventory::{InventoryRecord, InventoryTable};

pub struct SupplyPercentageDeriver;

impl SupplyPercentageDeriver {
    pub fn new() -> Self {
        Self
    }

    /// 单条计算
    pub fn supply_percentage(baseline_consumption: f64, baseline_denominator: f64) -> f64 {
        baseline_consumption / baseline_denominator * 100.0
    }

    /// 为每条记录附加 supply_percentage，返回新的记录集合（其余字段不变）
    pub fn derive(&self, records: &[InventoryRecord]) -> Vec<InventoryRecord> {
        records
            .iter()
            .map(|record| {
                let mut enriched = record.clone();
                enriched.supply_percentage = Some(Self::supply_percentage(
                    record.baseline_consumption,
                    record.baseline_denominator,
                ));
                enriched
            })
            .collect()
    }

    /// 派生整张表的工作副本（列集合不变）
    pub fn derive_table(&self, table: &InventoryTable) -> InventoryTable {
        table.with_records(self.derive(table.records()))
    }
}

impl Default for SupplyPercentageDeriver {
    fn default() -> Self {
        Self::new()
    }
}
