// ==========================================
// 药品库存再分配系统 - 库存记录
// ==========================================
// 职责: 定义 InventoryRecord（机构 × 药品）与 InventoryTable（带列集合的快照）
// 红线: 引擎只读；派生字段只写入副本，不回写原始快照
// ==========================================

use crate::domain::types::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 输入列名（导入时已统一转小写）
// ==========================================
pub mod columns {
    pub const NETWORK: &str = "micro red";
    pub const FACILITY_CODE: &str = "codigo_est";
    pub const FACILITY: &str = "establecimiento";
    pub const MEDICATION_CODE: &str = "codigo";
    pub const MEDICATION_NAME: &str = "medicamentos";
    pub const PRICE: &str = "precio";
    pub const TYPE: &str = "tipo";
    pub const STOCK: &str = "stock";
    pub const TOTAL: &str = "total";
    pub const CPA: &str = "cpa";
    pub const AVAILABILITY: &str = "disponibilidad";

    /// 必需列（缺任一列则拒绝运行）
    pub const REQUIRED: [&str; 11] = [
        NETWORK,
        FACILITY_CODE,
        FACILITY,
        MEDICATION_CODE,
        MEDICATION_NAME,
        PRICE,
        TYPE,
        STOCK,
        TOTAL,
        CPA,
        AVAILABILITY,
    ];
}

/// 单个机构 × 药品的库存快照
///
/// 数值字段均已做强制数值转换：无法解析的单元格为 NaN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub network_id: String,
    pub facility_code: String,
    pub facility_id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub medication_type: String,
    pub unit_price: f64,
    pub current_stock: f64,
    pub availability_score: f64,
    /// 月度出库量（salidas），只含输入中存在的月份列
    pub monthly_consumption: BTreeMap<Month, f64>,
    /// cpa
    pub baseline_consumption: f64,
    /// total
    pub baseline_denominator: f64,
    /// 派生字段: cpa / total * 100（未派生时为 None）
    #[serde(default)]
    pub supply_percentage: Option<f64>,
    /// 导入时的行序号，仅用于输出恢复原始顺序
    pub original_order_index: usize,
}

impl InventoryRecord {
    /// 指定月份的出库量；该月无数据时为 NaN
    pub fn consumption(&self, month: Month) -> f64 {
        self.monthly_consumption
            .get(&month)
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// 同一药品（编码 + 类型）判定
    pub fn same_medication(&self, other: &InventoryRecord) -> bool {
        self.medication_code == other.medication_code
            && self.medication_type == other.medication_type
    }
}

// ==========================================
// InventoryTable - 带列集合的库存快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryTable {
    columns: Vec<String>,
    records: Vec<InventoryRecord>,
}

impl InventoryTable {
    /// 以导入得到的列集合构建（列名统一转小写）
    pub fn new(columns: Vec<String>, records: Vec<InventoryRecord>) -> Self {
        let columns = columns
            .into_iter()
            .map(|c| c.trim().to_lowercase())
            .collect();
        Self { columns, records }
    }

    /// 由记录直接构建：列集合 = 必需列 + 任一记录中出现过的月份
    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        let mut columns: Vec<String> = columns::REQUIRED.iter().map(|c| c.to_string()).collect();
        for month in Month::FISCAL_ORDER {
            if records
                .iter()
                .any(|r| r.monthly_consumption.contains_key(&month))
            {
                columns.push(month.column_name().to_string());
            }
        }
        Self { columns, records }
    }

    /// 保留列集合，替换记录（用于派生后的工作副本）
    pub fn with_records(&self, records: Vec<InventoryRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// 缺失的必需列（按必需列声明顺序）
    pub fn missing_columns(&self) -> Vec<String> {
        columns::REQUIRED
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// 既不是必需列也不是月份列的附加列
    pub fn extra_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !columns::REQUIRED.contains(&c.as_str()))
            .filter(|c| Month::from_column(c).is_none())
            .cloned()
            .collect()
    }

    /// 输入中存在的月份列（财政年度顺序）
    pub fn months(&self) -> Vec<Month> {
        Month::present_in(&self.columns)
    }
}
