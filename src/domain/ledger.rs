// ==========================================
// 药品库存再分配系统 - 再分配台账
// ==========================================
// 职责: 定义台账行（每条输入记录对应一行）、单元格哨兵值、台账版式与汇总
// ==========================================

use crate::domain::types::StockState;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// 哨兵值
// ==========================================
/// 无变动 / 无适用值
pub const SC: &str = "SC";
/// 未抽取库存
pub const NO_EXTRACTION: &str = "NO SE EXTRAE STOCK";
/// 未调拨库存
pub const NO_TRANSFER: &str = "NO SE TRASPASAN STOCK";

/// 数值的台账文本形式
///
/// 最短往返表示：5.0 → "5"，NaN → "NaN"；重新解析后再输出字节一致
pub fn format_number(value: f64) -> String {
    value.to_string()
}

// ==========================================
// LedgerCell - 数值 / "SC" / 空白 三态单元格
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedgerCell {
    Number(f64),
    /// "SC"
    NoChange,
    /// 空白单元格
    Blank,
}

impl LedgerCell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LedgerCell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_no_change(&self) -> bool {
        matches!(self, LedgerCell::NoChange)
    }

    /// 解析台账文本；非数值且非哨兵时返回 None
    pub fn parse(text: &str) -> Option<LedgerCell> {
        match text {
            "" => Some(LedgerCell::Blank),
            SC => Some(LedgerCell::NoChange),
            other => other.parse::<f64>().ok().map(LedgerCell::Number),
        }
    }
}

impl fmt::Display for LedgerCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerCell::Number(v) => write!(f, "{}", format_number(*v)),
            LedgerCell::NoChange => write!(f, "{}", SC),
            LedgerCell::Blank => Ok(()),
        }
    }
}

impl Serialize for LedgerCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LedgerCell::Number(v) => serializer.serialize_f64(*v),
            LedgerCell::NoChange => serializer.serialize_str(SC),
            LedgerCell::Blank => serializer.serialize_str(""),
        }
    }
}

// ==========================================
// 台账版式
// ==========================================
/// Full: 完整策略（ABASTECIMIENTO 列回显 cpa）
/// NormalStock: 简化策略（STOCK A DAR 列为应调出量）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerLayout {
    Full,
    NormalStock,
}

impl LedgerLayout {
    pub fn headers(&self) -> [&'static str; 14] {
        let supply = match self {
            LedgerLayout::Full => "ABASTECIMIENTO",
            LedgerLayout::NormalStock => "STOCK A DAR",
        };
        [
            "MICRO RED",
            "ESTABLECIMIENTO",
            "COD-MEDICAMENTO",
            "MEDICAMENTO",
            "PRECIO",
            "STOCK ACTUAL",
            supply,
            "STOCK A RECIBIR",
            "STOCK FINAL",
            "TOTAL",
            "ESTABLECIMIENTO DE DONDE SE EXTRAE EL STOCK",
            "ESTABLECIMIENTO A DONDE SE TRASPASA EL STOCK",
            "DISPONIBILIDAD",
            "ESTADO",
        ]
    }

    /// 按表头识别版式
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<LedgerLayout> {
        [LedgerLayout::Full, LedgerLayout::NormalStock]
            .into_iter()
            .find(|layout| {
                let expected = layout.headers();
                headers.len() == expected.len()
                    && headers
                        .iter()
                        .zip(expected.iter())
                        .all(|(h, e)| h.as_ref().trim() == *e)
            })
    }
}

/// 单条记录的需求计算轨迹（不导出，仅供诊断与测试）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DemandTrace {
    /// 第 1 步累计并截断后的需求
    pub accumulated: f64,
    /// 自身重复条目抵扣量
    pub self_reused: f64,
    /// 从其他机构获得的数量
    pub received: f64,
    /// 调拨后仍未满足的需求
    pub remaining: f64,
}

// ==========================================
// LedgerRow - 台账行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    pub network_id: String,
    pub facility_id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub unit_price: f64,
    pub current_stock: LedgerCell,
    /// Full 版式: 回显 cpa；NormalStock 版式: 应调出量
    pub supply: LedgerCell,
    pub received: LedgerCell,
    pub final_stock: LedgerCell,
    pub monetary_total: f64,
    pub origin_label: String,
    pub destination_label: String,
    pub availability: f64,
    pub state: StockState,
    #[serde(skip)]
    pub original_order_index: usize,
    #[serde(skip)]
    pub trace: DemandTrace,
}

impl LedgerRow {
    /// 与 LedgerLayout::headers 一一对应的文本单元格
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.network_id.clone(),
            self.facility_id.clone(),
            self.medication_code.clone(),
            self.medication_name.clone(),
            format_number(self.unit_price),
            self.current_stock.to_string(),
            self.supply.to_string(),
            self.received.to_string(),
            self.final_stock.to_string(),
            format_number(self.monetary_total),
            self.origin_label.clone(),
            self.destination_label.clone(),
            format_number(self.availability),
            self.state.label().to_string(),
        ]
    }

    /// 是否发生了金额变动（TOTAL != 0）
    pub fn has_movement(&self) -> bool {
        self.monetary_total != 0.0
    }
}

// ==========================================
// Ledger - 台账
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ledger {
    pub layout: LedgerLayout,
    pub rows: Vec<LedgerRow>,
}

/// 台账汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub rows: usize,
    pub rows_with_movement: usize,
    pub total_amount: f64,
    pub by_state: BTreeMap<String, usize>,
}

impl Ledger {
    pub fn new(layout: LedgerLayout, rows: Vec<LedgerRow>) -> Self {
        Self { layout, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> LedgerSummary {
        let mut by_state = BTreeMap::new();
        for row in &self.rows {
            *by_state.entry(row.state.label().to_string()).or_insert(0) += 1;
        }

        LedgerSummary {
            rows: self.rows.len(),
            rows_with_movement: self.rows.iter().filter(|r| r.has_movement()).count(),
            total_amount: self.rows.iter().map(|r| r.monetary_total).sum(),
            by_state,
        }
    }
}
