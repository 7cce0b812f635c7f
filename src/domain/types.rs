// ==========================================
// 药品库存再分配系统 - 领域类型定义
// ==========================================
// 职责: 月份列（财政年度顺序）、库存状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 月份 (Month)
// ==========================================
// 财政年度顺序: 九月 → 次年八月
// 派生 Ord 即为财政年度顺序，BTreeMap<Month, _> 迭代顺序与之一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Setiembre,
    Octubre,
    Noviembre,
    Diciembre,
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
}

impl Month {
    /// 财政年度顺序的全部月份
    pub const FISCAL_ORDER: [Month; 12] = [
        Month::Setiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
    ];

    /// 输入表中的列名（小写）
    pub fn column_name(&self) -> &'static str {
        match self {
            Month::Setiembre => "setiembre",
            Month::Octubre => "octubre",
            Month::Noviembre => "noviembre",
            Month::Diciembre => "diciembre",
            Month::Enero => "enero",
            Month::Febrero => "febrero",
            Month::Marzo => "marzo",
            Month::Abril => "abril",
            Month::Mayo => "mayo",
            Month::Junio => "junio",
            Month::Julio => "julio",
            Month::Agosto => "agosto",
        }
    }

    /// 列名 → 月份（大小写不敏感，"septiembre" 视为 "setiembre" 的别名）
    pub fn from_column(name: &str) -> Option<Month> {
        match name.trim().to_lowercase().as_str() {
            "setiembre" | "septiembre" => Some(Month::Setiembre),
            "octubre" => Some(Month::Octubre),
            "noviembre" => Some(Month::Noviembre),
            "diciembre" => Some(Month::Diciembre),
            "enero" => Some(Month::Enero),
            "febrero" => Some(Month::Febrero),
            "marzo" => Some(Month::Marzo),
            "abril" => Some(Month::Abril),
            "mayo" => Some(Month::Mayo),
            "junio" => Some(Month::Junio),
            "julio" => Some(Month::Julio),
            "agosto" => Some(Month::Agosto),
            _ => None,
        }
    }

    /// 从列名列表中挑出存在的月份，按财政年度顺序返回（去重）
    pub fn present_in<S: AsRef<str>>(columns: &[S]) -> Vec<Month> {
        Month::FISCAL_ORDER
            .iter()
            .copied()
            .filter(|month| {
                columns
                    .iter()
                    .any(|c| Month::from_column(c.as_ref()) == Some(*month))
            })
            .collect()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

// ==========================================
// 库存状态 (Stock State)
// ==========================================
// 由 disponibilidad（可供月数）判定
// Unknown: disponibilidad 非数值（NaN），不落入任何区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StockState {
    #[serde(rename = "CRITICO")]
    Critical,
    #[serde(rename = "SUB STOCK")]
    SubStock,
    #[serde(rename = "NORMO STOCK")]
    NormalStock,
    #[serde(rename = "SOBRE STOCK")]
    OverStock,
    #[serde(rename = "SIN DATO")]
    Unknown,
}

impl StockState {
    pub const ALL: [StockState; 5] = [
        StockState::Critical,
        StockState::SubStock,
        StockState::NormalStock,
        StockState::OverStock,
        StockState::Unknown,
    ];

    /// 台账 ESTADO 列的取值
    pub fn label(&self) -> &'static str {
        match self {
            StockState::Critical => "CRITICO",
            StockState::SubStock => "SUB STOCK",
            StockState::NormalStock => "NORMO STOCK",
            StockState::OverStock => "SOBRE STOCK",
            StockState::Unknown => "SIN DATO",
        }
    }
}

impl fmt::Display for StockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StockState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('_', " ");
        StockState::ALL
            .iter()
            .copied()
            .find(|state| state.label() == normalized)
            .ok_or_else(|| format!("未知库存状态: {}", s))
    }
}
