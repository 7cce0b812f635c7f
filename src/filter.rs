// ==========================================
// 药品库存再分配系统 - 台账筛选
// ==========================================
// 规则:
//   - micro red / 机构 / 药品名称: 不区分大小写的字面子串匹配
//   - 状态: 标签精确匹配
//   - disponibilidad: 闭区间 [min, max]，NaN 永不命中
// 所有条件同时成立才保留；未设置的条件不参与判断
// ==========================================

use crate::domain::ledger::{Ledger, LedgerRow};
use crate::domain::types::StockState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub network: Option<String>,
    pub facility: Option<String>,
    pub medication: Option<String>,
    pub state: Option<StockState>,
    pub min_availability: Option<f64>,
    pub max_availability: Option<f64>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl LedgerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network(mut self, value: impl Into<String>) -> Self {
        self.network = Some(value.into());
        self
    }

    pub fn facility(mut self, value: impl Into<String>) -> Self {
        self.facility = Some(value.into());
        self
    }

    pub fn medication(mut self, value: impl Into<String>) -> Self {
        self.medication = Some(value.into());
        self
    }

    pub fn state(mut self, state: StockState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn availability_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_availability = min;
        self.max_availability = max;
        self
    }

    /// 没有设置任何条件
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, row: &LedgerRow) -> bool {
        let text_ok = |pattern: &Option<String>, value: &str| {
            pattern
                .as_deref()
                .map_or(true, |p| contains_ignore_case(value, p))
        };

        if !text_ok(&self.network, &row.network_id)
            || !text_ok(&self.facility, &row.facility_id)
            || !text_ok(&self.medication, &row.medication_name)
        {
            return false;
        }

        if let Some(state) = self.state {
            if row.state != state {
                return false;
            }
        }

        if self.min_availability.is_some() || self.max_availability.is_some() {
            let value = row.availability;
            if value.is_nan() {
                return false;
            }
            if self.min_availability.map_or(false, |min| value < min)
                || self.max_availability.map_or(false, |max| value > max)
            {
                return false;
            }
        }

        true
    }

    /// 筛选台账，保持原有顺序与版式
    pub fn apply(&self, ledger: &Ledger) -> Ledger {
        let rows = ledger
            .rows
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();
        Ledger::new(ledger.layout, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{DemandTrace, LedgerCell, LedgerLayout, NO_EXTRACTION, NO_TRANSFER};

    fn row(network: &str, facility: &str, medication: &str, availability: f64) -> LedgerRow {
        LedgerRow {
            network_id: network.to_string(),
            facility_id: facility.to_string(),
            medication_code: "M01".to_string(),
            medication_name: medication.to_string(),
            unit_price: 1.0,
            current_stock: LedgerCell::NoChange,
            supply: LedgerCell::Number(1.0),
            received: LedgerCell::NoChange,
            final_stock: LedgerCell::NoChange,
            monetary_total: 0.0,
            origin_label: NO_EXTRACTION.to_string(),
            destination_label: NO_TRANSFER.to_string(),
            availability,
            state: crate::engine::StateClassifier::default().classify(availability),
            original_order_index: 0,
            trace: DemandTrace::default(),
        }
    }

    fn ledger() -> Ledger {
        Ledger::new(
            LedgerLayout::Full,
            vec![
                row("PURUS", "ESPERANZA", "PARACETAMOL 500MG", 1.5),
                row("IPARIA", "NUEVA LUZ", "Amoxicilina (jarabe)", 3.0),
                row("PURUS", "SAN JOSE", "IBUPROFENO", 6.0),
                row("MASISEA", "CALLERIA", "PARACETAMOL 120MG", f64::NAN),
            ],
        )
    }

    #[test]
    fn test_text_filters_are_case_insensitive_literal() {
        let out = LedgerFilter::new().medication("paracetamol").apply(&ledger());
        assert_eq!(out.len(), 2);

        // 括号按字面匹配
        let out = LedgerFilter::new().medication("(JARABE)").apply(&ledger());
        assert_eq!(out.len(), 1);

        let out = LedgerFilter::new()
            .network("purus")
            .facility("san")
            .apply(&ledger());
        assert_eq!(out.rows[0].facility_id, "SAN JOSE");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_state_exact_match() {
        let out = LedgerFilter::new()
            .state(StockState::NormalStock)
            .apply(&ledger());
        let facilities: Vec<&str> = out.rows.iter().map(|r| r.facility_id.as_str()).collect();
        assert_eq!(facilities, vec!["NUEVA LUZ", "SAN JOSE"]);
    }

    #[test]
    fn test_availability_range_inclusive_and_nan_excluded() {
        let out = LedgerFilter::new()
            .availability_between(Some(3.0), Some(6.0))
            .apply(&ledger());
        assert_eq!(out.len(), 2);

        let out = LedgerFilter::new()
            .availability_between(None, Some(100.0))
            .apply(&ledger());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = LedgerFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&ledger()).len(), 4);
    }
}
