// ==========================================
// 药品库存再分配系统 - 库存状态判定
// ==========================================
// 职责: disponibilidad（可供月数） → 库存状态
// 规则:
//   a < 2        → CRITICO
//   2 <= a < 3   → SUB STOCK
//   3 <= a <= 6  → NORMO STOCK
//   a > 6        → SOBRE STOCK
//   NaN          → SIN DATO
// ==========================================

use crate::domain::types::StockState;
use serde::{Deserialize, Serialize};

/// 状态判定阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateThresholds {
    /// 低于此值为 CRITICO
    #[serde(default = "default_critical_below")]
    pub critical_below: f64,
    /// 低于此值为 SUB STOCK
    #[serde(default = "default_sub_stock_below")]
    pub sub_stock_below: f64,
    /// 不超过此值为 NORMO STOCK，超过为 SOBRE STOCK
    #[serde(default = "default_normal_up_to")]
    pub normal_up_to: f64,
}

fn default_critical_below() -> f64 {
    2.0
}

fn default_sub_stock_below() -> f64 {
    3.0
}

fn default_normal_up_to() -> f64 {
    6.0
}

impl Default for StateThresholds {
    fn default() -> Self {
        Self {
            critical_below: default_critical_below(),
            sub_stock_below: default_sub_stock_below(),
            normal_up_to: default_normal_up_to(),
        }
    }
}

/// 库存状态判定器（无副作用）
#[derive(Debug, Clone, Copy, Default)]
pub struct StateClassifier {
    thresholds: StateThresholds,
}

impl StateClassifier {
    pub fn new(thresholds: StateThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &StateThresholds {
        &self.thresholds
    }

    pub fn classify(&self, availability: f64) -> StockState {
        let t = &self.thresholds;
        if availability.is_nan() {
            StockState::Unknown
        } else if availability < t.critical_below {
            StockState::Critical
        } else if availability < t.sub_stock_below {
            StockState::SubStock
        } else if availability <= t.normal_up_to {
            StockState::NormalStock
        } else {
            StockState::OverStock
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let classifier = StateClassifier::default();
        assert_eq!(classifier.classify(1.99), StockState::Critical);
        assert_eq!(classifier.classify(2.0), StockState::SubStock);
        assert_eq!(classifier.classify(2.99), StockState::SubStock);
        assert_eq!(classifier.classify(3.0), StockState::NormalStock);
        assert_eq!(classifier.classify(6.0), StockState::NormalStock);
        assert_eq!(classifier.classify(6.01), StockState::OverStock);
    }

    #[test]
    fn test_classify_extremes() {
        let classifier = StateClassifier::default();
        assert_eq!(classifier.classify(-1.0), StockState::Critical);
        assert_eq!(classifier.classify(f64::NEG_INFINITY), StockState::Critical);
        assert_eq!(classifier.classify(f64::INFINITY), StockState::OverStock);
        assert_eq!(classifier.classify(f64::NAN), StockState::Unknown);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = StateClassifier::new(StateThresholds {
            critical_below: 1.0,
            sub_stock_below: 2.0,
            normal_up_to: 4.0,
        });
        assert_eq!(classifier.classify(1.5), StockState::SubStock);
        assert_eq!(classifier.classify(5.0), StockState::OverStock);
    }
}
