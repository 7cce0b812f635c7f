// ==========================================
// 药品库存再分配系统 - 引擎层
// ==========================================
// 职责: 状态判定、供应百分比派生、库存再分配
// 流水线: 导入 → (可选) SupplyPercentageDeriver → RedistributionEngine → 台账
// 红线: 引擎只读输入快照，不持有跨调用状态
// ==========================================

pub mod error;
pub mod full_redistribution;
pub mod normal_stock_redistribution;
pub mod numeric;
pub mod policy;
pub mod progress;
pub mod redistribution;
pub mod state_classifier;
pub mod stock_ledger;
pub mod strategy;
pub mod supply_percentage;

// 重导出核心引擎
pub use error::{RedistributionError, RedistributionResult};
pub use full_redistribution::FullRedistribution;
pub use normal_stock_redistribution::NormalStockRedistribution;
pub use policy::{build_policy, RedistributionPolicy};
pub use progress::{NoOpProgress, ProgressObserver, ProgressTracker};
pub use redistribution::RedistributionEngine;
pub use state_classifier::{StateClassifier, StateThresholds};
pub use stock_ledger::{StockKey, StockLedger};
pub use strategy::{DepletionMode, PolicyKind};
pub use supply_percentage::SupplyPercentageDeriver;
