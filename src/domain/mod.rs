// ==========================================
// 药品库存再分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、台账结构
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod inventory;
pub mod ledger;
pub mod types;

// 重导出核心类型
pub use inventory::{columns, InventoryRecord, InventoryTable};
pub use ledger::{
    format_number, DemandTrace, Ledger, LedgerCell, LedgerLayout, LedgerRow, LedgerSummary,
    NO_EXTRACTION, NO_TRANSFER, SC,
};
pub use types::{Month, StockState};
