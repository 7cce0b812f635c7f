// ==========================================
// 药品库存再分配系统 - 运行期库存台账
// ==========================================
// 职责: DepletionMode::RunLedger 下跨记录共享的调出方剩余库存
// 红线: 只记录扣减，不回写输入快照
// 键包含输入行号: 同一机构同一药品的多行各自保留库存
// ==========================================

use crate::domain::inventory::InventoryRecord;
use std::collections::HashMap;

/// 台账键: 输入行 + 机构 + 药品编码 + 药品类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StockKey {
    pub original_order_index: usize,
    pub facility_id: String,
    pub medication_code: String,
    pub medication_type: String,
}

impl StockKey {
    pub fn of(record: &InventoryRecord) -> Self {
        Self {
            original_order_index: record.original_order_index,
            facility_id: record.facility_id.clone(),
            medication_code: record.medication_code.clone(),
            medication_type: record.medication_type.clone(),
        }
    }
}

/// 整次运行的剩余库存（首次访问时以记录当前库存为初值）
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    remaining: HashMap<StockKey, f64>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 调出方当前可用量
    pub fn available(&mut self, record: &InventoryRecord) -> f64 {
        *self
            .remaining
            .entry(StockKey::of(record))
            .or_insert(record.current_stock)
    }

    /// 扣减调出量（仅正数生效，NaN 不进入台账）
    pub fn consume(&mut self, record: &InventoryRecord, quantity: f64) {
        if quantity > 0.0 {
            let entry = self
                .remaining
                .entry(StockKey::of(record))
                .or_insert(record.current_stock);
            *entry -= quantity;
        }
    }

    pub fn remaining(&self, key: &StockKey) -> Option<f64> {
        self.remaining.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
