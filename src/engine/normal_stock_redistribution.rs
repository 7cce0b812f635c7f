// ==========================================
// 药品库存再分配系统 - 简化再分配策略（仅正常库存）
// ==========================================
// 规则:
//   0. 仅保留状态为 NORMO STOCK 的记录
//   1. stock > 0: 应调出量 = 按月累加出库量，截断到 stock
//   2. stock <= 0: 在保留记录中查找同药品编码、stock > 0 的机构，
//      每个调出方取一次 min(首月出库量, 调出方库存)
//   3. 期末库存 = stock + 调入 - 调出
// 说明: 无自身复用，无 cpa 回显，全部单元格为数值
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::domain::ledger::{DemandTrace, LedgerCell, LedgerLayout, LedgerRow};
use crate::domain::types::{Month, StockState};
use crate::engine::numeric::propagating_min;
use crate::engine::policy::{group_by_network, RedistributionPolicy};
use crate::engine::progress::{ProgressObserver, ProgressTracker};
use crate::engine::state_classifier::StateClassifier;
use crate::engine::strategy::PolicyKind;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalStockRedistribution;

impl NormalStockRedistribution {
    pub fn new() -> Self {
        Self
    }

    fn build_row(
        record: &InventoryRecord,
        retained: &[&InventoryRecord],
        months: &[Month],
        classifier: &StateClassifier,
    ) -> LedgerRow {
        let stock = record.current_stock;
        let mut to_give = 0.0;
        let mut received = 0.0;
        let mut origin_label = record.facility_id.clone();
        let mut destination_label = record.facility_id.clone();

        if stock > 0.0 {
            for &month in months {
                to_give += record.consumption(month);
                to_give = propagating_min(to_give, stock);
            }
        } else {
            let suppliers = retained
                .iter()
                .filter(|other| other.medication_code == record.medication_code)
                .filter(|other| other.current_stock > 0.0);

            // 调出方库存为正，首个月份即可调
            if let Some(&first_month) = months.first() {
                for supplier in suppliers {
                    received +=
                        propagating_min(record.consumption(first_month), supplier.current_stock);
                    origin_label = supplier.facility_id.clone();
                    destination_label = record.facility_id.clone();
                }
            }
        }

        let final_stock = stock + received - to_give;
        let monetary_total = if received > 0.0 && !record.unit_price.is_nan() {
            received * record.unit_price
        } else {
            0.0
        };

        LedgerRow {
            network_id: record.network_id.clone(),
            facility_id: record.facility_id.clone(),
            medication_code: record.medication_code.clone(),
            medication_name: record.medication_name.clone(),
            unit_price: record.unit_price,
            current_stock: LedgerCell::Number(stock),
            supply: LedgerCell::Number(to_give),
            received: LedgerCell::Number(received),
            final_stock: LedgerCell::Number(final_stock),
            monetary_total,
            origin_label,
            destination_label,
            availability: record.availability_score,
            state: classifier.classify(record.availability_score),
            original_order_index: record.original_order_index,
            trace: DemandTrace {
                accumulated: to_give,
                self_reused: 0.0,
                received,
                remaining: 0.0,
            },
        }
    }
}

impl RedistributionPolicy for NormalStockRedistribution {
    fn kind(&self) -> PolicyKind {
        PolicyKind::NormalStock
    }

    fn layout(&self) -> LedgerLayout {
        LedgerLayout::NormalStock
    }

    fn plan(
        &self,
        records: &[InventoryRecord],
        months: &[Month],
        classifier: &StateClassifier,
        progress: &mut dyn ProgressObserver,
    ) -> Vec<LedgerRow> {
        let retained: Vec<&InventoryRecord> = records
            .iter()
            .filter(|r| classifier.classify(r.availability_score) == StockState::NormalStock)
            .collect();
        debug!(
            retained = retained.len(),
            dropped = records.len() - retained.len(),
            "筛选 NORMO STOCK 记录"
        );

        let mut tracker = ProgressTracker::new(retained.len());
        let mut rows = Vec::with_capacity(retained.len());

        for (network_id, group) in group_by_network(&retained) {
            debug!(network = %network_id, records = group.len(), "处理 micro red");

            for record in group {
                rows.push(Self::build_row(record, &retained, months, classifier));
                progress.on_progress(tracker.advance());
            }
        }

        rows.sort_by_key(|row| row.original_order_index);
        rows
    }
}
