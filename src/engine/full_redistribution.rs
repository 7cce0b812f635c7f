// ==========================================
// 药品库存再分配系统 - 完整再分配策略
// ==========================================
// 每条记录 r 的计算步骤:
//   1. 需求累计: stock > 0 时按月累加出库量，每次累加后截断到 stock
//   2. 调出候选: 同药品（编码 + 类型）、stock > 0、机构不同的其他记录
//   3. 自身复用: 需求 > 0 且存在同机构同药品的重复条目（stock > 0）时，
//      复用 min(需求, stock) 并从需求中扣除
//   4. 调拨: 需求 > 0 时逐个候选、逐月取 min(r 当月出库, 候选剩余, 需求)
//   5. 金额: 调入量 > 0 且单价为数值时 = 调入量 × 单价，否则 0
//   6. 输出: 回显 cpa 等输入字段（见 build_row）
// 红线: 不修改任何候选记录的库存，扣减只发生在局部影子计数或 StockLedger
// RunLedger: 台账按输入行区分；自身复用量也从重复条目中扣减
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::domain::ledger::{
    DemandTrace, LedgerCell, LedgerLayout, LedgerRow, NO_EXTRACTION, NO_TRANSFER,
};
use crate::domain::types::Month;
use crate::engine::numeric::{propagating_min, propagating_min3};
use crate::engine::policy::{group_by_network, RedistributionPolicy};
use crate::engine::progress::{ProgressObserver, ProgressTracker};
use crate::engine::state_classifier::StateClassifier;
use crate::engine::stock_ledger::StockLedger;
use crate::engine::strategy::{DepletionMode, PolicyKind};
use tracing::{debug, trace};

/// 单条记录的调拨结果
#[derive(Debug, Clone)]
struct Sourcing {
    trace: DemandTrace,
    origin_label: String,
    destination_label: String,
}

pub struct FullRedistribution {
    depletion: DepletionMode,
}

impl FullRedistribution {
    pub fn new(depletion: DepletionMode) -> Self {
        Self { depletion }
    }

    pub fn depletion(&self) -> DepletionMode {
        self.depletion
    }

    /// 第 1 步: 需求累计（结果不超过自身库存）
    pub fn accumulate_demand(record: &InventoryRecord, months: &[Month]) -> f64 {
        let mut demand = 0.0;
        if record.current_stock > 0.0 {
            for &month in months {
                demand += record.consumption(month);
                demand = propagating_min(demand, record.current_stock);
            }
        }
        demand
    }

    /// 第 2 步: 调出候选（输入顺序）
    fn peers<'a>(record: &InventoryRecord, records: &'a [InventoryRecord]) -> Vec<&'a InventoryRecord> {
        records
            .iter()
            .filter(|other| {
                other.same_medication(record)
                    && other.current_stock > 0.0
                    && other.facility_id != record.facility_id
            })
            .collect()
    }

    /// 第 3 步前置: 同机构同药品、库存为正的重复条目
    fn duplicate_self_entries<'a>(
        record: &'a InventoryRecord,
        records: &'a [InventoryRecord],
    ) -> impl Iterator<Item = &'a InventoryRecord> + 'a {
        records.iter().filter(move |other| {
            !std::ptr::eq(*other, record)
                && other.facility_id == record.facility_id
                && other.same_medication(record)
                && other.current_stock > 0.0
        })
    }

    /// RunLedger 下自身复用量按输入顺序记到重复条目上
    fn draw_from_duplicates(
        record: &InventoryRecord,
        records: &[InventoryRecord],
        quantity: f64,
        run_ledger: &mut StockLedger,
    ) {
        let mut left = quantity;
        for duplicate in Self::duplicate_self_entries(record, records) {
            if !(left > 0.0) {
                break;
            }
            let take = propagating_min(left, run_ledger.available(duplicate));
            if take > 0.0 {
                run_ledger.consume(duplicate, take);
                left -= take;
            }
        }
    }

    /// 第 2~4 步
    fn source(
        &self,
        record: &InventoryRecord,
        records: &[InventoryRecord],
        months: &[Month],
        mut ledger: Option<&mut StockLedger>,
    ) -> Sourcing {
        let mut demand = Self::accumulate_demand(record, months);
        let accumulated = demand;

        let peers = Self::peers(record, records);

        let mut self_reused = 0.0;
        if demand > 0.0 && Self::duplicate_self_entries(record, records).next().is_some() {
            self_reused = propagating_min(demand, record.current_stock);
            demand -= self_reused;

            if let Some(run_ledger) = ledger.as_deref_mut() {
                Self::draw_from_duplicates(record, records, self_reused, run_ledger);
            }
        }

        let mut received = 0.0;
        let mut origin_label = NO_EXTRACTION.to_string();
        let mut destination_label = NO_TRANSFER.to_string();

        if demand > 0.0 {
            origin_label = record.facility_id.clone();

            for peer in &peers {
                if demand > 0.0 {
                    // 影子计数: 仅在本条记录内有效
                    let mut peer_available = match ledger.as_deref_mut() {
                        Some(run_ledger) => run_ledger.available(peer),
                        None => peer.current_stock,
                    };

                    for &month in months {
                        let take =
                            propagating_min3(record.consumption(month), peer_available, demand);
                        received += take;
                        demand -= take;
                        peer_available -= take;
                        destination_label = peer.facility_id.clone();

                        if let Some(run_ledger) = ledger.as_deref_mut() {
                            run_ledger.consume(peer, take);
                        }
                    }
                }
            }
        }

        trace!(
            facility = %record.facility_id,
            medication = %record.medication_code,
            accumulated,
            self_reused,
            received,
            remaining = demand,
            "需求计算完成"
        );

        Sourcing {
            trace: DemandTrace {
                accumulated,
                self_reused,
                received,
                remaining: demand,
            },
            origin_label,
            destination_label,
        }
    }

    /// 第 5~6 步: 构建台账行
    ///
    /// 输出字段按既有报表口径回显输入值:
    /// - ABASTECIMIENTO 回显 cpa，而非局部需求
    /// - STOCK FINAL = cpa + 调入量
    fn build_row(
        record: &InventoryRecord,
        sourcing: Sourcing,
        classifier: &StateClassifier,
    ) -> LedgerRow {
        let received = sourcing.trace.received;
        let monetary_total = if received > 0.0 && !record.unit_price.is_nan() {
            received * record.unit_price
        } else {
            0.0
        };
        let moved = monetary_total != 0.0;

        let received_cell = if received > 0.0 {
            LedgerCell::Number(received)
        } else if monetary_total == 0.0 {
            LedgerCell::NoChange
        } else {
            LedgerCell::Blank
        };

        let destination_label = if sourcing.trace.remaining > 0.0 {
            sourcing.destination_label
        } else {
            NO_TRANSFER.to_string()
        };

        LedgerRow {
            network_id: record.network_id.clone(),
            facility_id: record.facility_id.clone(),
            medication_code: record.medication_code.clone(),
            medication_name: record.medication_name.clone(),
            unit_price: record.unit_price,
            current_stock: if moved {
                LedgerCell::Number(record.current_stock)
            } else {
                LedgerCell::NoChange
            },
            supply: LedgerCell::Number(record.baseline_consumption),
            received: received_cell,
            final_stock: if moved {
                LedgerCell::Number(record.baseline_consumption + received)
            } else {
                LedgerCell::NoChange
            },
            monetary_total,
            origin_label: sourcing.origin_label,
            destination_label,
            availability: record.availability_score,
            state: classifier.classify(record.availability_score),
            original_order_index: record.original_order_index,
            trace: sourcing.trace,
        }
    }
}

impl RedistributionPolicy for FullRedistribution {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Full
    }

    fn layout(&self) -> LedgerLayout {
        LedgerLayout::Full
    }

    fn plan(
        &self,
        records: &[InventoryRecord],
        months: &[Month],
        classifier: &StateClassifier,
        progress: &mut dyn ProgressObserver,
    ) -> Vec<LedgerRow> {
        let mut tracker = ProgressTracker::new(records.len());
        let mut run_ledger = match self.depletion {
            DepletionMode::RunLedger => Some(StockLedger::new()),
            DepletionMode::Shadow => None,
        };

        let refs: Vec<&InventoryRecord> = records.iter().collect();
        let mut rows = Vec::with_capacity(records.len());

        for (network_id, group) in group_by_network(&refs) {
            debug!(network = %network_id, records = group.len(), "处理 micro red");

            for record in group {
                let sourcing = self.source(record, records, months, run_ledger.as_mut());
                rows.push(Self::build_row(record, sourcing, classifier));
                progress.on_progress(tracker.advance());
            }
        }

        rows.sort_by_key(|row| row.original_order_index);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StockState;
    use crate::engine::progress::NoOpProgress;
    use std::collections::BTreeMap;

    fn record(facility: &str, stock: f64, enero: f64, index: usize) -> InventoryRecord {
        InventoryRecord {
            network_id: "PURUS".to_string(),
            facility_code: format!("{:03}", index),
            facility_id: facility.to_string(),
            medication_code: "M01".to_string(),
            medication_name: "PARACETAMOL".to_string(),
            medication_type: "E".to_string(),
            unit_price: 2.0,
            current_stock: stock,
            availability_score: 4.0,
            monthly_consumption: BTreeMap::from([(Month::Enero, enero)]),
            baseline_consumption: 10.0,
            baseline_denominator: 20.0,
            supply_percentage: None,
            original_order_index: index,
        }
    }

    fn plan(records: &[InventoryRecord], depletion: DepletionMode) -> Vec<LedgerRow> {
        FullRedistribution::new(depletion).plan(
            records,
            &[Month::Enero],
            &StateClassifier::default(),
            &mut NoOpProgress,
        )
    }

    #[test]
    fn test_accumulate_demand_clamped_to_stock() {
        let mut r = record("A", 5.0, 3.0, 0);
        r.monthly_consumption.insert(Month::Febrero, 4.0);
        let demand =
            FullRedistribution::accumulate_demand(&r, &[Month::Enero, Month::Febrero]);
        assert_eq!(demand, 5.0);
    }

    #[test]
    fn test_accumulate_demand_zero_when_no_stock() {
        let r = record("A", 0.0, 3.0, 0);
        assert_eq!(FullRedistribution::accumulate_demand(&r, &[Month::Enero]), 0.0);
        let r = record("A", f64::NAN, 3.0, 0);
        assert_eq!(FullRedistribution::accumulate_demand(&r, &[Month::Enero]), 0.0);
    }

    #[test]
    fn test_accumulate_demand_nan_propagates() {
        let r = record("A", 5.0, f64::NAN, 0);
        assert!(FullRedistribution::accumulate_demand(&r, &[Month::Enero]).is_nan());
    }

    #[test]
    fn test_peer_supplies_demand() {
        let records = vec![record("A", 5.0, 3.0, 0), record("B", 8.0, 0.0, 1)];
        let rows = plan(&records, DepletionMode::Shadow);

        let a = &rows[0];
        assert_eq!(a.trace.accumulated, 3.0);
        assert_eq!(a.received, LedgerCell::Number(3.0));
        assert_eq!(a.monetary_total, 6.0);
        assert_eq!(a.current_stock, LedgerCell::Number(5.0));
        assert_eq!(a.final_stock, LedgerCell::Number(13.0));
        assert_eq!(a.supply, LedgerCell::Number(10.0));
        assert_eq!(a.origin_label, "A");
        // 需求已满足 → 不保留调出方标签
        assert_eq!(a.destination_label, NO_TRANSFER);

        let b = &rows[1];
        assert_eq!(b.received, LedgerCell::NoChange);
        assert_eq!(b.origin_label, NO_EXTRACTION);
        assert_eq!(b.state, StockState::NormalStock);
    }

    #[test]
    fn test_partial_supply_keeps_last_peer_label() {
        let records = vec![
            record("A", 9.0, 6.0, 0),
            record("B", 2.0, 0.0, 1),
            record("C", 1.0, 0.0, 2),
        ];
        let rows = plan(&records, DepletionMode::Shadow);

        let a = &rows[0];
        assert_eq!(a.trace.received, 3.0);
        assert_eq!(a.trace.remaining, 3.0);
        assert_eq!(a.destination_label, "C");
    }

    #[test]
    fn test_shadow_counter_allows_overallocation() {
        let records = vec![
            record("C", 4.0, 0.0, 0),
            record("A", 5.0, 4.0, 1),
            record("B", 5.0, 4.0, 2),
        ];
        let rows = plan(&records, DepletionMode::Shadow);
        // A 与 B 都从 C 获得 4，C 的库存被两次使用
        assert_eq!(rows[1].trace.received, 4.0);
        assert_eq!(rows[2].trace.received, 4.0);
        assert_eq!(records[0].current_stock, 4.0);
    }

    #[test]
    fn test_run_ledger_depletes_across_records() {
        let records = vec![
            record("A", 1.0, 1.0, 0),
            record("B", 1.0, 1.0, 1),
            record("D", 1.0, 1.0, 2),
        ];
        let shadow = plan(&records, DepletionMode::Shadow);
        let ledger = plan(&records, DepletionMode::RunLedger);

        assert_eq!(shadow[2].trace.received, 1.0);

        // A 取走 B 的 1，B 取走 A 的 1，D 已无可调来源
        assert_eq!(ledger[0].trace.received, 1.0);
        assert_eq!(ledger[1].trace.received, 1.0);
        assert_eq!(ledger[2].trace.received, 0.0);
        assert_eq!(ledger[2].trace.remaining, 1.0);
        assert_eq!(ledger[2].received, LedgerCell::NoChange);
        assert_eq!(ledger[2].destination_label, "B");
    }

    #[test]
    fn test_run_ledger_keeps_duplicate_peer_rows_apart() {
        let records = vec![
            record("A", 8.0, 8.0, 0),
            record("B", 3.0, 0.0, 1),
            record("B", 5.0, 0.0, 2),
        ];
        let shadow = plan(&records, DepletionMode::Shadow);
        let ledger = plan(&records, DepletionMode::RunLedger);

        assert_eq!(shadow[0].trace.received, 8.0);
        assert_eq!(ledger[0].trace.received, 8.0);
        assert_eq!(ledger[0].trace.remaining, 0.0);
    }

    #[test]
    fn test_run_ledger_records_self_reuse_against_duplicate() {
        let records = vec![
            record("A", 2.0, 2.0, 0),
            record("A", 2.0, 0.0, 1),
            record("C", 4.0, 4.0, 2),
        ];
        let shadow = plan(&records, DepletionMode::Shadow);
        let ledger = plan(&records, DepletionMode::RunLedger);

        assert_eq!(ledger[0].trace.self_reused, 2.0);
        // 影子计数下重复条目仍可全额调出
        assert_eq!(shadow[2].trace.received, 4.0);
        // 重复条目已被 A 的自身复用用尽，C 只能从 A 取 2
        assert_eq!(ledger[2].trace.received, 2.0);
        assert_eq!(ledger[2].trace.remaining, 2.0);
    }

    #[test]
    fn test_missing_price_yields_zero_total() {
        let mut a = record("A", 5.0, 3.0, 0);
        a.unit_price = f64::NAN;
        let records = vec![a, record("B", 8.0, 0.0, 1)];
        let rows = plan(&records, DepletionMode::Shadow);

        assert_eq!(rows[0].monetary_total, 0.0);
        assert_eq!(rows[0].received, LedgerCell::Number(3.0));
        assert_eq!(rows[0].current_stock, LedgerCell::NoChange);
        assert_eq!(rows[0].final_stock, LedgerCell::NoChange);
    }

    #[test]
    fn test_type_mismatch_is_not_a_peer() {
        let mut b = record("B", 8.0, 0.0, 1);
        b.medication_type = "N".to_string();
        let records = vec![record("A", 5.0, 3.0, 0), b];
        let rows = plan(&records, DepletionMode::Shadow);
        assert_eq!(rows[0].trace.received, 0.0);
        assert_eq!(rows[0].received, LedgerCell::NoChange);
    }
}
