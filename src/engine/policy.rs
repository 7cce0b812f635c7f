// ==========================================
// 药品库存再分配系统 - 再分配策略接口
// ==========================================
// 职责: 统一完整策略与简化策略的入口，共享 StateClassifier
// 访问顺序: 按 micro red 首次出现的顺序分组，组内保持输入顺序
// 输出顺序: 按 original_order_index 恢复
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::domain::ledger::{LedgerLayout, LedgerRow};
use crate::domain::types::Month;
use crate::engine::full_redistribution::FullRedistribution;
use crate::engine::normal_stock_redistribution::NormalStockRedistribution;
use crate::engine::progress::ProgressObserver;
use crate::engine::state_classifier::StateClassifier;
use crate::engine::strategy::{DepletionMode, PolicyKind};

/// 再分配策略
pub trait RedistributionPolicy: Send + Sync {
    fn kind(&self) -> PolicyKind;

    fn layout(&self) -> LedgerLayout;

    /// 生成台账行
    ///
    /// # 参数
    /// - records: 全部输入记录（只读）
    /// - months: 已确认存在的月份列（财政年度顺序，非空）
    /// - classifier: 状态判定器
    /// - progress: 每处理一条记录回调一次
    fn plan(
        &self,
        records: &[InventoryRecord],
        months: &[Month],
        classifier: &StateClassifier,
        progress: &mut dyn ProgressObserver,
    ) -> Vec<LedgerRow>;
}

/// 按配置构建策略
pub fn build_policy(kind: PolicyKind, depletion: DepletionMode) -> Box<dyn RedistributionPolicy> {
    match kind {
        PolicyKind::Full => Box::new(FullRedistribution::new(depletion)),
        PolicyKind::NormalStock => Box::new(NormalStockRedistribution::new()),
    }
}

/// 按 micro red 分组（组的顺序 = 首次出现顺序，组内 = 输入顺序）
pub fn group_by_network<'a>(
    records: &[&'a InventoryRecord],
) -> Vec<(String, Vec<&'a InventoryRecord>)> {
    let mut groups: Vec<(String, Vec<&'a InventoryRecord>)> = Vec::new();
    for &record in records {
        match groups
            .iter_mut()
            .find(|(network, _)| *network == record.network_id)
        {
            Some((_, members)) => members.push(record),
            None => groups.push((record.network_id.clone(), vec![record])),
        }
    }
    groups
}
