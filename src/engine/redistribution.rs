// ==========================================
// 药品库存再分配系统 - 再分配引擎
// ==========================================
// 主流程:
//   1. 结构校验: 必需列缺失 → 整次运行拒绝（MissingColumns）
//   2. 月份确认: 调用方给出的月份 ∩ 输入中存在的月份列，空集 → NoValidMonths
//   3. 策略执行: 按 micro red 分组逐条计算，每条回调一次进度
//   4. 输出: 台账行数 = 输入记录数（简化策略为筛选后的记录数），按原始顺序
// 红线: 引擎不持有跨调用状态，输入表只读
// ==========================================

use crate::domain::inventory::InventoryTable;
use crate::domain::ledger::Ledger;
use crate::domain::types::Month;
use crate::engine::error::{RedistributionError, RedistributionResult};
use crate::engine::policy::{build_policy, RedistributionPolicy};
use crate::engine::progress::ProgressObserver;
use crate::engine::state_classifier::StateClassifier;
use crate::engine::strategy::{DepletionMode, PolicyKind};
use tracing::{error, info, warn};

// ==========================================
// RedistributionEngine - 再分配引擎
// ==========================================
pub struct RedistributionEngine {
    classifier: StateClassifier,
    policy: Box<dyn RedistributionPolicy>,
}

impl RedistributionEngine {
    /// 以指定策略创建引擎（默认阈值）
    pub fn new(policy: Box<dyn RedistributionPolicy>) -> Self {
        Self {
            classifier: StateClassifier::default(),
            policy,
        }
    }

    /// 按策略类型与扣减口径创建引擎
    pub fn from_kind(kind: PolicyKind, depletion: DepletionMode) -> Self {
        Self::new(build_policy(kind, depletion))
    }

    /// 替换状态判定器
    pub fn with_classifier(mut self, classifier: StateClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &StateClassifier {
        &self.classifier
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// 执行再分配
    ///
    /// # 参数
    /// - table: 输入快照（列名已小写）
    /// - months: 调用方选定的月份；不存在于输入列中的月份被忽略
    /// - progress: 进度观察者
    ///
    /// # 返回
    /// - Ok(Ledger): 按 original_order_index 排序的台账
    /// - Err(MissingColumns): 缺少必需列
    /// - Err(NoValidMonths): 没有可用月份列
    pub fn redistribute(
        &self,
        table: &InventoryTable,
        months: &[Month],
        progress: &mut dyn ProgressObserver,
    ) -> RedistributionResult<Ledger> {
        let missing = table.missing_columns();
        if !missing.is_empty() {
            error!(missing = ?missing, "输入缺少必需列，拒绝执行再分配");
            return Err(RedistributionError::MissingColumns(missing));
        }

        let months = Self::resolve_months(table, months);
        if months.is_empty() {
            warn!("输入中没有可用的月份列，跳过再分配");
            return Err(RedistributionError::NoValidMonths);
        }

        info!(
            policy = self.policy.kind().as_str(),
            records = table.len(),
            months = months.len(),
            "开始执行再分配"
        );

        let rows = self
            .policy
            .plan(table.records(), &months, &self.classifier, progress);
        let ledger = Ledger::new(self.policy.layout(), rows);

        info!(
            rows = ledger.len(),
            rows_with_movement = ledger.rows.iter().filter(|r| r.has_movement()).count(),
            "再分配完成"
        );

        Ok(ledger)
    }

    /// 使用输入中全部月份列执行再分配
    pub fn redistribute_table(
        &self,
        table: &InventoryTable,
        progress: &mut dyn ProgressObserver,
    ) -> RedistributionResult<Ledger> {
        self.redistribute(table, &table.months(), progress)
    }

    /// 调用方月份 ∩ 输入月份，去重后按财政年度排序
    fn resolve_months(table: &InventoryTable, requested: &[Month]) -> Vec<Month> {
        let available = table.months();
        let mut months: Vec<Month> = requested
            .iter()
            .copied()
            .filter(|m| available.contains(m))
            .collect();
        months.sort();
        months.dedup();
        months
    }
}

impl Default for RedistributionEngine {
    fn default() -> Self {
        Self::from_kind(PolicyKind::default(), DepletionMode::default())
    }
}
