// ==========================================
// 药品库存再分配系统 - 运行报告
// ==========================================
// 每次再分配生成一份报告: 运行 ID、起止时间、策略、输入规模与台账汇总
// ==========================================

use crate::domain::ledger::LedgerSummary;
use crate::domain::types::Month;
use crate::engine::strategy::{DepletionMode, PolicyKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub policy: PolicyKind,
    pub depletion: DepletionMode,
    pub months: Vec<Month>,
    pub input_records: usize,
    pub extra_columns: Vec<String>,
    pub coercion_anomalies: usize,
    pub summary: LedgerSummary,
}

impl RunReport {
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
