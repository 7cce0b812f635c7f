// ==========================================
// 药品库存再分配系统 - 策略定义
// ==========================================
// 用途：
// - PolicyKind: 选择再分配策略（完整策略 / 仅正常库存的简化策略）；
// - DepletionMode: 调出方库存的扣减口径（单条记录内影子计数 / 整次运行台账）。

use serde::{Deserialize, Serialize};

/// 再分配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Full,
    NormalStock,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Full => "full",
            PolicyKind::NormalStock => "normal_stock",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PolicyKind::Full => "Redistribución completa",
            PolicyKind::NormalStock => "Redistribución en normo stock",
        }
    }
}

impl Default for PolicyKind {
    fn default() -> Self {
        PolicyKind::Full
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "completa" => Ok(PolicyKind::Full),
            "normal_stock" | "normal-stock" | "normo" => Ok(PolicyKind::NormalStock),
            other => Err(format!("未知策略类型: {}", other)),
        }
    }
}

/// 调出方库存扣减口径
///
/// - Shadow: 每条外层记录独立使用调出方的全部库存（影子计数随记录丢弃）
/// - RunLedger: 整次运行共享一份库存台账，已调出的数量对后续记录不可见
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepletionMode {
    Shadow,
    RunLedger,
}

impl DepletionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepletionMode::Shadow => "shadow",
            DepletionMode::RunLedger => "run_ledger",
        }
    }
}

impl Default for DepletionMode {
    fn default() -> Self {
        DepletionMode::Shadow
    }
}

impl std::str::FromStr for DepletionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shadow" => Ok(DepletionMode::Shadow),
            "run_ledger" | "run-ledger" => Ok(DepletionMode::RunLedger),
            other => Err(format!("未知扣减口径: {}", other)),
        }
    }
}
