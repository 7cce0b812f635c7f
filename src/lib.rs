// ==========================================
// 药品库存再分配系统 - 核心库
// ==========================================
// 流水线: 导入 → 供应百分比派生 → 再分配引擎（+ 状态判定）→ 台账 → 导出 / 筛选
// 系统定位: 决策支持（台账由人工审核后执行调拨）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 台账持久化
pub mod exporter;

// 台账筛选
pub mod filter;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 会话与用户操作
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    InventoryRecord, InventoryTable, Ledger, LedgerCell, LedgerLayout, LedgerRow, Month,
    StockState,
};

// 引擎
pub use engine::{
    DepletionMode, PolicyKind, RedistributionEngine, RedistributionError, StateClassifier,
    SupplyPercentageDeriver,
};

// 导入 / 导出 / 筛选
pub use exporter::ExportFormat;
pub use filter::LedgerFilter;
pub use importer::InventoryImporter;

// 应用
pub use app::Session;
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Redistribución de medicamentos";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
