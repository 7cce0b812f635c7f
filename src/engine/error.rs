// ==========================================
// 药品库存再分配系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 数值转换失败不是错误，按 NaN 参与计算
// ==========================================

use thiserror::Error;

/// 再分配引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RedistributionError {
    /// 输入缺少必需列（整次运行拒绝）
    #[error("缺少必需列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// 输入中没有任何可用的月份列
    #[error("没有可用于再分配的月份列")]
    NoValidMonths,
}

/// Result 类型别名
pub type RedistributionResult<T> = Result<T, RedistributionError>;
