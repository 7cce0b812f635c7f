// ==========================================
// 药品库存再分配系统 - 应用层
// ==========================================
// 职责: 调用方持有的会话状态（当前数据集、当前台账）与四个用户操作
// 操作: 导入 / 再分配 / 导出 / 筛选，返回本地化提示
// ==========================================

pub mod error;
pub mod run_report;
pub mod state;

// 重导出
pub use error::{AppError, AppResult};
pub use run_report::RunReport;
pub use state::Session;
