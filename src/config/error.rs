// ==========================================
// 药品库存再分配系统 - 配置错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("未知再分配策略: {0}")]
    UnknownPolicy(String),

    #[error("未知库存扣减口径: {0}")]
    UnknownDepletion(String),

    #[error("不支持的语言: {0}（仅支持 es/en）")]
    UnknownLocale(String),

    #[error("状态阈值必须递增: critical_below={critical_below}, sub_stock_below={sub_stock_below}, normal_up_to={normal_up_to}")]
    InvalidThresholds {
        critical_below: f64,
        sub_stock_below: f64,
        normal_up_to: f64,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
