// ==========================================
// 药品库存再分配系统 - 配置层
// ==========================================
// 职责: 运行配置加载（JSON 文件 + 环境变量覆写）
// 查找顺序: 显式路径 → MEDREDIS_CONFIG → 用户配置目录 → 内置默认值
// ==========================================

pub mod app_config;
pub mod error;

pub use app_config::{config_env, parse_depletion, AppConfig, SUPPORTED_LOCALES};
pub use error::{ConfigError, ConfigResult};
