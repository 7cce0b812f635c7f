// ==========================================
// 药品库存再分配系统 - 运行配置
// ==========================================
// 配置项:
//   policy     : full | normal_stock（默认 full）
//   depletion  : shadow | run_ledger（默认 shadow）
//   thresholds : { critical_below, sub_stock_below, normal_up_to }
//   locale     : es | en（默认 es）
// 环境变量 MEDREDIS_POLICY / MEDREDIS_LOCALE 覆写文件值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::engine::state_classifier::{StateClassifier, StateThresholds};
use crate::engine::strategy::{DepletionMode, PolicyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 环境变量名
pub mod config_env {
    pub const CONFIG_PATH: &str = "MEDREDIS_CONFIG";
    pub const POLICY: &str = "MEDREDIS_POLICY";
    pub const LOCALE: &str = "MEDREDIS_LOCALE";
}

pub const SUPPORTED_LOCALES: [&str; 2] = ["es", "en"];

const CONFIG_DIR_NAME: &str = "medication-redistribution";
const CONFIG_FILE_NAME: &str = "config.json";

fn default_locale() -> String {
    "es".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default)]
    pub depletion: DepletionMode,
    #[serde(default)]
    pub thresholds: StateThresholds,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            depletion: DepletionMode::default(),
            thresholds: StateThresholds::default(),
            locale: default_locale(),
        }
    }
}

impl AppConfig {
    /// 用户配置目录下的默认配置文件
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 解析 JSON 配置（缺省字段取默认值）
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 读取配置文件
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "已读取配置文件");
        Ok(config)
    }

    /// 按查找顺序加载，并应用环境变量覆写
    ///
    /// 显式路径与 MEDREDIS_CONFIG 指向的文件必须存在；
    /// 用户配置目录下的文件不存在时使用内置默认值
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let env_path = std::env::var(config_env::CONFIG_PATH).ok();

        let mut config = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env_path.map(PathBuf::from))
        {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(
            std::env::var(config_env::POLICY).ok().as_deref(),
            std::env::var(config_env::LOCALE).ok().as_deref(),
        )?;

        info!(
            policy = config.policy.as_str(),
            depletion = config.depletion.as_str(),
            locale = %config.locale,
            "配置加载完成"
        );
        Ok(config)
    }

    /// 覆写策略与语言
    pub fn apply_overrides(
        &mut self,
        policy: Option<&str>,
        locale: Option<&str>,
    ) -> ConfigResult<()> {
        if let Some(value) = policy {
            self.policy = value
                .parse()
                .map_err(|_| ConfigError::UnknownPolicy(value.to_string()))?;
        }
        if let Some(value) = locale {
            self.locale = value.trim().to_lowercase();
        }
        self.validate()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(ConfigError::UnknownLocale(self.locale.clone()));
        }

        let t = &self.thresholds;
        if !(t.critical_below <= t.sub_stock_below && t.sub_stock_below <= t.normal_up_to) {
            return Err(ConfigError::InvalidThresholds {
                critical_below: t.critical_below,
                sub_stock_below: t.sub_stock_below,
                normal_up_to: t.normal_up_to,
            });
        }
        Ok(())
    }

    pub fn classifier(&self) -> StateClassifier {
        StateClassifier::new(self.thresholds)
    }
}

/// 解析扣减口径名称
pub fn parse_depletion(value: &str) -> ConfigResult<DepletionMode> {
    value
        .parse()
        .map_err(|_| ConfigError::UnknownDepletion(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_fields_absent() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.thresholds.normal_up_to, 6.0);
        assert_eq!(config.locale, "es");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "policy": "normal_stock", "depletion": "run_ledger",
                 "thresholds": {{ "critical_below": 1.5 }}, "locale": "en" }}"#
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.policy, PolicyKind::NormalStock);
        assert_eq!(config.depletion, DepletionMode::RunLedger);
        assert_eq!(config.thresholds.critical_below, 1.5);
        assert_eq!(config.thresholds.sub_stock_below, 3.0);
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn test_unknown_policy_name_is_error() {
        let err = AppConfig::from_json_str(r#"{ "policy": "greedy" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let mut config = AppConfig::default();
        let err = config.apply_overrides(Some("greedy"), None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPolicy(name) if name == "greedy"));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(Some("normal-stock"), Some(" EN "))
            .unwrap();
        assert_eq!(config.policy, PolicyKind::NormalStock);
        assert_eq!(config.locale, "en");

        assert!(matches!(
            config.apply_overrides(None, Some("fr")),
            Err(ConfigError::UnknownLocale(_))
        ));
    }

    #[test]
    fn test_thresholds_must_increase() {
        let err = AppConfig::from_json_str(
            r#"{ "thresholds": { "critical_below": 4, "sub_stock_below": 3 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = AppConfig::load_from_file("/nonexistent/medredis.json").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_parse_depletion() {
        assert_eq!(parse_depletion("run_ledger").unwrap(), DepletionMode::RunLedger);
        assert!(matches!(
            parse_depletion("fifo"),
            Err(ConfigError::UnknownDepletion(_))
        ));
    }
}
