// ==========================================
// 药品库存再分配系统 - 应用层错误类型
// ==========================================
// 职责: 汇总各层错误，并给出面向用户的本地化提示
// ==========================================

use crate::config::ConfigError;
use crate::engine::RedistributionError;
use crate::exporter::ExportError;
use crate::i18n::{t, t_with_args};
use crate::importer::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Redistribution(#[from] RedistributionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 尚未导入数据
    #[error("尚未导入库存数据")]
    NoDataset,

    /// 尚未生成台账
    #[error("尚未生成再分配台账")]
    NoLedger,
}

impl AppError {
    /// 本地化提示（语言取当前 locale）
    pub fn localized_message(&self) -> String {
        match self {
            AppError::Import(ImportError::MissingColumns(columns))
            | AppError::Redistribution(RedistributionError::MissingColumns(columns)) => {
                t_with_args("error.missing_columns", &[("columns", columns.join(", ").as_str())])
            }
            AppError::Redistribution(RedistributionError::NoValidMonths) => {
                t("error.no_valid_months")
            }
            AppError::Import(err) => {
                t_with_args("error.import_failed", &[("detail", err.to_string().as_str())])
            }
            AppError::Export(err) => {
                t_with_args("error.export_failed", &[("detail", err.to_string().as_str())])
            }
            AppError::Config(err) => {
                t_with_args("error.config_failed", &[("detail", err.to_string().as_str())])
            }
            AppError::NoDataset => t("error.no_dataset"),
            AppError::NoLedger => t("error.nothing_to_export"),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
