// ==========================================
// 药品库存再分配系统 - 会话状态
// ==========================================
// 职责: 持有当前数据集与当前台账，提供导入 / 再分配 / 导出 / 筛选四个操作
// 红线: 引擎不持有状态，所有跨调用状态都在 Session 中，由调用方拥有
// ==========================================

use crate::app::error::{AppError, AppResult};
use crate::app::run_report::RunReport;
use crate::config::AppConfig;
use crate::domain::ledger::Ledger;
use crate::engine::{ProgressObserver, RedistributionEngine, SupplyPercentageDeriver};
use crate::engine::strategy::PolicyKind;
use crate::exporter::{export_ledger, ExportFormat};
use crate::filter::LedgerFilter;
use crate::i18n::{set_locale, t, t_with_args};
use crate::importer::{ImportOutcome, InventoryImporter};
use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// 会话
///
/// 一个会话对应一次交互过程：导入文件后可多次再分配、导出、筛选
pub struct Session {
    config: AppConfig,
    importer: InventoryImporter,
    dataset: Option<ImportOutcome>,
    ledger: Option<Ledger>,
    last_report: Option<RunReport>,
}

impl Session {
    /// 创建会话并应用配置中的语言
    pub fn new(config: AppConfig) -> Self {
        set_locale(&config.locale);
        Self {
            config,
            importer: InventoryImporter::new(),
            dataset: None,
            ledger: None,
            last_report: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&ImportOutcome> {
        self.dataset.as_ref()
    }

    pub fn ledger(&self) -> Option<&Ledger> {
        self.ledger.as_ref()
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// 导入库存文件（替换当前数据集，清空旧台账）
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> AppResult<String> {
        let outcome = self.importer.import_file(path)?;
        self.load_dataset(outcome)
    }

    /// 使用已导入的数据集（替换当前数据集，清空旧台账）
    pub fn load_dataset(&mut self, outcome: ImportOutcome) -> AppResult<String> {
        let message = t_with_args(
            "status.import_ok",
            &[
                ("records", outcome.table.len().to_string().as_str()),
                ("months", outcome.months().len().to_string().as_str()),
            ],
        );

        self.dataset = Some(outcome);
        self.ledger = None;
        self.last_report = None;
        Ok(message)
    }

    /// 对当前数据集执行再分配
    ///
    /// 完整策略先派生供应百分比，再在派生副本上运行
    pub fn redistribute(&mut self, progress: &mut dyn ProgressObserver) -> AppResult<String> {
        let dataset = self.dataset.as_ref().ok_or(AppError::NoDataset)?;
        let started_at = Utc::now();

        let engine = RedistributionEngine::from_kind(self.config.policy, self.config.depletion)
            .with_classifier(self.config.classifier());

        let ledger = match self.config.policy {
            PolicyKind::Full => {
                let enriched = SupplyPercentageDeriver::new().derive_table(&dataset.table);
                engine.redistribute_table(&enriched, progress)?
            }
            PolicyKind::NormalStock => engine.redistribute_table(&dataset.table, progress)?,
        };

        let summary = ledger.summary();
        let report = RunReport {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            policy: self.config.policy,
            depletion: self.config.depletion,
            months: dataset.months(),
            input_records: dataset.table.len(),
            extra_columns: dataset.extra_columns.clone(),
            coercion_anomalies: dataset.coercion_anomalies.len(),
            summary,
        };

        info!(
            run_id = %report.run_id,
            rows = report.summary.rows,
            duration_ms = report.duration_ms(),
            "会话再分配完成"
        );

        let message = t_with_args(
            "status.redistributed",
            &[
                ("policy", self.config.policy.title()),
                ("rows", report.summary.rows.to_string().as_str()),
                ("moved", report.summary.rows_with_movement.to_string().as_str()),
            ],
        );

        self.ledger = Some(ledger);
        self.last_report = Some(report);
        Ok(message)
    }

    /// 导出当前台账；format 为空时按扩展名推断，无法推断则用 CSV
    pub fn export<P: AsRef<Path>>(&self, path: P, format: Option<ExportFormat>) -> AppResult<String> {
        let ledger = self.ledger.as_ref().ok_or(AppError::NoLedger)?;
        let path = path.as_ref();
        let format = format
            .or_else(|| ExportFormat::from_path(path))
            .unwrap_or_default();

        export_ledger(ledger, path, format)?;
        Ok(t_with_args(
            "status.exported",
            &[("path", path.display().to_string().as_str())],
        ))
    }

    /// 筛选当前台账（不改变会话中的台账）
    ///
    /// 无台账时返回提示而非错误
    pub fn filter(&self, filter: &LedgerFilter) -> (Option<Ledger>, String) {
        let Some(ledger) = self.ledger.as_ref() else {
            warn!("筛选时尚无台账");
            return (None, t("error.nothing_to_filter"));
        };

        let filtered = filter.apply(ledger);
        let message = if filtered.is_empty() {
            t("status.filter_no_match")
        } else {
            t_with_args("status.filtered", &[("rows", filtered.len().to_string().as_str())])
        };
        (Some(filtered), message)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::{InventoryRecord, InventoryTable};
    use crate::domain::types::Month;
    use crate::engine::NoOpProgress;
    use crate::i18n::LOCALE_TEST_LOCK;
    use std::collections::BTreeMap;

    fn outcome() -> ImportOutcome {
        let record = |facility: &str, stock: f64, enero: f64, index: usize| InventoryRecord {
            network_id: "PURUS".to_string(),
            facility_code: format!("{:03}", index),
            facility_id: facility.to_string(),
            medication_code: "M01".to_string(),
            medication_name: "PARACETAMOL".to_string(),
            medication_type: "E".to_string(),
            unit_price: 2.0,
            current_stock: stock,
            availability_score: 4.0,
            monthly_consumption: BTreeMap::from([(Month::Enero, enero)]),
            baseline_consumption: 10.0,
            baseline_denominator: 20.0,
            supply_percentage: None,
            original_order_index: index,
        };

        ImportOutcome {
            table: InventoryTable::from_records(vec![
                record("ESPERANZA", 5.0, 3.0, 0),
                record("SAN JOSE", 8.0, 0.0, 1),
            ]),
            extra_columns: vec![],
            coercion_anomalies: vec![],
        }
    }

    #[test]
    fn test_redistribute_requires_dataset() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut session = Session::default();
        let err = session.redistribute(&mut NoOpProgress).unwrap_err();
        assert!(matches!(err, AppError::NoDataset));
        assert_eq!(
            err.localized_message(),
            "No hay datos cargados. Importe un archivo primero"
        );
    }

    #[test]
    fn test_session_flow() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut session = Session::default();

        let message = session.load_dataset(outcome()).unwrap();
        assert_eq!(message, "Archivo importado: 2 registros, 1 meses con salidas");

        session.redistribute(&mut NoOpProgress).unwrap();
        let report = session.last_report().unwrap();
        assert_eq!(report.input_records, 2);
        assert_eq!(report.summary.rows, 2);
        assert_eq!(report.summary.rows_with_movement, 1);
        assert_eq!(report.summary.total_amount, 6.0);

        let (filtered, message) = session.filter(&LedgerFilter::new().facility("jose"));
        assert_eq!(filtered.unwrap().len(), 1);
        assert_eq!(message, "1 filas coinciden con el filtro");

        let (_, message) = session.filter(&LedgerFilter::new().network("IPARIA"));
        assert_eq!(message, "Ninguna fila coincide con el filtro");
    }

    #[test]
    fn test_export_and_filter_without_ledger() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut config = AppConfig::default();
        config.locale = "en".to_string();
        let session = Session::new(config);

        let err = session.export("ledger.csv", None).unwrap_err();
        assert!(matches!(err, AppError::NoLedger));
        assert_eq!(err.localized_message(), "There is no data to export");

        let (ledger, message) = session.filter(&LedgerFilter::new());
        assert!(ledger.is_none());
        assert_eq!(message, "There is no data to filter");

        set_locale("es");
    }

    #[test]
    fn test_export_writes_file() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redistribucion.json");

        let mut session = Session::default();
        session.load_dataset(outcome()).unwrap();
        session.redistribute(&mut NoOpProgress).unwrap();

        let message = session.export(&path, None).unwrap();
        assert!(message.starts_with("Datos exportados a"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"layout\": \"full\""));
    }
}
