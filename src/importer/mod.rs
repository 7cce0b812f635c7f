// ==========================================
// 药品库存再分配系统 - 导入层
// ==========================================
// 职责: 外部库存表 → InventoryTable
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod inventory_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use inventory_importer::{ImportOutcome, InventoryImporter};

// 重导出 Trait 接口
pub use importer_trait::{CoercionAnomaly, DataCleaner, FieldMapper, FileParser, RawSheet};
