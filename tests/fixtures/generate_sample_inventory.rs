// ==========================================
// 示例库存数据生成器
// ==========================================
// 用途: 生成 3 个库存 CSV 数据集
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use csv::Writer;
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// CSV 表头（与导出自药品管理系统的列名一致，大小写混排）
const CSV_HEADER: &[&str] = &[
    "MICRO RED",
    "CODIGO_EST",
    "ESTABLECIMIENTO",
    "CODIGO",
    "MEDICAMENTOS",
    "PRECIO",
    "TIPO",
    "STOCK",
    "TOTAL",
    "CPA",
    "DISPONIBILIDAD",
    "SETIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
    "ENERO",
    "FEBRERO",
];

const NETWORKS: [&str; 3] = ["PURUS", "IPARIA", "MASISEA"];

const FACILITIES: [&str; 4] = ["ESPERANZA", "SAN JOSE", "NUEVA LUZ", "CALLERIA"];

const MEDICATIONS: [(&str, &str, f64); 5] = [
    ("M01", "PARACETAMOL 500MG TAB", 0.05),
    ("M02", "AMOXICILINA 250MG/5ML SUSP", 2.8),
    ("M03", "IBUPROFENO 400MG TAB", 0.07),
    ("M04", "SALES DE REHIDRATACION ORAL", 0.9),
    ("M05", "METFORMINA 850MG TAB", 0.12),
];

// 库存记录结构
#[derive(Clone)]
struct InventoryRow {
    network: String,
    facility_code: String,
    facility: String,
    code: String,
    name: String,
    price: String,
    kind: String,
    stock: String,
    total: String,
    cpa: String,
    availability: String,
    months: Vec<String>,
}

impl InventoryRow {
    fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.network.clone(),
            self.facility_code.clone(),
            self.facility.clone(),
            self.code.clone(),
            self.name.clone(),
            self.price.clone(),
            self.kind.clone(),
            self.stock.clone(),
            self.total.clone(),
            self.cpa.clone(),
            self.availability.clone(),
        ];
        row.extend(self.months.iter().cloned());
        row
    }
}

/// 按序号确定性生成一条记录（同一序号总是得到同一行）
fn generate_record(index: usize) -> InventoryRow {
    let network = NETWORKS[index % NETWORKS.len()];
    let facility_idx = (index / MEDICATIONS.len()) % FACILITIES.len();
    let (code, name, price) = MEDICATIONS[index % MEDICATIONS.len()];

    let months: Vec<f64> = (0..6)
        .map(|m| ((index * 7 + m * 3) % 11) as f64)
        .collect();
    let cpa = months.iter().sum::<f64>() / months.len() as f64;
    // 部分记录库存为 0，制造缺口
    let stock = if index % 6 == 0 { 0.0 } else { ((index * 13) % 40) as f64 };
    let availability = if cpa > 0.0 { stock / cpa } else { 0.0 };

    InventoryRow {
        network: network.to_string(),
        facility_code: format!("{:05}", 100 + facility_idx),
        facility: FACILITIES[facility_idx].to_string(),
        code: code.to_string(),
        name: name.to_string(),
        price: price.to_string(),
        kind: if index % 9 == 0 { "N" } else { "E" }.to_string(),
        stock: stock.to_string(),
        total: (cpa * 12.0).to_string(),
        cpa: format!("{:.2}", cpa),
        availability: format!("{:.2}", availability),
        months: months.iter().map(|v| v.to_string()).collect(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成示例库存数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. 正常数据 (60条)
    generate_normal_data()?;

    // 2. 缺少必需列
    generate_missing_columns()?;

    // 3. 含无法解析的数值
    generate_dirty_values()?;

    println!("✓ 所有示例数据集生成完成！");
    Ok(())
}

fn generate_normal_data() -> Result<(), Box<dyn Error>> {
    let path = format!("{}/01_inventory.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);

    wtr.write_record(CSV_HEADER)?;
    for i in 0..60 {
        wtr.write_record(&generate_record(i).to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_inventory.csv (60条)");
    Ok(())
}

fn generate_missing_columns() -> Result<(), Box<dyn Error>> {
    let path = format!("{}/02_missing_columns.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);

    // 去掉 CPA 与 DISPONIBILIDAD
    let header: Vec<&str> = CSV_HEADER
        .iter()
        .copied()
        .filter(|h| *h != "CPA" && *h != "DISPONIBILIDAD")
        .collect();
    wtr.write_record(&header)?;

    for i in 0..10 {
        let mut row = generate_record(i).to_row();
        row.remove(10);
        row.remove(9);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    println!("✓ 生成 02_missing_columns.csv (10条，缺 cpa / disponibilidad)");
    Ok(())
}

fn generate_dirty_values() -> Result<(), Box<dyn Error>> {
    let path = format!("{}/03_dirty_values.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);

    wtr.write_record(CSV_HEADER)?;
    for i in 0..20 {
        let mut record = generate_record(i);
        match i % 4 {
            0 => record.stock = "sin dato".to_string(),
            1 => record.price = String::new(),
            2 => record.months[0] = "-".to_string(),
            _ => {}
        }
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 03_dirty_values.csv (20条，含无法解析的数值)");
    Ok(())
}
