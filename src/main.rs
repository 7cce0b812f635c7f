// ==========================================
// 药品库存再分配系统 - 命令行入口
// ==========================================
// 用法: medication-redistribution run <input> [--output <path>] [--policy ...]
// 输出: 进度与日志写 stderr，运行报告（JSON）写 stdout
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand};
use medication_redistribution::app::AppResult;
use medication_redistribution::config::parse_depletion;
use medication_redistribution::logging::LogFormat;
use medication_redistribution::{logging, AppConfig, ExportFormat, LedgerFilter, Session, StockState};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// 以 JSON 格式输出日志
    #[arg(long, global = true, env = "MEDREDIS_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 导入库存表并生成再分配台账
    Run(RunArgs),
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// 库存文件（.csv / .xlsx / .xls）
    input: PathBuf,

    /// 台账输出路径
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 台账格式（csv / json），缺省按输出扩展名推断
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// 再分配策略（full / normal_stock），覆盖配置文件
    #[arg(long)]
    policy: Option<String>,

    /// 库存扣减口径（shadow / run_ledger），覆盖配置文件
    #[arg(long)]
    depletion: Option<String>,

    /// 配置文件路径
    #[arg(long, env = "MEDREDIS_CONFIG")]
    config: Option<PathBuf>,

    /// micro red 子串筛选（筛选参数只作用于导出，需同时给出 --output）
    #[arg(long, requires = "output")]
    network: Option<String>,

    /// 机构子串筛选
    #[arg(long, requires = "output")]
    facility: Option<String>,

    /// 药品名称子串筛选
    #[arg(long, requires = "output")]
    medication: Option<String>,

    /// 状态标签（CRITICO / SUB STOCK / NORMO STOCK / SOBRE STOCK / SIN DATO）
    #[arg(long, requires = "output")]
    state: Option<StockState>,

    /// disponibilidad 下限（含）
    #[arg(long, requires = "output")]
    min_availability: Option<f64>,

    /// disponibilidad 上限（含）
    #[arg(long, requires = "output")]
    max_availability: Option<f64>,
}

impl RunArgs {
    fn filter(&self) -> LedgerFilter {
        LedgerFilter {
            network: self.network.clone(),
            facility: self.facility.clone(),
            medication: self.medication.clone(),
            state: self.state,
            min_availability: self.min_availability,
            max_availability: self.max_availability,
        }
    }
}

/// 导入并再分配，进度写 stderr
fn import_and_redistribute(
    session: &mut Session,
    input: &Path,
    messages: &mut Vec<String>,
) -> AppResult<()> {
    messages.push(session.import_file(input)?);

    let mut last = None;
    let mut progress = |percent: u8| {
        if last != Some(percent) {
            last = Some(percent);
            eprint!("\r{:>3}%", percent);
        }
    };
    messages.push(session.redistribute(&mut progress)?);
    eprintln!();
    Ok(())
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_overrides(args.policy.as_deref(), None)?;
    if let Some(depletion) = args.depletion.as_deref() {
        config.depletion = parse_depletion(depletion)?;
    }

    let mut session = Session::new(config);
    let mut messages = Vec::new();

    if let Err(err) = import_and_redistribute(&mut session, &args.input, &mut messages) {
        eprintln!("{}", err.localized_message());
        return Err(err).context("redistribución abortada");
    }

    let filter = args.filter();
    if let Some(output) = args.output.as_ref() {
        if filter.is_empty() {
            messages.push(session.export(output, args.format)?);
        } else {
            let (filtered, message) = session.filter(&filter);
            messages.push(message);
            if let Some(filtered) = filtered {
                let format = args
                    .format
                    .or_else(|| ExportFormat::from_path(output))
                    .unwrap_or_default();
                medication_redistribution::exporter::export_ledger(&filtered, output, format)?;
            }
        }
    }

    let report = session
        .last_report()
        .context("no se generó el reporte de ejecución")?;
    let document = json!({
        "app": medication_redistribution::APP_NAME,
        "version": medication_redistribution::VERSION,
        "report": report,
        "messages": messages,
    });

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &document)?;
    writeln!(handle)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_with(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    tracing::info!("{} v{}", medication_redistribution::APP_NAME, medication_redistribution::VERSION);

    match cli.command {
        Command::Run(args) => run(args),
    }
}
