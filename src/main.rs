// ==========================================
// 零售生产与补货核心 - 命令行入口
// ==========================================
// 用法:
//   retail-ops check <snapshot.json> [now]   排程检查 + 补货评估,输出 JSON 报告
//   retail-ops import-rules <rules.csv>      校验补货规则文件,输出规则 JSON
//   retail-ops import-stock <stock.csv>      校验库存文件,输出快照 JSON
//
// now 格式: 2026-03-02T08:00:00; 缺省时取快照中的 now,再缺省取本地时间
// 日志: RUST_LOG 控制级别; RETAIL_OPS_LOG_FORMAT=json 输出 JSON 日志
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use retail_ops_core::config::ConfigManager;
use retail_ops_core::datasource::{JsonSnapshotSource, PlanningDataSource};
use retail_ops_core::engine::{
    NoOpActionPublisher, OptionalActionPublisher, PlanningOrchestrator, RejectedRequest,
    ReplenishmentReport, ScheduleReport,
};
use retail_ops_core::importer::{ImportReport, RuleImporter, StockImporter};
use retail_ops_core::{i18n, logging};
use serde::Serialize;
use std::sync::Arc;

const USAGE: &str = "用法: retail-ops <check|import-rules|import-stock> <file> [now]";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanningReport {
    now: NaiveDateTime,
    rejected_requests: Vec<RejectedRequest>,
    schedule: ScheduleReport,
    replenishment: ReplenishmentReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportOutput<T: Serialize> {
    total_rows: usize,
    records: Vec<T>,
    errors: Vec<String>,
}

impl<T: Serialize> From<ImportReport<T>> for ImportOutput<T> {
    fn from(report: ImportReport<T>) -> Self {
        Self {
            total_rows: report.total_rows,
            errors: report.errors.iter().map(|e| e.to_string()).collect(),
            records: report.records,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match std::env::var("RETAIL_OPS_LOG_FORMAT").as_deref() {
        Ok("json") => logging::init_json(),
        _ => logging::init(),
    }

    tracing::info!("{} v{}", retail_ops_core::APP_NAME, retail_ops_core::VERSION);

    let config = ConfigManager::load_default().context("加载配置失败")?;
    let engine_config = config.engine_config().context("配置校验失败")?;
    i18n::set_locale(&engine_config.locale);

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();
    let Some(file) = args.next() else {
        bail!(USAGE);
    };

    let output = match command.as_str() {
        "check" => {
            let now_arg = args.next().map(|s| parse_now(&s)).transpose()?;
            let source = JsonSnapshotSource::open(&file).await?;
            let now = now_arg
                .or_else(|| source.now())
                .unwrap_or_else(|| chrono::Local::now().naive_local());
            let input = source.load_all().await?;

            let orchestrator = PlanningOrchestrator::new(
                engine_config,
                OptionalActionPublisher::new(Arc::new(NoOpActionPublisher)),
            );

            let mut schedule = input.schedule;
            let rejected_requests = orchestrator.apply_schedule_requests(
                &mut schedule,
                input.schedule_requests,
                &input.resources,
                Some(now),
            );
            let schedule_report =
                orchestrator.run_schedule_check(&schedule, &input.resources, &input.materials);
            let replenishment = orchestrator
                .evaluate_by_store(input.stock, input.rules, input.tagged_alerts, now)
                .await?;

            serde_json::to_string_pretty(&PlanningReport {
                now,
                rejected_requests,
                schedule: schedule_report,
                replenishment,
            })?
        }
        "import-rules" => {
            let report = RuleImporter::default().import_from_file(&file)?;
            serde_json::to_string_pretty(&ImportOutput::from(report))?
        }
        "import-stock" => {
            let report = StockImporter::default().import_from_file(&file)?;
            serde_json::to_string_pretty(&ImportOutput::from(report))?
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    };

    println!("{}", output);
    Ok(())
}

fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .with_context(|| format!("无法解析时间: {}", raw))
}
