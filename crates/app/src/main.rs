mod logging;
mod repl;
mod settings;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stockview_console::chart::ConsoleChart;
use stockview_console::output::Output;
use stockview_console::view::ConsoleView;
use stockview_core::common::PriceSeries;
use stockview_core::view::entity::LookupOutcome;
use stockview_feed::http::HttpStockSource;
use stockview_view::StockView;
use tokio::io::BufReader;
use tracing::{error, info, warn};

/// 查询公司股票信息并在终端绘制价格走势。
#[derive(Debug, Parser)]
#[command(name = "stockview", version)]
struct Cli {
    /// 配置文件路径（toml/yaml/json）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 查询成功后展示的价格序列
    #[arg(short, long)]
    series: Option<PriceSeries>,

    /// 公司名称；省略时进入交互模式
    company: Option<String>,
}

/// # Summary
/// 应用启动入口，负责组装具体实现并注入到视图控制器。
///
/// # Logic
/// 1. 解析命令行并加载配置。
/// 2. 初始化全局日志与 TLS 加密后端。
/// 3. 实例化数据源、终端视图、终端图表，构造 `StockView`。
/// 4. 指定公司名称时执行单次查询，否则进入交互循环。
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = settings::load(cli.config.as_deref())?;

    let _guard = logging::init(&config.log.level);
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let source = Arc::new(HttpStockSource::new(&config.backend, config.fields.clone())?);
    info!("stockview starting, backend endpoint {}", source.endpoint());

    let view = Arc::new(ConsoleView::stdout());
    let chart = Arc::new(ConsoleChart::new(
        Output::stdout(),
        config.chart.canvas_id.clone(),
        config.chart.height,
        config.chart.width,
    ));
    let controller = Arc::new(StockView::new(source, view, chart, &config.chart));

    let code = match cli.company {
        Some(company) => run_once(&controller, &company, cli.series).await,
        None => {
            let input = BufReader::new(tokio::io::stdin());
            repl::run(input, controller.clone(), Arc::new(Output::stdout()), cli.series).await?;
            ExitCode::SUCCESS
        }
    };

    controller.dispose();
    info!("stockview exiting");
    Ok(code)
}

/// # Summary
/// 单次查询模式。
///
/// # Returns
/// 查询及序列切换均成功时返回成功退出码。
async fn run_once(controller: &StockView, company: &str, series: Option<PriceSeries>) -> ExitCode {
    match controller.lookup(company).await {
        Ok(LookupOutcome::Rendered { .. }) => {}
        Ok(LookupOutcome::Busy) => return ExitCode::FAILURE,
        Err(e) => {
            error!("Lookup for '{}' failed: {}", company, e);
            return ExitCode::FAILURE;
        }
    }

    match series.map(|s| controller.select_series(s)) {
        Some(Err(e)) => {
            error!("Switching series failed: {}", e);
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}
