use std::sync::Arc;
use stockview_console::output::Output;
use stockview_core::common::PriceSeries;
use stockview_core::view::entity::{LookupOutcome, SeriesOutcome};
use stockview_view::StockView;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

const BUSY_MESSAGE: &str = "A lookup is already in progress.";

/// # Summary
/// 交互循环中的一行输入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // 按公司名称查询
    Lookup(String),
    // 切换图表序列
    Series(PriceSeries),
    Help,
    Quit,
    // 空行
    Nothing,
    Invalid(String),
}

pub const HELP: &str = "Type a company name to look it up.\n  :series <open|high|low|close>  switch the chart series\n  :help                          show this message\n  :quit                          exit";

/// # Summary
/// 解析一行输入。
///
/// # Logic
/// 1. 以 `:` 开头的是命令，其余非空内容一律视为公司名称。
/// 2. 命令名不区分大小写。
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Nothing;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Lookup(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();
    match (name.as_str(), arg) {
        ("series" | "s", Some(arg)) => match arg.parse() {
            Ok(series) => Command::Series(series),
            Err(e) => Command::Invalid(e),
        },
        ("series" | "s", None) => Command::Invalid("missing series name".to_string()),
        ("help" | "h", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        _ => Command::Invalid(format!("unknown command: {}", line)),
    }
}

/// # Summary
/// 交互循环：逐行读取输入并执行命令。
///
/// # Logic
/// 1. 普通文本作为查询在后台任务中执行，输入循环不被阻塞。
/// 2. 查询进行中再次提交会被拒绝并提示；已派生但被控制器拒绝的任务同样提示。
/// 3. 遇到 `:quit` 或输入结束时，等待所有已派生的查询任务结束后返回。
///
/// # Arguments
/// * `input`: 行输入来源。
/// * `controller`: 视图控制器。
/// * `out`: 提示信息输出端。
/// * `series`: 每次查询成功后切换到的序列。
pub async fn run<R>(
    input: R,
    controller: Arc<StockView>,
    out: Arc<Output>,
    series: Option<PriceSeries>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    out.line(HELP);

    let mut lines = input.lines();
    let mut lookups = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        match parse(&line) {
            Command::Nothing => {}
            Command::Help => out.line(HELP),
            Command::Quit => break,
            Command::Invalid(reason) => out.line(format!("{} (type :help)", reason)),
            Command::Series(s) => match controller.select_series(s) {
                Ok(SeriesOutcome::Updated(_)) => {}
                Ok(SeriesOutcome::NoChart) => out.line("No chart yet, look up a company first."),
                Err(e) => warn!("Switching series failed: {}", e),
            },
            Command::Lookup(company) => {
                if controller.is_busy() {
                    out.line(BUSY_MESSAGE);
                    continue;
                }
                let controller = controller.clone();
                let out = out.clone();
                lookups.spawn(async move {
                    match controller.lookup(&company).await {
                        Ok(LookupOutcome::Rendered { .. }) => {
                            if let Some(s) = series
                                && let Err(e) = controller.select_series(s)
                            {
                                warn!("Switching series failed: {}", e);
                            }
                        }
                        Ok(LookupOutcome::Busy) => out.line(BUSY_MESSAGE),
                        Err(e) => info!("Lookup for '{}' ended with: {}", company, e),
                    }
                });
            }
        }
    }

    while let Some(joined) = lookups.join_next().await {
        if let Err(e) = joined {
            error!("Lookup task failed: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockview_console::output::SharedBuffer;
    use stockview_core::config::ChartConfig;
    use stockview_core::testing::{MemoryChart, RecordingView, ScriptedSource, point, report};

    #[test]
    fn test_plain_text_is_lookup() {
        assert_eq!(parse("  Apple Inc  "), Command::Lookup("Apple Inc".into()));
        assert_eq!(parse("   "), Command::Nothing);
    }

    #[test]
    fn test_series_command() {
        assert_eq!(parse(":series high"), Command::Series(PriceSeries::High));
        assert_eq!(parse(":S Low"), Command::Series(PriceSeries::Low));
        assert!(matches!(parse(":series volume"), Command::Invalid(_)));
        assert!(matches!(parse(":series"), Command::Invalid(_)));
    }

    #[test]
    fn test_control_commands() {
        assert_eq!(parse(":quit"), Command::Quit);
        assert_eq!(parse(":q"), Command::Quit);
        assert_eq!(parse(":help"), Command::Help);
        assert!(matches!(parse(":frobnicate"), Command::Invalid(_)));
    }

    #[tokio::test]
    async fn test_quit_waits_for_every_spawned_lookup() {
        let (source, gate) = ScriptedSource::gated();
        let source = Arc::new(source);
        source.push(Ok(report("AAPL", vec![point("2024-03-01", 1.0, 2.0, 0.5, 1.5)])));
        let view = Arc::new(RecordingView::new());
        let chart = Arc::new(MemoryChart::new());
        let controller = Arc::new(StockView::new(
            source.clone(),
            view.clone(),
            chart.clone(),
            &ChartConfig::default(),
        ));
        let buffer = SharedBuffer::new();
        let out = Arc::new(Output::new(buffer.clone()));

        // 三行同时到达：第二个查询在第一个占用进行中标记前就已派生
        let input: &'static [u8] = b"Apple\nMicrosoft\n:quit\n";
        let session = tokio::spawn(run(input, controller.clone(), out, None));

        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert!(!session.is_finished());
        assert_eq!(source.queries().len(), 1);
        assert!(buffer.contents().contains(BUSY_MESSAGE));

        gate.notify_one();
        session.await.unwrap().unwrap();

        assert!(view.last_table().is_some());
        assert_eq!(chart.live_count(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_series_before_lookup_reports_no_chart() {
        let controller = Arc::new(StockView::new(
            Arc::new(ScriptedSource::new()),
            Arc::new(RecordingView::new()),
            Arc::new(MemoryChart::new()),
            &ChartConfig::default(),
        ));
        let buffer = SharedBuffer::new();
        let input: &'static [u8] = b":series high\n:bogus\n";

        run(input, controller, Arc::new(Output::new(buffer.clone())), None)
            .await
            .unwrap();

        let printed = buffer.contents();
        assert!(printed.contains("No chart yet"));
        assert!(printed.contains("unknown command: :bogus"));
    }
}
