use std::time::Duration;

use crate::config::probe_config::Settings;
use crate::executor::Executor;
use crate::probe::{Probe, ProbeContext};
use crate::report::{PING_GROUP_TITLE, Report, ResultGroup, WEB_GROUP_TITLE};

const GROUP_COLUMN_WIDTH: usize = 10;

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

fn log_group(group: &ResultGroup) {
    let column = to_fixed_width(&group.title, GROUP_COLUMN_WIDTH);
    for result in &group.results {
        tracing::info!(
            "[{column}] {} {} ({}): {}",
            result.status,
            result.title,
            result.address,
            result.details
        );
    }
}

/// Run both probe families of `settings` and assemble the report.
/// The ping and web batches run at the same time; the report always lists the ping group first.
pub async fn run(settings: &Settings, context: ProbeContext) -> Report {
    let deadline = Duration::from_millis(settings.timeout);
    let executor = Executor::new(context);

    let ping_batch: Vec<Probe> = settings.ping_tests.iter().map(Probe::from).collect();
    let web_batch: Vec<Probe> = settings.web_tests.iter().map(Probe::from).collect();

    let (ping_results, web_results) = tokio::join!(
        executor.run(&ping_batch, deadline),
        executor.run(&web_batch, deadline)
    );

    let report = Report {
        groups: vec![
            ResultGroup::new(PING_GROUP_TITLE, ping_results),
            ResultGroup::new(WEB_GROUP_TITLE, web_results),
        ],
    };

    for group in &report.groups {
        log_group(group);
    }

    report
}
