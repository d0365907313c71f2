use std::sync::Arc;
use std::time::Duration;

use colored::*;
use console::Term;
use subrecon_common::config::Config;
use subrecon_core::enumeration::EnumerationService;
use subrecon_core::progress::{LogProgress, ProgressSink};
use subrecon_core::report::{Report, ReportSink};

use crate::mprint;
use crate::output::FileSink;
use crate::terminal::{colors, print, spinner::SpinnerProgress};

pub async fn enumerate(cfg: Config) -> anyhow::Result<()> {
    let progress: Arc<dyn ProgressSink> = if Term::stderr().is_term() {
        Arc::new(SpinnerProgress)
    } else {
        Arc::new(LogProgress::new(cfg.progress_every))
    };
    let files: FileSink = FileSink::new(cfg.output.as_deref(), &cfg.domain);

    let mut service: EnumerationService = EnumerationService::from_config(cfg)?
        .with_progress(progress)
        .with_sink(Arc::new(ConsoleSink))
        .with_sink(Arc::new(files));

    let report: Report = service.run().await;
    print_summary(&report);
    Ok(())
}

/// Prints the numbered list of validated names.
struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &Report) -> anyhow::Result<()> {
        mprint!();
        print::header(&format!("final results: {} validated", report.validated.len()));

        if report.validated.is_empty() {
            print::no_results();
            return Ok(());
        }

        for (idx, host) in report.validated.iter().enumerate() {
            print::numbered(idx + 1, host.as_str());
        }
        Ok(())
    }
}

fn print_summary(report: &Report) {
    let elapsed: ColoredString = seconds(report.elapsed).bold().yellow();
    let found: ColoredString = report.discovered.len().to_string().bold().yellow();
    let validated: ColoredString = report.validated.len().to_string().bold().green();
    let output: ColoredString = "SCAN COMPLETED".bold().color(colors::FOUND);

    mprint!();
    print::fat_separator();
    print::centerln(&output.to_string());
    print::aligned_line("Total time", elapsed);
    print::aligned_line("Subdomains found", found);
    print::aligned_line("Validated", validated);
    print::fat_separator();
}

fn seconds(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
