use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use subrecon_core::progress::ProgressSink;

const TICK: Duration = Duration::from_millis(100);
const BAR_TEMPLATE: &str = "[{prefix}] {elapsed_precise} {bar:36.cyan/blue} {pos:>4}/{len:4} {msg}";

/// The bar of the pool run in progress, if any. Log lines are printed around it.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active_bar() -> Option<ProgressBar> {
    ACTIVE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("■■□"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Progress of pool runs drawn as an `indicatif` bar on stderr.
pub struct SpinnerProgress;

impl ProgressSink for SpinnerProgress {
    fn begin(&self, stage: &str, total: usize) {
        let bar: ProgressBar = ProgressBar::new(total as u64);
        bar.set_style(bar_style());
        bar.set_prefix(stage.to_string());
        bar.enable_steady_tick(TICK);

        let previous = ACTIVE
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(bar);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn advance(&self, completed: usize, _total: usize) {
        if let Some(bar) = active_bar() {
            bar.set_position(completed as u64);
        }
    }

    fn finish(&self, _stage: &str) {
        let bar = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
    }
}

/// Writer for the tracing subscriber. Lines go to stdout, suspending the
/// active bar while they are written.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active_bar() {
            Some(bar) => bar.suspend(|| io::stdout().write_all(buf))?,
            None => io::stdout().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
