//! Result files.
//!
//! Two files are written per run: the validated names, and every discovered
//! name next to it with an `_all` suffix.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use subrecon_common::hostname::{Hostname, TargetDomain};
use subrecon_common::{info, success};
use subrecon_core::report::{Report, ReportSink};

pub struct FileSink {
    primary: PathBuf,
    secondary: PathBuf,
}

impl FileSink {
    pub fn new(output: Option<&Path>, domain: &TargetDomain) -> Self {
        let primary: PathBuf = primary_path(output, domain);
        let secondary: PathBuf = secondary_path(&primary);
        Self { primary, secondary }
    }
}

impl ReportSink for FileSink {
    fn emit(&self, report: &Report) -> anyhow::Result<()> {
        write_list(&self.primary, &report.validated)?;
        success!("Results saved to {}", self.primary.display());

        write_list(&self.secondary, &report.discovered)?;
        info!("All subdomains saved to {}", self.secondary.display());
        Ok(())
    }
}

/// The requested path, or `subdomains_<domain>.txt`.
pub fn primary_path(output: Option<&Path>, domain: &TargetDomain) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("subdomains_{domain}.txt")))
}

/// `<stem>_all.<ext>` next to `primary`, or `<primary>_all.txt` when it has
/// no extension.
pub fn secondary_path(primary: &Path) -> PathBuf {
    match (primary.file_stem(), primary.extension()) {
        (Some(stem), Some(ext)) => {
            let mut name: OsString = stem.to_os_string();
            name.push("_all.");
            name.push(ext);
            primary.with_file_name(name)
        }
        _ => {
            let mut name: OsString = primary.as_os_str().to_os_string();
            name.push("_all.txt");
            PathBuf::from(name)
        }
    }
}

fn write_list(path: &Path, hosts: &[Hostname]) -> anyhow::Result<()> {
    let mut content: String = String::new();
    for host in hosts {
        content.push_str(host.as_str());
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
