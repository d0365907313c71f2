mod commands;
mod output;
mod terminal;

use commands::{CommandLine, enumerate};
use subrecon_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    let cfg: Config = commands.to_config();
    print::banner(commands.no_banner, &cfg);

    enumerate::enumerate(cfg).await
}
