use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod dump;
mod wav;

use cli::Args;

const DEFAULT_FILTER: &str = "wavdump=info";
const VERBOSE_FILTER: &str = "wavdump=debug,ffmpeg_source=debug,ffmpeg_decode=debug";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.into_config();
    match dump::run(&config) {
        Ok(summary) => {
            info!(
                stream = summary.stream_index,
                packets = summary.packets_decoded,
                bytes = summary.bytes_written,
                output = %config.output.display(),
                "wrote {}",
                summary.spec
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
