use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wf_info::cli::Cli;
use wf_info::client::{self, render, Answer};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wf_info=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let query = cli.query();
    tracing::debug!("sending {query:?}");

    match client::run(&query)? {
        Answer::Views(views) => {
            let out = if cli.json {
                render::json(&views)?
            } else {
                render::text(&views)
            };
            print!("{out}");
        }
        Answer::Unavailable => {
            println!(
                "wf_info_base protocol not advertised by the compositor; \
                 is the view info plugin enabled?"
            );
        }
        Answer::Withdrawn => {
            tracing::info!("the compositor withdrew wf_info_base before answering");
        }
    }

    Ok(())
}
