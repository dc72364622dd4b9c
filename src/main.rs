use clap::Parser;
use pos_report::args::{Args, Command, HistorySubcommand};
use pos_report::delivery::StdoutSink;
use pos_report::model::PriorityTable;
use pos_report::{commands, Config, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();
    let mut sink = StdoutSink;

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.message_limit())
            .await?
            .print(),

        Command::Analyze(analyze_args) => {
            let config = Config::load(home).await?;
            let table = Arc::new(PriorityTable::default());
            commands::analyze(
                config,
                table,
                analyze_args.file(),
                !analyze_args.no_save(),
                &mut sink,
            )
            .await?
            .print()
        }

        Command::History(history_args) => {
            let config = Config::load(home).await?;
            match history_args.subcommand() {
                HistorySubcommand::List => {
                    commands::history_list(config, &mut sink).await?.print()
                }
                HistorySubcommand::Show { number } => {
                    commands::history_show(config, *number, &mut sink)
                        .await?
                        .print()
                }
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
