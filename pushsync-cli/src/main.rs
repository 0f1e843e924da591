use anyhow::Result;
use clap::Parser;
use pushsync_core::core_push::adapters::{MemorySink, MockGateway};
use pushsync_core::{
    init_logging_with_config, ChannelSet, DeviceToken, EngineConfig, LogConfig, LogLevel,
    PushReconciler, SessionIdentity,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pushsync")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Drive a scripted device session against the in-memory mock gateway
    Demo {
        /// Channels to register (comma separated); defaults to chat,color
        #[arg(long, value_delimiter = ',')]
        channels: Vec<String>,

        /// Keep debug mirror subscriptions in sync during the session
        #[arg(long)]
        debug_mirror: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = LogLevel::from_str(&args.log_level).unwrap_or_else(|| {
        eprintln!("Invalid log level '{}', using 'info'", args.log_level);
        LogLevel::Info
    });
    init_logging_with_config(LogConfig::new(log_level).json_format(args.json_logs))?;

    match args.command {
        Some(Command::Demo { channels, debug_mirror }) => {
            run_demo(channels, debug_mirror).await?;
        }
        None => {
            info!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}

async fn run_demo(channels: Vec<String>, debug_mirror: bool) -> Result<()> {
    let config = EngineConfig::default();
    config.validate()?;

    let channels = if channels.is_empty() { config.default_channels.clone() } else { channels };
    info!(channels = ?channels, debug_mirror, "starting demo session");

    let gateway = MockGateway::new();
    let sink = MemorySink::new();
    let reconciler = PushReconciler::new(
        Arc::new(gateway.clone()),
        Arc::new(sink.clone()),
        config,
    );
    reconciler.set_identity(Some(SessionIdentity::generate().with_device("pushsync-demo")));

    // A full device session: channels before token, token arrival, mirror
    // toggle, rotation, channel shrink, audit, teardown.
    let full_set: ChannelSet = channels.iter().cloned().collect();
    reconciler.on_channels_changed(Some(full_set.clone())).await;
    reconciler.on_token_changed(Some(DeviceToken::new(vec![0x01; 8]))).await;
    if debug_mirror {
        reconciler.set_debug_mirror(true).await;
    }
    reconciler.on_token_changed(Some(DeviceToken::new(vec![0x02; 8]))).await;

    let shrunk: ChannelSet = channels.iter().skip(1).cloned().collect();
    reconciler
        .on_channels_changed(if shrunk.is_empty() { None } else { Some(shrunk) })
        .await;

    reconciler.request_registered_channels().await;
    reconciler.teardown().await;

    println!("--- gateway calls ---");
    for call in gateway.calls() {
        println!("{:?}", call);
    }

    println!("--- recorded outcomes ---");
    for outcome in sink.outcomes() {
        println!("{}", serde_json::to_string(&outcome)?);
    }

    info!(calls = gateway.calls().len(), outcomes = sink.len(), "demo session finished");
    Ok(())
}
