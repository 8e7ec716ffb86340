mod api;
mod sender;
mod storage;
mod store;
mod worker;

use anyhow::{bail, Context};
use chrono::FixedOffset;
use clap::Parser;
use std::{net::SocketAddr, num::NonZeroU64, path::PathBuf, sync::Arc, time::Duration};
use tracing::Level;
use url::Url;

use crate::{
    api::AppState,
    sender::{FonnteSender, DEFAULT_GATEWAY},
    storage::{FileStorage, NAMESPACE},
    store::Store,
    worker::Reminders,
};

#[derive(Debug, Parser)]
struct Cli {
    #[clap(
        long,
        env = "TENGGATD_LISTEN",
        default_value = "127.0.0.1:1337",
        help = "API endpoint to listen on"
    )]
    listen: SocketAddr,

    #[clap(
        long,
        env = "TENGGATD_STATE_DIR",
        help = "Directory holding the saved tasks [default: <data dir>/tenggat]"
    )]
    state_dir: Option<PathBuf>,

    #[clap(
        long,
        env = "TENGGATD_INTERVAL",
        default_value = "60",
        help = "Seconds between reminder checks"
    )]
    interval: NonZeroU64,

    #[clap(
        long,
        env = "TENGGATD_GATEWAY",
        default_value = DEFAULT_GATEWAY,
        help = "Message gateway to deliver reminders through"
    )]
    gateway: Url,

    #[clap(
        long,
        env = "TENGGATD_UTC_OFFSET",
        default_value_t = 420,
        allow_hyphen_values = true,
        help = "Minutes east of UTC used to print deadlines in reminders"
    )]
    utc_offset: i32,

    #[clap(
        long,
        env = "TENGGATD_NO_API",
        default_value_t = false,
        help = "Don't expose an API service"
    )]
    no_api: bool,

    #[clap(
        long,
        env = "TENGGATD_NO_REMINDERS",
        default_value_t = false,
        help = "Don't send reminders"
    )]
    no_reminders: bool,

    #[clap(
        long,
        env = "TENGGATD_LOG_JSON",
        default_value_t = false,
        help = "Log as JSON lines"
    )]
    log_json: bool,
}

fn init_logging(json: bool) {
    let subscriber = tracing_subscriber::fmt().with_max_level(Level::INFO);

    if json {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

async fn serve(
    args: &Cli,
    state: AppState,
    reminders: Reminders,
    period: Duration,
) -> anyhow::Result<()> {
    match (args.no_reminders, args.no_api) {
        (false, false) => {
            tokio::select! {
                _ = worker::run(reminders, period) => bail!("reminder worker exited unexpectedly"),
                result = api::run(args.listen, state) => result,
            }
        }
        (false, true) => {
            worker::run(reminders, period).await;
            bail!("reminder worker exited unexpectedly")
        }
        (true, false) => api::run(args.listen, state).await,
        (true, true) => bail!("nothing to do: reminders disabled and no api service"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.log_json);

    let utc_offset = FixedOffset::east_opt(args.utc_offset * 60)
        .context("UTC offset must be within a day")?;

    let state_dir = match args.state_dir.clone() {
        Some(dir) => dir,
        None => dirs::data_local_dir()
            .context("Failed to locate a data directory, pass --state-dir")?
            .join("tenggat"),
    };
    let storage = FileStorage::new(state_dir, NAMESPACE);
    tracing::info!("Using state file {}", storage.path().display());

    let store = Store::open(storage);
    let sender = FonnteSender::new(args.gateway.clone()).context("Failed to build HTTP client")?;
    let reminders = Reminders::new(store.clone(), Arc::new(sender), utc_offset);
    let period = Duration::from_secs(args.interval.get());

    let state = AppState {
        store,
        reminders: reminders.clone(),
    };

    tokio::select! {
        result = serve(&args, state, reminders, period) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
