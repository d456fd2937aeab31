use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use boba_kiosk::api::{DEFAULT_API_URL, HttpClient, KioskApi, OfflineApi};
use boba_kiosk::csv::{CsvError, read_menu, read_session, write_receipts};
use boba_kiosk::pricing::RoundingPolicy;
use boba_kiosk::{Kiosk, KioskConfig};
use clap::{Parser, ValueEnum};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Replay a kiosk session and print the receipts as csv
#[derive(Parser, Debug)]
#[command(name = "boba-kiosk", version, long_about = None)]
struct Cli {
    /// Session csv with columns action,target,value
    session: PathBuf,

    /// Backend base url
    #[arg(long, env = "KIOSK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Serve the menu from this csv instead of the backend, without network
    #[arg(long, value_name = "CSV")]
    menu: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Rounding::Exact)]
    rounding: Rounding,

    /// Check stock before adding a drink to the cart
    #[arg(long)]
    stock_check: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rounding {
    /// Keep sub-cent precision until display
    Exact,
    /// Floor every amount to the cent
    Floor,
}

impl From<Rounding> for RoundingPolicy {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Exact => RoundingPolicy::Exact,
            Rounding::Floor => RoundingPolicy::FloorToCent,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.session.extension().is_none_or(|ext| ext != "csv") {
        warn!(path = %cli.session.display(), "input file seems to not be a csv file");
    }

    let config = KioskConfig {
        api_url: cli.api_url,
        rounding: cli.rounding.into(),
        stock_check: cli.stock_check,
        ..KioskConfig::default()
    };

    let result = match &cli.menu {
        Some(menu) => match read_menu(menu) {
            Ok(items) => replay(OfflineApi::new(items), config, &cli.session).await,
            Err(e) => Err(e),
        },
        None => replay(HttpClient::new(&config.api_url), config, &cli.session).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn replay<A: KioskApi>(api: A, config: KioskConfig, session: &Path) -> Result<(), CsvError> {
    let events = read_session(session)?;
    let pricing = config.pricing();
    let mut kiosk = Kiosk::new(api, config);
    kiosk.load_menu().await;

    let (event_sender, event_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in events {
            match result {
                Ok(event) => {
                    if event_sender.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    kiosk.run(ReceiverStream::new(event_receiver)).await;

    write_receipts(kiosk.receipts(), &pricing, io::stdout().lock())
}
