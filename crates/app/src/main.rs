use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use packs_core::ProgressPolicy;
use services::{
    AppServices, CatalogService, PaymentLinkService, PurchaseService, TestLauncher, WalletService,
};
use storage::CatalogFile;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{App, UiApp, build_app_context};

const SAMPLE_CATALOG: &str = include_str!("../assets/sample_catalog.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidPath { raw } => write!(f, "invalid --catalog value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(raw: String, flag: &'static str) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

struct DesktopApp {
    policy: ProgressPolicy,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn progress_policy(&self) -> ProgressPolicy {
        self.policy
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn purchases(&self) -> Arc<PurchaseService> {
        self.services.purchases()
    }

    fn test_launcher(&self) -> Arc<dyn TestLauncher> {
        self.services.test_launcher()
    }

    fn wallet(&self) -> Arc<WalletService> {
        self.services.wallet()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui [--catalog <path>] [--keep-progress] [--balance <amount>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  built-in sample catalog, progress reset on every package selection");
    eprintln!("  wallet top-ups are enabled when PACKS_PAYMENT_MERCHANT_ID is set");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PACKS_CATALOG, PACKS_KEEP_PROGRESS, PACKS_BALANCE");
    eprintln!("  PACKS_PAYMENT_MERCHANT_ID, PACKS_PAYMENT_BASE_URL, PACKS_PAYMENT_CALLBACK_URL");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            _ => None,
        }
    }
}

struct UiArgs {
    catalog: Option<PathBuf>,
    policy: ProgressPolicy,
    balance: Option<u32>,
}

impl UiArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut catalog = std::env::var("PACKS_CATALOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut policy = if env_flag("PACKS_KEEP_PROGRESS") {
            ProgressPolicy::KeepPerPackage
        } else {
            ProgressPolicy::ResetOnSelect
        };
        let mut balance = std::env::var("PACKS_BALANCE")
            .ok()
            .and_then(|value| value.trim().parse::<u32>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    let value = require_value(args, "--catalog")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath { raw: value });
                    }
                    catalog = Some(PathBuf::from(value));
                }
                "--keep-progress" => policy = ProgressPolicy::KeepPerPackage,
                "--balance" => {
                    let value = require_value(args, "--balance")?;
                    balance = Some(parse_number(value, "--balance")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            catalog,
            policy,
            balance,
        })
    }
}

fn load_catalog(args: &UiArgs) -> Result<CatalogFile, Box<dyn std::error::Error>> {
    let mut catalog = match &args.catalog {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog");
            CatalogFile::load(path)?
        }
        None => {
            tracing::info!("no catalog given, using the built-in sample");
            CatalogFile::from_json(SAMPLE_CATALOG)?
        }
    };
    if let Some(balance) = args.balance {
        catalog.balance = balance;
    }
    Ok(catalog)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    log_fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let report = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    match cmd {
        Command::Ui => {
            let parsed = UiArgs::parse(&mut iter).map_err(report)?;
            let catalog = load_catalog(&parsed)?;
            let services = AppServices::from_catalog(catalog, PaymentLinkService::from_env())?;
            tracing::info!(
                policy = ?parsed.policy,
                topups = services.wallet().topups_enabled(),
                "starting desktop app"
            );

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                policy: parsed.policy,
                services,
            });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Smart Packages")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // Binary glue: print once and exit.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
