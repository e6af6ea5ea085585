use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use drill_core::model::Tier;
use services::{CatalogService, Clock, QuizLoopService, StatsOverviewService};
use storage::repository::Storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://type-lexicon.netlify.app/catalog.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUrl { flag: &'static str, raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUrl { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
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

struct DesktopApp {
    catalog_url: Url,
    image_base: Url,
    quiz_loop: Arc<QuizLoopService>,
    stats_overview: Arc<StatsOverviewService>,
    rng_seed: Option<u64>,
}

impl UiApp for DesktopApp {
    fn catalog(&self) -> CatalogService {
        CatalogService::new(self.catalog_url.clone())
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn stats_overview(&self) -> Arc<StatsOverviewService> {
        Arc::clone(&self.stats_overview)
    }

    fn image_base(&self) -> Url {
        self.image_base.clone()
    }

    fn default_tier(&self) -> Tier {
        Tier::Proficient
    }

    fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

struct Args {
    db_url: String,
    catalog_url: Url,
    image_base: Url,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--catalog-url <url>] [--image-base <url>] [--seed <u64>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:drill.sqlite3");
    eprintln!("  --catalog-url {DEFAULT_CATALOG_URL}");
    eprintln!("  --image-base  the catalog URL's origin");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRILL_DB_URL, DRILL_CATALOG_URL, DRILL_IMAGE_BASE");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("DRILL_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://drill.sqlite3".into(), normalize_sqlite_url);
        let mut catalog_url = parse_url(
            "--catalog-url",
            &std::env::var("DRILL_CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.into()),
        )?;
        let mut image_base = std::env::var("DRILL_IMAGE_BASE")
            .ok()
            .map(|raw| parse_url("--image-base", &raw))
            .transpose()?;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog-url" => {
                    let value = require_value(args, "--catalog-url")?;
                    catalog_url = parse_url("--catalog-url", &value)?;
                }
                "--image-base" => {
                    let value = require_value(args, "--image-base")?;
                    image_base = Some(parse_url("--image-base", &value)?);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let image_base = match image_base {
            Some(base) => base,
            None => origin_of(&catalog_url)?,
        };

        Ok(Self {
            db_url,
            catalog_url,
            image_base,
            seed,
        })
    }
}

fn parse_url(flag: &'static str, raw: &str) -> Result<Url, ArgsError> {
    Url::parse(raw).map_err(|_| ArgsError::InvalidUrl {
        flag,
        raw: raw.to_string(),
    })
}

/// The catalog URL with path and query stripped, as the image base default.
fn origin_of(url: &Url) -> Result<Url, ArgsError> {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    if base.path_segments_mut().is_err() {
        return Err(ArgsError::InvalidUrl {
            flag: "--catalog-url",
            raw: url.to_string(),
        });
    }
    base.set_path("");
    Ok(base)
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let clock = Clock::default_clock();
    let quiz_loop = Arc::new(QuizLoopService::new(
        clock,
        Arc::clone(&storage.seen),
        Arc::clone(&storage.stats),
    ));
    let stats_overview = Arc::new(StatsOverviewService::new(Arc::clone(&storage.stats)));

    tracing::info!(catalog_url = %parsed.catalog_url, "starting TypeDrill");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        catalog_url: parsed.catalog_url,
        image_base: parsed.image_base,
        quiz_loop,
        stats_overview,
        rng_seed: parsed.seed,
    });
    let context = build_app_context(&app);

    // Explicitly disable always-on-top so the app doesn't behave like a
    // modal window in dev setups that default to it.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("TypeDrill")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
