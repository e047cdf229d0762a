use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use axum::http::HeaderName;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use tutur_db::Phrasebook;
use tutur_engine::Engine;

use tutur_server::rate_limit::RateLimiterLayer;
use tutur_server::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_RATE_LIMIT_RPS: u32 = 20;
const DEFAULT_RATE_LIMIT_BURST: u32 = 40;
const DEFAULT_CLIENT_IP_HEADER: &str = "x-forwarded-for";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    match &config.data_dir {
        Some(dir) => info!("using seed data at {}", dir.display()),
        None => info!("using built-in data"),
    }
    if config.disable_cache {
        info!("cache headers disabled");
    }
    info!(
        "rate limit: {} req/s (burst {}) keyed on {}",
        config.rate_limit_rps, config.rate_limit_burst, config.client_header
    );

    let start = Instant::now();
    let book = match &config.data_dir {
        Some(dir) => Phrasebook::load_dir(dir)
            .with_context(|| format!("loading seed data from {}", dir.display()))?,
        None => Phrasebook::builtin(),
    };
    let engine = Engine::from(book);
    engine
        .verify()
        .context("ambiguous words must resolve for every served language pair")?;
    info!("phrasebook ready in {} ms", start.elapsed().as_millis());

    let state = AppState {
        engine,
        disable_cache: config.disable_cache,
    };

    let rate_limiter = RateLimiterLayer::new(
        config.rate_limit_rps,
        config.rate_limit_burst,
        config.client_header,
    );
    let app = router(state)
        .layer(rate_limiter)
        .layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    data_dir: Option<PathBuf>,
    disable_cache: bool,
    rate_limit_rps: u32,
    rate_limit_burst: u32,
    client_header: HeaderName,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut cli_data_dir: Option<PathBuf> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--data-dir" => {
                if let Some(path) = args.next() {
                    cli_data_dir = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--data-dir=") {
                    cli_data_dir = Some(PathBuf::from(path));
                } else {
                    warn!("ignoring unknown argument {arg}");
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let data_dir = cli_data_dir.or_else(|| env::var("TUTUR_DATA_DIR").ok().map(PathBuf::from));
    let rate_limit_rps = positive_env("RATE_LIMIT_RPS").unwrap_or(DEFAULT_RATE_LIMIT_RPS);
    let rate_limit_burst = positive_env("RATE_LIMIT_BURST").unwrap_or(DEFAULT_RATE_LIMIT_BURST);
    let client_header = env::var("CLIENT_IP_HEADER")
        .ok()
        .and_then(|name| HeaderName::try_from(name.trim().to_ascii_lowercase()).ok())
        .unwrap_or_else(|| HeaderName::from_static(DEFAULT_CLIENT_IP_HEADER));

    Config {
        host,
        port,
        data_dir,
        disable_cache,
        rate_limit_rps,
        rate_limit_burst,
        client_header,
    }
}

fn positive_env(name: &str) -> Option<u32> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
