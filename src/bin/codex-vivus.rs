//! codex-vivus - terminal dashboard for the Codex Vivus exchange.
//!
//! Modes:
//! - interactive TUI (default)
//! - `--once`: fetch once and print a plain-text dump
//! - `--watch`: headless loop that logs every refresh until Ctrl-C
//!
//! Usage:
//!   codex-vivus                       # TUI, settings from env / .env
//!   codex-vivus --poll 10             # poll every 10 seconds
//!   codex-vivus --once                # print and exit
//!   codex-vivus --demo                # built-in sample data, no network

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use codex_vivus::config::{self, ConfigError, StoreConfig};
use codex_vivus::dashboard::{
    Controller, DEFAULT_MESSAGE_LIMIT, DashboardState, FetchPlan, Loader, PostingOrder,
};
use codex_vivus::store::mock::MockStore;
use codex_vivus::store::{ChangeFeed, DEFAULT_TIMEOUT, RealtimeFeed, RecordStore, RestStore};
use codex_vivus::tui::App;
use codex_vivus::view::DEFAULT_BOT_URL;
use codex_vivus::view::plain::render_plain;

/// Column postings are ordered by.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderBy {
    CreatedAt,
    Id,
}

impl From<OrderBy> for PostingOrder {
    fn from(o: OrderBy) -> Self {
        match o {
            OrderBy::CreatedAt => PostingOrder::CreatedAt,
            OrderBy::Id => PostingOrder::Id,
        }
    }
}

/// Terminal dashboard for offers, requests and the bot's living memory.
#[derive(Parser)]
#[command(name = "codex-vivus", about = "Codex Vivus exchange dashboard", version)]
struct Args {
    /// Store URL. Overrides SUPABASE_URL / NEXT_PUBLIC_SUPABASE_URL.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Public access key. Overrides SUPABASE_ANON_KEY and friends.
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Env file to load before reading settings (default: ./.env if present).
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Poll interval in seconds.
    #[arg(long, default_value = "30", env = "CODEX_VIVUS_POLL_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    poll: u64,

    /// Do not subscribe to change notifications; poll only.
    #[arg(long)]
    no_realtime: bool,

    /// Column postings are ordered by (descending).
    #[arg(long, value_enum, default_value = "created-at")]
    order_by: OrderBy,

    /// Number of transcript messages fetched.
    #[arg(long, default_value_t = DEFAULT_MESSAGE_LIMIT, conflicts_with = "all_messages")]
    message_limit: usize,

    /// Fetch the whole transcript.
    #[arg(long)]
    all_messages: bool,

    /// Bot link shown in the call to action.
    #[arg(long, default_value = DEFAULT_BOT_URL, env = "CODEX_VIVUS_BOT_URL")]
    bot_url: String,

    /// Fetch once, print a text dump and exit.
    #[arg(long, conflicts_with = "watch")]
    once: bool,

    /// Run without a UI, logging every refresh until interrupted.
    #[arg(long)]
    watch: bool,

    /// Use built-in sample data instead of the store.
    #[arg(long)]
    demo: bool,

    /// Write logs to this file (TUI mode logs nowhere otherwise).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    let interactive = !args.once && !args.watch;

    init_logging(args.verbose, args.quiet, args.log_file.as_ref(), interactive);

    let plan = FetchPlan {
        posting_order: args.order_by.into(),
        message_limit: (!args.all_messages).then_some(args.message_limit),
    };

    let (source, store_config) = build_source(&args);
    if let Err(e) = &source {
        warn!(error = %e, "store not configured");
    }
    let loader = Loader::new(source, plan);
    let poll = Duration::from_secs(args.poll);

    let feed: Option<Box<dyn ChangeFeed>> = match (&store_config, args.no_realtime) {
        (Some(cfg), false) => match RealtimeFeed::new(cfg) {
            Ok(feed) => Some(Box::new(feed)),
            Err(e) => {
                warn!(error = %e, "change notifications unavailable");
                None
            }
        },
        _ => None,
    };

    if args.once {
        let mut controller = Controller::new(loader, DashboardState::default());
        let state = controller.refresh();
        print!("{}", render_plain(state, &args.bot_url));
        return;
    }

    if args.watch {
        run_watch(loader, feed, poll);
        return;
    }

    let app = App::new(loader, feed, DashboardState::default(), args.bot_url, poll);
    if let Err(e) = app.run() {
        error!(error = %e, "terminal error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Resolves the record store, or the reason there is none.
fn build_source(
    args: &Args,
) -> (
    Result<Arc<dyn RecordStore>, ConfigError>,
    Option<StoreConfig>,
) {
    if args.demo {
        info!("demo mode, using sample data");
        return (Ok(Arc::new(MockStore::sample())), None);
    }

    if let Err(e) = config::load_env_file(args.env_file.as_deref()) {
        return (Err(e), None);
    }

    let cfg = match StoreConfig::resolve(args.url.clone(), args.key.clone()) {
        Ok(cfg) => cfg,
        Err(e) => return (Err(e), None),
    };
    info!(url = %cfg.url, "store configured");

    match RestStore::new(&cfg, DEFAULT_TIMEOUT) {
        Ok(store) => (Ok(Arc::new(store)), Some(cfg)),
        Err(e) => {
            error!(error = %e, "failed to create HTTP client");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Headless refresh loop. Stops on Ctrl-C.
fn run_watch(loader: Loader, feed: Option<Box<dyn ChangeFeed>>, poll: Duration) {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let mut controller = Controller::new(loader, DashboardState::default());
    log_refresh(controller.refresh(), "initial");

    if let Some(feed) = &feed
        && let Err(e) = controller.watch(feed.as_ref())
    {
        warn!(error = %e, "change subscription failed, polling only");
    }

    let mut last_poll = Instant::now();
    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));

        if controller.process_changes() > 0 {
            log_refresh(controller.state(), "change");
        }

        if last_poll.elapsed() >= poll {
            last_poll = Instant::now();
            log_refresh(controller.refresh(), "poll");
        }
    }

    controller.unwatch();
    info!("stopped");
}

fn log_refresh(state: &DashboardState, trigger: &str) {
    let s = &state.stats;
    if state.has_error() {
        warn!(trigger, error = %state.error, "refresh failed");
    }
    info!(
        trigger,
        offers = s.offers,
        requests = s.requests,
        unclassified = s.unclassified,
        messages = s.messages,
        "refreshed"
    );
}

fn init_logging(verbose: u8, quiet: bool, log_file: Option<&PathBuf>, interactive: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    match format!("codex_vivus={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("invalid log directive: {}", e),
    }

    match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init(),
            Err(e) => eprintln!("cannot open log file {}: {}", path.display(), e),
        },
        // Logging to the terminal would corrupt the alternate screen.
        None if interactive => {}
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }
}
