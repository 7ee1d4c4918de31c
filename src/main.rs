//! `betta-wishlist` - manage the wishlist from a terminal.
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use betta_wishlist::adapters::{
    FileCacheStorage, HttpWishlistApi, HttpWishlistConfig, InMemoryCacheStorage,
    InMemoryCredentialStore, SyncBus, TracingLoginPrompt,
};
use betta_wishlist::application::{ToggleOutcome, WishlistBadge, WishlistCache, WishlistStore};
use betta_wishlist::config::{AppConfig, LoggingConfig};
use betta_wishlist::domain::wishlist::{WishlistError, WishlistSnapshot};
use betta_wishlist::ports::CacheStorage;

#[derive(Parser, Debug)]
#[command(name = "betta-wishlist")]
#[command(about = "Manage your betta fish wishlist", version)]
struct Args {
    /// Always read from the server, ignoring the local cache
    #[arg(long)]
    no_cache: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the wishlist
    List,
    /// Add a product
    Add {
        #[arg(allow_hyphen_values = true)]
        product_id: i64,
    },
    /// Remove a product
    Remove {
        #[arg(allow_hyphen_values = true)]
        product_id: i64,
    },
    /// Add the product if absent, remove it if present
    Toggle {
        #[arg(allow_hyphen_values = true)]
        product_id: i64,
    },
    /// Forget the locally cached wishlist (server untouched)
    Clear,
    /// Delete every entry on the server
    Purge,
    /// Drop the session and the local cache
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };
    init_tracing(&config.logging, args.log_json);

    let bus = SyncBus::new(config.sync.debounce());
    let store = match build_store(&config, bus.clone()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            return ExitCode::from(2);
        }
    };
    let badge = WishlistBadge::mount(&store);

    let result = run(&store, args.command, !args.no_cache).await;
    bus.flush();

    match result {
        Ok(()) => {
            println!("Wishlist badge: {}", badge.count());
            if badge.take_refresh_request() {
                println!("The wishlist may be out of date; run `betta-wishlist --no-cache list`.");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = %e, kind = ?e.kind(), "Command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(logging: &LoggingConfig, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_store(config: &AppConfig, bus: SyncBus) -> Result<WishlistStore, String> {
    let api = HttpWishlistApi::new(
        HttpWishlistConfig::new(config.api.base_url.clone()).with_timeout(config.api.timeout()),
    )
    .map_err(|e| e.to_string())?;

    let storage: Arc<dyn CacheStorage> = match &config.cache.dir {
        Some(dir) => Arc::new(FileCacheStorage::new(dir)),
        None => Arc::new(InMemoryCacheStorage::new()),
    };
    let cache = WishlistCache::new(storage, config.cache.key.clone()).with_max_age(config.cache.ttl());

    let credentials = InMemoryCredentialStore::new();
    if let Some(token) = config.session.access_token() {
        credentials.set_token(token);
    }

    Ok(WishlistStore::new(
        Arc::new(api),
        Arc::new(credentials),
        Arc::new(TracingLoginPrompt::new()),
        cache,
        Arc::new(bus),
    ))
}

async fn run(store: &WishlistStore, command: Command, use_cache: bool) -> Result<(), WishlistError> {
    match command {
        Command::List => {
            let snapshot = store.fetch(use_cache).await?;
            print_snapshot(&snapshot);
        }
        Command::Add { product_id } => {
            preload(store, use_cache).await;
            let snapshot = store.add(product_id).await?;
            println!("Added product {}.", product_id);
            print_snapshot(&snapshot);
        }
        Command::Remove { product_id } => {
            preload(store, use_cache).await;
            let snapshot = store.remove(product_id).await?;
            println!("Removed product {}.", product_id);
            print_snapshot(&snapshot);
        }
        Command::Toggle { product_id } => {
            preload(store, use_cache).await;
            match store.toggle(product_id).await? {
                ToggleOutcome::Added(snapshot) => {
                    println!("Added product {}.", product_id);
                    print_snapshot(&snapshot);
                }
                ToggleOutcome::Removed(snapshot) => {
                    println!("Removed product {}.", product_id);
                    print_snapshot(&snapshot);
                }
            }
        }
        Command::Clear => {
            store.clear();
            println!("Local wishlist cache cleared.");
        }
        Command::Purge => {
            store.fetch(false).await?;
            let report = store.purge().await?;
            println!("Removed {} product(s).", report.removed.len());
            if let Some((product_id, error)) = report.failed.first() {
                eprintln!("Could not remove {} product(s).", report.failed.len());
                tracing::warn!(%product_id, error = %error, "Purge left entries behind");
                return Err(error.clone());
            }
        }
        Command::Logout => {
            store.logout();
            println!("Signed out.");
        }
    }
    Ok(())
}

/// Loads current membership so mutations and their output start from real state.
/// Failures are left for the mutation itself to report.
async fn preload(store: &WishlistStore, use_cache: bool) {
    if let Err(e) = store.fetch(use_cache).await {
        tracing::debug!(error = %e, "Preload before mutation failed");
    }
}

fn print_snapshot(snapshot: &WishlistSnapshot) {
    if snapshot.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }
    for entry in snapshot.entries() {
        match &entry.product {
            Some(product) => println!(
                "  #{:<6} {:<32} ${:.2}",
                entry.product_id.value(),
                entry.display_name(),
                product.price
            ),
            None => println!("  #{:<6} {}", entry.product_id.value(), entry.display_name()),
        }
    }
    println!("{} item(s)", snapshot.count());
}
