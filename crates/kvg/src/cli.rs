//! Command line interface
//!
//! Demonstrations of the lock and cache layer against the configured store.
//! With the in-process store every invocation starts empty; point
//! `store.provider` at Redis to share state between invocations.

use clap::{Parser, Subcommand};
use futures::future::join_all;
use kvg_domain::error::Result;
use kvg_domain::value_objects::{CacheStats, DecrementOutcome, ProtectionMode, User};
use kvg_infrastructure::config::ConfigLoader;
use kvg_infrastructure::di::{AppContext, init_app};
use kvg_infrastructure::logging::init_logging;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Command line interface for KV Guard
#[derive(Parser, Debug)]
#[command(name = "kvg")]
#[command(about = "KV Guard - Distributed locks and cache protection demos")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Let concurrent buyers race for a limited stock
    Seckill {
        /// Number of concurrent buyers
        #[arg(long, default_value_t = 100)]
        buyers: usize,

        /// Stock to seed (defaults to `seckill.initial_stock`)
        #[arg(long)]
        stock: Option<i64>,

        /// Retry while the stock lock is busy
        #[arg(long)]
        retry: bool,
    },

    /// Look up a user through the read-through cache
    Lookup {
        /// User id; negative ids are accepted so absent records can be probed
        #[arg(long, allow_negative_numbers = true)]
        id: i64,

        /// Protection mode: unprotected, null_marker or locked (defaults to `cache.mode`)
        #[arg(long)]
        mode: Option<ProtectionMode>,

        /// Number of consecutive lookups
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },

    /// Remove a cache entry by raw key
    Invalidate {
        /// Cache key, e.g. `user:1`
        #[arg(long)]
        key: String,
    },

    /// List registered key-value store providers
    Providers,
}

/// Parse configuration, install logging and run the selected command
pub async fn run(cli: Cli) -> Result<()> {
    if cli.command == Command::Providers {
        for (name, description) in AppContext::available_store_providers() {
            println!("{name:<10} {description}");
        }
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;
    let context = init_app(config)?;

    match cli.command {
        Command::Seckill {
            buyers,
            stock,
            retry,
        } => {
            let report = run_seckill(&context, buyers, stock, retry).await?;
            print!("{report}");
        }
        Command::Lookup { id, mode, repeat } => {
            let report = run_lookup(&context, id, mode, repeat).await?;
            print!("{report}");
        }
        Command::Invalidate { key } => {
            if context.users().clear_cache(&key).await? {
                println!("Removed cache entry '{key}'");
            } else {
                println!("Nothing cached under '{key}'");
            }
        }
        Command::Providers => {}
    }
    Ok(())
}

/// Tally of one seckill run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeckillReport {
    /// Buyers that took part
    pub buyers: usize,
    /// Purchases that went through
    pub succeeded: usize,
    /// Buyers turned away by a busy lock
    pub lock_busy: usize,
    /// Buyers that found the stock empty
    pub depleted: usize,
    /// Buyers that hit a store fault
    pub failed: usize,
    /// Stock left after the run
    pub remaining: Option<i64>,
}

impl SeckillReport {
    fn record(&mut self, outcome: &DecrementOutcome) {
        match outcome {
            DecrementOutcome::Success { .. } => self.succeeded += 1,
            DecrementOutcome::LockBusy => self.lock_busy += 1,
            DecrementOutcome::Depleted => self.depleted += 1,
        }
    }
}

impl fmt::Display for SeckillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buyers: {}", self.buyers)?;
        writeln!(f, "  purchased:                                 {}", self.succeeded)?;
        writeln!(
            f,
            "  {:<42} {}",
            format!("{}:", DecrementOutcome::LockBusy.message()),
            self.lock_busy
        )?;
        writeln!(
            f,
            "  {:<42} {}",
            format!("{}:", DecrementOutcome::Depleted.message()),
            self.depleted
        )?;
        writeln!(f, "  store errors:                              {}", self.failed)?;
        match self.remaining {
            Some(remaining) => writeln!(f, "Remaining stock: {remaining}"),
            None => writeln!(f, "Remaining stock: unknown"),
        }
    }
}

/// Seed the stock and let `buyers` concurrent tasks try to buy one unit each
pub async fn run_seckill(
    context: &AppContext,
    buyers: usize,
    stock: Option<i64>,
    retry: bool,
) -> Result<SeckillReport> {
    let config = &context.config.seckill;
    let amount = stock.unwrap_or(config.initial_stock);
    context
        .seckill()
        .init_stock(&config.stock_key, amount)
        .await?;

    let policy = config.retry.policy();
    let lock_ttl = context.lock_ttl();
    let tasks = (0..buyers).map(|_| {
        let seckill = context.seckill().clone();
        let stock_key = config.stock_key.clone();
        let lock_key = config.lock_key.clone();
        tokio::spawn(async move {
            if retry {
                seckill
                    .purchase_with_retry(&stock_key, &lock_key, lock_ttl, &policy)
                    .await
            } else {
                seckill
                    .decrement_if_positive(&stock_key, &lock_key, lock_ttl)
                    .await
            }
        })
    });

    let mut report = SeckillReport {
        buyers,
        ..SeckillReport::default()
    };
    for joined in join_all(tasks).await {
        match joined {
            Ok(Ok(outcome)) => report.record(&outcome),
            Ok(Err(e)) => {
                warn!(error = %e, "Buyer failed");
                report.failed += 1;
            }
            Err(e) => {
                warn!(error = %e, "Buyer task aborted");
                report.failed += 1;
            }
        }
    }
    report.remaining = context.seckill().stock(&config.stock_key).await?;
    Ok(report)
}

/// Result of repeated lookups of one user
#[derive(Debug, Clone, PartialEq)]
pub struct LookupReport {
    /// Looked-up id
    pub id: i64,
    /// Mode used for every lookup
    pub mode: ProtectionMode,
    /// Answer of each lookup, in order
    pub results: Vec<Option<User>>,
    /// Backing-store calls made by the repository so far
    pub backing_lookups: u64,
    /// Accessor counters after the run
    pub stats: CacheStats,
}

impl fmt::Display for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (attempt, result) in self.results.iter().enumerate() {
            match result {
                Some(user) => {
                    let json = serde_json::to_string(user).map_err(|_| fmt::Error)?;
                    writeln!(f, "#{} [{}] {json}", attempt + 1, self.mode)?;
                }
                None => writeln!(f, "#{} [{}] user {} not found", attempt + 1, self.mode, self.id)?,
            }
        }
        writeln!(f, "Backing-store lookups: {}", self.backing_lookups)?;
        writeln!(
            f,
            "Cache: {} hits, {} negative hits, {} misses, hit rate {:.0}%",
            self.stats.hits,
            self.stats.negative_hits,
            self.stats.misses,
            self.stats.hit_rate() * 100.0
        )
    }
}

/// Look up `id` `repeat` times in `mode` (or the configured mode)
pub async fn run_lookup(
    context: &AppContext,
    id: i64,
    mode: Option<ProtectionMode>,
    repeat: u32,
) -> Result<LookupReport> {
    let users = context.users();
    let mode = mode.unwrap_or(users.mode());

    let mut results = Vec::new();
    for _ in 0..repeat.max(1) {
        results.push(users.get_user_with_mode(id, mode).await?);
    }

    Ok(LookupReport {
        id,
        mode,
        results,
        backing_lookups: context.user_repository().lookup_count(),
        stats: context.cache().stats(),
    })
}
