//! CLI parsing and demo scenario tests

use clap::Parser;
use kvg::cli::{Cli, Command, run_lookup, run_seckill};
use kvg::domain::value_objects::ProtectionMode;
use kvg::infrastructure::config::AppConfig;
use kvg::infrastructure::di::AppContext;
use kvg::providers::store::MemoryKeyValueStore;
use std::sync::Arc;

fn context(work_delay_ms: u64) -> AppContext {
    let mut config = AppConfig::default();
    config.seckill.work_delay_ms = work_delay_ms;
    AppContext::with_store(config, Arc::new(MemoryKeyValueStore::new()))
}

#[test]
fn test_parse_seckill() {
    let cli = Cli::try_parse_from(["kvg", "seckill", "--buyers", "5", "--stock", "3", "--retry"])
        .unwrap();
    assert_eq!(
        cli.command,
        Command::Seckill {
            buyers: 5,
            stock: Some(3),
            retry: true
        }
    );
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_lookup_mode() {
    let cli = Cli::try_parse_from([
        "kvg", "--config", "kvg.toml", "lookup", "--id", "-1", "--mode", "locked", "--repeat", "3",
    ])
    .unwrap();
    assert_eq!(
        cli.command,
        Command::Lookup {
            id: -1,
            mode: Some(ProtectionMode::Locked),
            repeat: 3
        }
    );
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("kvg.toml")));

    assert!(Cli::try_parse_from(["kvg", "lookup", "--id", "1", "--mode", "sometimes"]).is_err());
}

#[test]
fn test_parse_negative_id() {
    let cli = Cli::try_parse_from(["kvg", "lookup", "--id", "-1"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Lookup {
            id: -1,
            mode: None,
            repeat: 1
        }
    );

    let cli = Cli::try_parse_from(["kvg", "lookup", "--repeat", "2", "--id", "-42"]).unwrap();
    assert!(matches!(cli.command, Command::Lookup { id: -42, repeat: 2, .. }));
}

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["kvg", "seckill"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Seckill {
            buyers: 100,
            stock: None,
            retry: false
        }
    );
    assert_eq!(
        Cli::try_parse_from(["kvg", "providers"]).unwrap().command,
        Command::Providers
    );
}

#[tokio::test(start_paused = true)]
async fn test_seckill_without_retry_turns_buyers_away() {
    let context = context(100);

    let report = run_seckill(&context, 5, Some(3), false).await.unwrap();

    assert_eq!(report.buyers, 5);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.lock_busy, 4);
    assert_eq!(report.failed, 0);
    assert_eq!(report.remaining, Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_seckill_with_retry_sells_exactly_the_stock() {
    let context = context(100);

    let report = run_seckill(&context, 5, Some(3), true).await.unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.depleted, 2);
    assert_eq!(report.lock_busy, 0);
    assert_eq!(report.remaining, Some(0));
    assert!(report.to_string().contains("Remaining stock: 0"));
}

#[tokio::test]
async fn test_lookup_of_missing_user_is_absorbed_by_negative_cache() {
    let context = context(0);

    let report = run_lookup(&context, -1, None, 3).await.unwrap();

    assert_eq!(report.mode, ProtectionMode::NullMarker);
    assert_eq!(report.results, vec![None, None, None]);
    assert_eq!(report.backing_lookups, 1);
    assert_eq!(report.stats.negative_hits, 2);
}

#[tokio::test]
async fn test_unprotected_lookup_of_missing_user_penetrates() {
    let context = context(0);

    let report = run_lookup(&context, -1, Some(ProtectionMode::Unprotected), 3)
        .await
        .unwrap();

    assert_eq!(report.backing_lookups, 3);
    assert!(report.to_string().contains("user -1 not found"));
}

#[tokio::test]
async fn test_lookup_of_existing_user_prints_json() {
    let context = context(0);

    let report = run_lookup(&context, 2, Some(ProtectionMode::Locked), 2)
        .await
        .unwrap();

    assert_eq!(report.backing_lookups, 1);
    assert_eq!(report.stats.hits, 1);
    assert!(report.to_string().contains(r#""username":"bob""#));
}
