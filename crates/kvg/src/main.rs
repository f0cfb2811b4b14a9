//! KV Guard - Entry Point
//!
//! Lives in the `kvg` facade crate next to the library of the same name.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kvg seckill --buyers N` | Concurrent buyers race for a small stock |
//! | `kvg lookup --id ID` | User lookup through the read-through cache |
//! | `kvg invalidate --key KEY` | Drop a cache entry |
//! | `kvg providers` | List registered store providers |

// Force-link kvg-providers to ensure linkme registrations are included
extern crate kvg_providers;

use clap::Parser;
use kvg::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}
