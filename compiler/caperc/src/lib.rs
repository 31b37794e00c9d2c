//! Caper CLI support.
//!
//! Runs bundled demo programs against a `SandboxWorld`, one tick at a time,
//! the way a game loop would drive actor scripts.

pub mod config;
pub mod demos;
pub mod run;

use std::sync::Once;

pub use config::RunConfig;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for the CLI.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=caper_eval=debug caper run patrol`. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
