#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Screamporium session.

mod place_request;
mod session;
mod text_backend;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use screamporium_core::WELCOME_BANNER;
use screamporium_rendering::{RenderingBackend, Scene};
use screamporium_world::{query, LevelConfig, MapLoader, TomlMapLoader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    place_request::PlaceRequest,
    session::{Session, TICK},
    text_backend::TextBackend,
};

/// Runs a Screamporium level without a window, printing text frames.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level configuration (block catalog, layout, tuning).
    #[arg(long, default_value = "assets/level.toml")]
    level: PathBuf,
    /// Background tile map.
    #[arg(long, default_value = "assets/maps/map01.toml")]
    map: PathBuf,
    /// Simulated seconds to run.
    #[arg(long, default_value_t = 60)]
    seconds: u32,
    /// Block to place before the run starts, as KEY@X,Y. Repeatable.
    #[arg(long = "place", value_name = "KEY@X,Y")]
    placements: Vec<PlaceRequest>,
    /// Print a frame every N ticks; 0 prints only the final frame.
    #[arg(long, default_value_t = 150)]
    render_every: u64,
    /// Log filter, overriding RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

/// Entry point for the Screamporium command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref());
    println!("{WELCOME_BANNER}");

    let config = LevelConfig::load(&args.level)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;
    let background = TomlMapLoader
        .load(&args.map)
        .with_context(|| format!("failed to load map {}", args.map.display()))?;
    info!(
        blocks = config.blocks.len(),
        width = background.width(),
        height = background.height(),
        "level loaded"
    );

    let mut session = Session::new(config, background)?;
    for request in &args.placements {
        session
            .place(*request)
            .with_context(|| format!("failed to place {}", request.cell))?;
    }

    let stdout = io::stdout();
    let mut backend = TextBackend::new(stdout.lock());
    let total_ticks = u64::from(args.seconds) * 30;
    for tick in 1..=total_ticks {
        let _ = session.advance(TICK)?;
        if args.render_every > 0 && tick % args.render_every == 0 {
            backend.present(&Scene::capture(session.level()))?;
        }
    }
    if args.render_every == 0 {
        backend.present(&Scene::capture(session.level()))?;
    }

    let stats = session.stats();
    let level = session.level();
    println!(
        "ticks {} | spawned {} | escaped {} | scared to death {} | sounds {} | wins {} | losses {}",
        stats.ticks,
        stats.spawned,
        stats.escaped,
        stats.scared_to_death,
        stats.sounds,
        stats.wins,
        stats.losses,
    );
    println!(
        "geld {} | rating {} | blocks {}",
        query::geld(level),
        query::rating(level),
        query::placements(level).count(),
    );
    Ok(())
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
