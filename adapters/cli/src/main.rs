#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for Pacboy.
//!
//! Runs a session on simulated time with an autopilot at the controls and
//! draws the board as ASCII.

mod ascii;
mod autopilot;
mod config;
mod notifications;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use pacboy_session::{Collaborators, Session};
use pacboy_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{ascii::AsciiRenderer, notifications::LogSink};

const FRAME: Duration = Duration::from_millis(16);
const INPUT_INTERVAL: Duration = Duration::from_millis(160);

#[derive(Parser, Debug)]
#[command(name = "pacboy", about = "Runs a headless Pacboy session")]
struct Args {
    /// Simulated seconds to run.
    #[arg(long, default_value_t = 30)]
    seconds: u64,

    /// Seed for every random source. Omit for an entropy-seeded run.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the default game configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter such as `info` or `pacboy_world=debug`. Falls back to
    /// `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,

    /// Print every Nth presented frame. Zero disables drawing.
    #[arg(long, default_value_t = 25)]
    draw_every: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let config = config::load(args.config.as_deref(), args.seed)?;
    let collaborators = Collaborators {
        renderer: Box::new(AsciiRenderer::stdout(args.draw_every)),
        audio: Box::new(LogSink),
        ui: Box::new(LogSink),
    };
    let mut session = Session::new(config, collaborators).context("failed to start session")?;
    println!("{}", query::welcome_banner(session.world()));

    let mut since_input = Duration::ZERO;
    let mut elapsed = Duration::ZERO;
    let limit = Duration::from_secs(args.seconds);
    while elapsed < limit {
        session.advance(FRAME);
        elapsed += FRAME;
        since_input += FRAME;
        if since_input >= INPUT_INTERVAL {
            since_input = Duration::ZERO;
            autopilot::drive(&mut session);
        }
    }

    let campaign = query::campaign(session.world());
    info!(
        level = campaign.level,
        total_score = campaign.total_score,
        completed_levels = campaign.completed_levels,
        "run_finished"
    );
    println!(
        "Reached level {} with {} points over {} cleared levels",
        campaign.level, campaign.total_score, campaign.completed_levels
    );
    Ok(())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}
