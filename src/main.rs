use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use territory::ai::PlayerAgent;
use territory::arena::{Detachment, SharedResources};
use territory::config::AppConfig;
use territory::error::AgentError;
use territory::game::TeamId;
use territory::play::{LogNotifier, Session, SessionEnd};

/// Join the shared territory board as one piece of a team.
#[derive(Parser)]
#[command(name = "territory", about = "Play one piece on a shared territory-capture board")]
struct Cli {
    /// Team to play for, a single digit 0-9
    #[arg(required_unless_present = "clean")]
    team: Option<TeamId>,

    /// Remove the shared arena and lock left behind by earlier runs, then exit
    #[arg(short, long)]
    clean: bool,

    /// Path to TOML configuration file
    #[arg(long, default_value = "territory.toml")]
    config: PathBuf,

    /// Override board width (only used when creating the arena)
    #[arg(long)]
    width: Option<usize>,

    /// Override board height (only used when creating the arena)
    #[arg(long)]
    height: Option<usize>,

    /// Override the sleep between ticks, in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(width) = cli.width {
        config.board.width = width;
    }
    if let Some(height) = cli.height {
        config.board.height = height;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.agent.tick_interval_ms = tick_ms;
    }
    config.validate()?;

    init_logging(&config.logging.level)?;

    if cli.clean {
        SharedResources::force_reset(&config.resources)
            .context("removing shared resources")?;
        println!("Shared resources removed.");
        return Ok(());
    }
    let Some(team) = cli.team else {
        bail!("a team (0-9) is required");
    };

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))
        .context("installing signal handler")?;

    let resources = SharedResources::open(&config.resources, &config.board)
        .context("opening shared resources")?;
    let attachment = resources.attach().context("attaching to the shared arena")?;
    println!(
        "{} playing for team {team} on a {}x{} board ({} attached)",
        attachment.agent_id, attachment.width, attachment.height, attachment.attach_count
    );

    let mut agent = PlayerAgent::new(
        team,
        attachment.agent_id,
        StdRng::from_os_rng(),
        config.agent.spawn_trials,
    );
    let session = Session::new(resources, LogNotifier, config.agent.tick_interval());
    let outcome = session.run(&mut agent, &stop);

    // A broken lock or arena is left in place for `--clean`.
    if let Err(AgentError::Resource(err)) = outcome {
        return Err(err).context("shared arena failed; run with --clean to reset it");
    }

    session
        .withdraw(&mut agent)
        .context("removing this agent's piece from the board")?;
    if let Ok(arena) = session.resources().snapshot() {
        println!("{}", arena.board);
    }
    match session.resources().detach().context("detaching from the shared arena")? {
        Detachment::Remaining(remaining) => println!("Detached; {remaining} still attached."),
        Detachment::Destroyed => println!("Last one out; shared arena removed."),
    }

    match outcome? {
        SessionEnd::Won => println!("Team {team} won."),
        SessionEnd::Lost => println!("{} was captured. Team {team} lost this piece.", agent.agent_id()),
        SessionEnd::Interrupted => println!("Stopped."),
    }
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("creating log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
