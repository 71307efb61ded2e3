use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use connect_four::ai::SearchEngine;
use connect_four::config::{AppConfig, ModeKind};
use connect_four::game::GameOutcome;
use connect_four::session::{play_headless_match, GameSession};
use connect_four::ui::App;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Play against the engine from the keyboard
    Human,
    /// Watch the engine play itself
    Engine,
}

/// Connect Four against a minimax opponent.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four against a minimax opponent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Override the game mode
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Override the search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Override the pause between unattended moves, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Play one engine-vs-engine game on stdout instead of the TUI
    #[arg(long)]
    headless: bool,

    /// Write logs here while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    init_logging(&cli)?;

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(mode) = cli.mode {
        config.game.mode = match mode {
            Mode::Human => ModeKind::Human,
            Mode::Engine => ModeKind::Engine,
        };
    }
    if let Some(depth) = cli.depth {
        config.engine.depth = depth;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.game.move_delay_ms = delay_ms;
    }
    config.validate().context("invalid settings")?;

    let engine = SearchEngine::new(config.engine.depth);
    if cli.headless {
        return run_headless(engine, &config);
    }

    let session = GameSession::new(config.mode(), engine);
    run_tui(App::new(session, config.move_delay())).context("running terminal UI")
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("connect_four=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if cli.headless {
        builder.with_writer(std::io::stderr).init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        // Anything on stderr would corrupt the alternate screen
        builder.with_writer(std::io::sink).init();
    }
    Ok(())
}

fn run_headless(engine: SearchEngine, config: &AppConfig) -> Result<()> {
    println!("Engine vs Engine, depth {}", engine.depth());
    let outcome = play_headless_match(engine, config.move_delay(), |turn| {
        println!(
            "{:>6} -> column {} (row {})",
            turn.player.name(),
            turn.column + 1,
            turn.row + 1
        );
        print!("{}", turn.board);
    })
    .context("playing headless match")?;

    match outcome {
        GameOutcome::Winner(player) => println!("{player} wins!"),
        GameOutcome::Draw => println!("It's a draw!"),
    }
    Ok(())
}

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.map_err(Into::into)
}
