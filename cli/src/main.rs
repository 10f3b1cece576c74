use clap::{Parser, Subcommand};
use sorteo_cli::commands;
use sorteo_cli::logging;
use sorteo_cli::readline;
use sorteo_cli::CliContext;
use sorteo_core::{ShellConfig, ShellConfigExt};
use std::io::Write;
use std::path::PathBuf;

/// Startup flags. `--seed` and `--fast` apply to this run only and are never
/// written back by `config --save`.
#[derive(Parser, Debug)]
#[command(name = "sorteo")]
#[command(about = "Run a live prize raffle from the terminal")]
#[command(version)]
struct Args {
    /// Participant catalog (.json or .toml)
    #[arg(long)]
    participants: Option<String>,

    /// Prize catalog (.json or .toml)
    #[arg(long)]
    prizes: Option<String>,

    /// Fixed seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Skip spin animations
    #[arg(long)]
    fast: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ShellConfig::try_load_from(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "Using default configuration");
            ShellConfig::default()
        }),
        None => ShellConfig::load(),
    };
    if let Some(path) = args.participants {
        config.participants_path = path;
    }
    if let Some(path) = args.prizes {
        config.prizes_path = path;
    }

    let mut ctx = CliContext::new(config);
    ctx.config_file = args.config;
    ctx.seed = args.seed;
    ctx.fast = args.fast;
    if let Err(err) = commands::load_catalog(&mut ctx, None, None) {
        println!("{err}");
        println!("Use `load --participants <file> --prizes <file>` to pick catalogs.");
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "sorteo shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load participant and prize catalogs
    Load {
        #[arg(long)]
        participants: Option<String>,
        #[arg(long)]
        prizes: Option<String>,
    },
    /// Start a raffle over the loaded catalogs
    Start {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Move on to the next prize
    Next,
    /// Spin one round (or every remaining round of the prize)
    Spin {
        #[arg(short, long)]
        all: bool,
    },
    Status,
    /// Show the winners list
    Report,
    /// Write the winners list as JSON
    Export {
        #[arg(short, long)]
        path: String,
    },
    /// Abandon the raffle and start over from the first prize
    Reset,
    Config {
        #[arg(long)]
        save: bool,
    },
    Exit,
}

async fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "sorteo".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load {
            participants,
            prizes,
        }) => commands::load_catalog(ctx, participants.as_deref(), prizes.as_deref())?,
        Some(Commands::Start { seed }) => commands::start(ctx, *seed)?,
        Some(Commands::Next) => commands::next_prize(ctx)?,
        Some(Commands::Spin { all }) => commands::spin(ctx, *all).await?,
        Some(Commands::Status) => commands::show_status(ctx)?,
        Some(Commands::Report) => commands::show_report(ctx)?,
        Some(Commands::Export { path }) => commands::export_report(ctx, path)?,
        Some(Commands::Reset) => commands::reset(ctx)?,
        Some(Commands::Config { save }) => commands::show_config(ctx, *save)?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
