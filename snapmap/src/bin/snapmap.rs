use std::env;
use std::io::stdout;

use clap::Parser;
use log::log_enabled;
use snapmap::SnapmapResult;
use snapmap::args::{Args, Command};
use snapmap::config::{Config, OsEnv, read_config};
use snapmap::logging::{ensure_core_log_level_matches, init_tracing};
use snapmap::{demo, replay};
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn start(args: Args) -> SnapmapResult<()> {
    info!("Starting snapmap v{VERSION}");

    let env = OsEnv;
    let save_config = args.meta.save_config.clone();
    let mut config = if let Some(cfg_filename) = args.meta.config_path(&env) {
        info!("Using {}", cfg_filename.display());
        read_config(&cfg_filename, &env)?
    } else {
        info!("Config file is not specified, using defaults");
        Config::default()
    };

    let command = args.command.clone();
    args.merge_into_config(&mut config)?;
    config.finalize()?;

    if let Some(file_name) = save_config {
        config.save_to_file(file_name.as_path())?;
    } else {
        info!("Use --save-config to save or print snapmap configuration.");
    }

    match command {
        Some(Command::Demo(args)) => {
            let cmap = args.cmap.as_deref().unwrap_or(config.cmap());
            demo::write_demo(args.n, args.offset, cmap, args.output.as_deref())?;
        }
        Some(Command::Replay(args)) => {
            let steps = replay::load_steps(&args.steps)?;
            replay::run(&config, &steps, &mut stdout().lock())?;
        }
        None => {
            let view = replay::run(&config, &[], &mut stdout().lock())?;
            info!(
                "{} overlays drawn, {} hoverable points indexed",
                view.reconciler().len(),
                view.index().len()
            );
        }
    }
    Ok(())
}

fn main() {
    let filter = ensure_core_log_level_matches(env::var("RUST_LOG").ok(), "snapmap=");
    init_tracing(&filter, env::var("SNAPMAP_LOG_FORMAT").ok());

    let args = Args::parse();
    if let Err(e) = start(args) {
        // Ensure the message is printed, even if the logging is disabled
        if log_enabled!(log::Level::Error) {
            error!("{e}");
        } else {
            eprintln!("{e}");
        }
        std::process::exit(1);
    }
}
