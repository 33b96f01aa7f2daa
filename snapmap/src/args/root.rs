use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Parser, Subcommand};

use crate::SnapmapResult;
use crate::args::ViewArgs;
use crate::config::{Config, Env};

/// Defines the styles used for the CLI help output.
const HELP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Blue.on_default().bold())
    .usage(AnsiColor::Blue.on_default().bold())
    .literal(AnsiColor::White.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug, PartialEq, Default)]
#[command(
    about,
    version,
    after_help = "Use RUST_LOG environment variable to control logging level, e.g. RUST_LOG=debug or RUST_LOG=snapmap=debug. Use SNAPMAP_LOG_FORMAT to pick one of json, full, compact, bare or pretty.",
    styles = HELP_STYLES
)]
pub struct Args {
    #[command(flatten)]
    pub meta: MetaArgs,
    #[command(flatten)]
    pub view: ViewArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

// None of these params will be transferred to the config
#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct MetaArgs {
    /// Path to config file. Falls back to the SNAPMAP_CONFIG environment variable.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Save resulting config to a file or use "-" to print to stdout.
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the configured overlays and play a list of interaction steps against them.
    /// Every map event is printed to stdout as a JSON line.
    Replay(ReplayArgs),
    /// Write the spiral demo scatter as GeoJSON.
    Demo(DemoArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    /// YAML file with the steps, or "-" to read them from stdin
    pub steps: PathBuf,
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct DemoArgs {
    /// Number of points on the spiral
    #[arg(short, long, default_value_t = 20_000)]
    pub n: usize,
    /// Shift every point by this many degrees in both directions
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub offset: f64,
    /// Colormap for the point values. [DEFAULT: the configured cmap]
    #[arg(long)]
    pub cmap: Option<String>,
    /// Write the GeoJSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl MetaArgs {
    /// The config file to read, if any.
    #[must_use]
    pub fn config_path<'a>(&self, env: &impl Env<'a>) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| env.get_env_str("SNAPMAP_CONFIG").map(PathBuf::from))
    }
}

impl Args {
    pub fn merge_into_config(self, config: &mut Config) -> SnapmapResult<()> {
        self.view.merge_into_config(config)?;
        Ok(())
    }
}
