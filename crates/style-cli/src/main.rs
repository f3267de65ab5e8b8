//! Stylesheet loader CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "style")]
#[command(version)]
#[command(about = "Compile stylesheets for a module loader", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// YAML config file with a `style` section
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Directory the module base URL maps to (defaults to the current directory)
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Stylesheet directory, relative to the base directory
    #[arg(long)]
    pub path: Option<String>,

    /// Deployment root URL for optimized output
    #[arg(long)]
    pub root_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an optimizing build and write the wrapper modules to a bundle
    Build {
        #[command(flatten)]
        common: CommonArgs,

        /// Stylesheet module names (e.g. main.scss)
        names: Vec<String>,

        /// Build every stylesheet under the stylesheet directory
        #[arg(long)]
        all: bool,

        /// Module id the plugin is registered under
        #[arg(long, default_value = style_loader::PLUGIN_NAME)]
        plugin_name: String,

        /// Write the bundle to FILE (defaults to stdout)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Compile stylesheets for development and inject them into a page
    Inject {
        #[command(flatten)]
        common: CommonArgs,

        /// Stylesheet module names, injected in order
        #[arg(required = true)]
        names: Vec<String>,

        /// HTML page to inject into (prints the CSS when omitted)
        #[arg(long)]
        html: Option<String>,

        /// Write the page to FILE instead of updating it in place
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "style_cli=info,style_loader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            common,
            names,
            all,
            plugin_name,
            output,
        } => commands::build::execute(commands::build::BuildArgs {
            common,
            names,
            all,
            plugin_name,
            output,
        }),
        Commands::Inject {
            common,
            names,
            html,
            output,
        } => commands::inject::execute(commands::inject::InjectArgs {
            common,
            names,
            html,
            output,
        }),
    }
}
