mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pwagen_lib::consts::{DEFAULT_ASSET_FOLDER, DEFAULT_ICON_SIZES, DEFAULT_OUTPUT_FILE, DEFAULT_PUBLIC_FOLDER};

use crate::cmd::{BuildArgs, IconsArgs, SwArgs};
use crate::output::{OutputFormat, print_error};

/// pwagen - Progressive Web App asset generator
#[derive(Parser)]
#[command(name = "pwagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the web-app manifest and its image artifacts
  Build {
    /// Configuration file (default: $PWAGEN_CONFIG or pwa.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix prepended to every artifact URL
    #[arg(short = 'u', long = "url-prefix", visible_alias = "url_prefix", default_value = "")]
    url_prefix: String,

    /// Public folder the artifacts and manifest are written to
    #[arg(short = 'p', long = "public-folder", visible_alias = "public_folder", default_value = DEFAULT_PUBLIC_FOLDER)]
    public_folder: PathBuf,

    /// Asset folder inside the public folder
    #[arg(short = 'a', long = "asset-folder", visible_alias = "asset_folder", default_value = DEFAULT_ASSET_FOLDER)]
    asset_folder: String,

    /// Manifest file name inside the public folder
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: String,

    /// Summary format
    #[arg(long, value_enum, default_value_t)]
    message_format: OutputFormat,
  },

  /// Resize one image into a set of square icons
  Icons {
    /// Source image
    source: PathBuf,

    /// Output directory
    output: PathBuf,

    /// Icon sizes in pixels
    #[arg(default_values_t = DEFAULT_ICON_SIZES)]
    sizes: Vec<u32>,

    /// File name stem
    #[arg(short = 'n', long, default_value = "icon")]
    filename: String,

    /// Output format (default: the source format)
    #[arg(short, long)]
    format: Option<String>,
  },

  /// Print the service-worker fragments for background fetch
  Sw {
    /// Configuration file (default: $PWAGEN_CONFIG or pwa.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Passed through to the service-worker rules (background fetch output is unaffected)
    #[arg(long)]
    debug: bool,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build {
      config,
      url_prefix,
      public_folder,
      asset_folder,
      output,
      message_format,
    } => cmd::cmd_build(
      &BuildArgs {
        config,
        url_prefix,
        public_folder,
        asset_folder,
        output,
      },
      message_format,
    ),
    Commands::Icons {
      source,
      output,
      sizes,
      filename,
      format,
    } => cmd::cmd_icons(&IconsArgs {
      source,
      output,
      sizes,
      filename,
      format,
    }),
    Commands::Sw { config, output, debug } => cmd::cmd_sw(&SwArgs { config, output, debug }),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
