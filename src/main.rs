// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use snapcam::app::{AppFlags, AppModel};
use snapcam::backends::camera::CameraBackendType;
use snapcam::config::{Config, Profile};
use snapcam::constants::{APP_ID, NO_CAMERA_MESSAGE, ui};
use snapcam::i18n;
use snapcam::session::Session;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "snapcam")]
#[command(about = "Live camera preview with photo and video capture")]
#[command(version = env!("SNAPCAM_BUILD_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Deployment profile (overrides the saved setting)
    #[arg(long, global = true, value_enum)]
    profile: Option<Profile>,

    /// Camera backend to try; repeat to set the open order
    #[arg(long = "backend", global = true, value_enum)]
    backends: Vec<CameraBackendType>,

    /// V4L2 device node
    #[arg(long, global = true)]
    device: Option<String>,

    /// Directory for photos and videos
    #[arg(short, long, global = true, default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a single photo
    Photo,

    /// Record a video
    Record {
        /// Recording duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,
    },

    /// Show which camera backends can be opened
    Backends,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=snapcam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let config = Config::load(APP_ID).with_overrides(
        cli.profile,
        &cli.backends,
        cli.device.as_deref(),
    );

    // Ensure the output directory exists
    std::fs::create_dir_all(&cli.output_dir)?;

    match cli.command {
        Some(Commands::Photo) => cli::take_photo(&config, &cli.output_dir),
        Some(Commands::Record { duration }) => {
            cli::record_video(&config, &cli.output_dir, duration)
        }
        Some(Commands::Backends) => cli::list_backends(&config),
        None => run_gui(config, cli.output_dir),
    }
}

fn run_gui(config: Config, output_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // The camera is checked before any window is created
    let session = match Session::open(&config, output_dir) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "No camera available");
            println!("{}", NO_CAMERA_MESSAGE);
            std::process::exit(1);
        }
    };

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default()
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(ui::MIN_WINDOW_WIDTH)
                .min_height(ui::MIN_WINDOW_HEIGHT),
        )
        .exit_on_close(false);

    cosmic::app::run::<AppModel>(settings, AppFlags { config, session })?;

    Ok(())
}
