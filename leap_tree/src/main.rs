//! leap_tree — interactive entry point.

use clap::Parser;
use leap_tree::app::run;
use leap_tree::config::{AppConfig, Cli};
use leap_tree::error::AppError;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Leap Tree — Gesture Controlled Holiday Tree         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    if let Err(e) = start(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn start(cli: &Cli) -> Result<(), AppError> {
    let cfg = AppConfig::resolve(cli)?;

    println!("  Ornaments: {}   Selector: {:?}   Photos offered: {}",
             cfg.ornament_count, cfg.selector, cfg.photos.len());
    println!("  Opening visualizer window…");
    println!();

    run(cfg)
}
