// src/main.rs
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use hand_scroll::app::HandScrollApp;
use hand_scroll::config::AppConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scroll a page with hand gestures", long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Camera index to use
    #[arg(long)]
    camera: Option<u32>,

    /// Run with synthetic frames and a scripted hand instead of the camera
    #[arg(long)]
    simulate: bool,

    /// Program that runs the landmark engine
    #[arg(long)]
    engine_program: Option<String>,

    /// Argument passed to the landmark engine (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Hide the camera preview overlay
    #[arg(long)]
    no_preview: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(index) = self.camera {
            config.camera.index = index;
        }
        if self.simulate {
            config.simulate = true;
        }
        if let Some(program) = &self.engine_program {
            config.engine.program = program.clone();
        }
        if !self.engine_args.is_empty() {
            config.engine.args = self.engine_args.clone();
        }
        if self.no_preview {
            config.show_preview = false;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    info!("Configuration: {:?}", config);

    // Scroll repeaters run here; the frame loop stays on the UI thread with the camera.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .thread_name("scroll-timer")
        .build()
        .context("Failed to start timer runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Hands-Based Navigation",
        options,
        Box::new(move |cc| Box::new(HandScrollApp::new(cc, config, handle))),
    )
    .map_err(|e| anyhow!("Error running application: {}", e))?;

    info!("Shutting down");
    Ok(())
}
