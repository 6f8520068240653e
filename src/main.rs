//! DikeFinder - geological dike viewer
//!
//! Entry point that handles CLI argument parsing and mode switching
//! between headless CLI and full GUI modes.

use std::path::PathBuf;

use clap::Parser;
use dikefinder::app::Session;
use dikefinder::config::ViewerConfig;
use dikefinder::ui::cli::run_cli;
use dikefinder::ui::gui::DikeFinderApp;

/// DikeFinder: map sheets and dike records side by side
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory searched for the data workbook (created if missing)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Workbook to load instead of searching the data directory
    #[arg(long)]
    excel: Option<PathBuf>,

    /// Directory holding the map images (defaults to the data directory)
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Run in headless mode (CLI only, no GUI)
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // 1. Parse command line arguments
    let args = Args::parse();
    let config = ViewerConfig::resolve(args.data_dir, args.image_dir, args.excel, args.verbose);

    // 2. Initialize logger. Our own records pass the filter at every level so the
    //    GUI's Verbose toggle can raise the max level at runtime.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,dikefinder=trace"),
    )
    .init();
    log::set_max_level(config.log_level());

    log::info!("DikeFinder v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Config: {:?}", config);

    // 3. Resolve data: data directory, workbook (or samples), image prefixes
    config.ensure_data_dir();
    let session = Session::from_config(&config);

    // 4. Branch based on execution mode
    if args.headless {
        println!("[*] DikeFinder v{} - Headless Mode", env!("CARGO_PKG_VERSION"));
        run_cli(session)?;
    } else {
        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 500.0])
                .with_title("DikeFinder"),
            ..Default::default()
        };

        eframe::run_native(
            "DikeFinder",
            native_options,
            Box::new(move |cc| {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
                Box::new(DikeFinderApp::new(session, &config))
            }),
        )
        .map_err(|e| anyhow::anyhow!("GUI Error: {}", e))?;
    }

    Ok(())
}
