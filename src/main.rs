//! Dockspace command-line tool

use anyhow::{Context, Result};
use clap::Parser;

use dockspace::cli::{layout_summary, normalize_layout, run_demo, CliArgs, Command};
use dockspace::config::DockConfig;
use dockspace::layout::Layout;
use dockspace::layout_store::LayoutStore;
use dockspace::tab_manager::ManagerId;

fn main() -> Result<()> {
    dockspace::tracing::init();

    let args = CliArgs::parse();
    tracing::debug!(command = ?args.command, "starting");

    match args.command {
        Command::Check { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let layout = Layout::from_json(&json)
                .with_context(|| format!("Invalid layout in {}", file.display()))?;
            print!("{}", layout_summary(&layout));
        }
        Command::Normalize { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let normalized = normalize_layout(&json)
                .with_context(|| format!("Invalid layout in {}", file.display()))?;
            println!("{}", normalized);
        }
        Command::Demo { save } => {
            let global = run_demo(DockConfig::load());
            let layout = global.persist_layout(ManagerId::GLOBAL);
            println!("{}", layout.to_json()?);

            let stats = global.stats();
            eprintln!(
                "max tabs: {}, max windows: {}",
                stats.max_tabs, stats.max_windows
            );

            if save {
                dockspace::config_paths::ensure_all_config_dirs();
                let store = LayoutStore::open_default().context("No config directory available")?;
                let path = store.save(&layout)?;
                eprintln!("saved {}", path.display());
            }
        }
        Command::List { dir } => {
            let store = match dir {
                Some(dir) => LayoutStore::new(dir),
                None => LayoutStore::open_default().context("No config directory available")?,
            };
            for name in store.list()? {
                println!("{}", name);
            }
        }
        Command::Config { init } => {
            let config = DockConfig::load();
            print!("{}", serde_yaml::to_string(&config)?);
            if init {
                config.save().map_err(anyhow::Error::msg)?;
                if let Some(path) = dockspace::config_paths::config_file() {
                    eprintln!("wrote {}", path.display());
                }
            }
        }
    }

    Ok(())
}
