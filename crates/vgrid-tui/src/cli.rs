//! CLI argument parsing for vgrid-tui.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vgrid-tui")]
#[command(about = "Vertical app grid in the terminal", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging (logs to /tmp/vgrid-tui.log)
    #[arg(short, long)]
    pub debug: bool,

    /// Read config.json, apps.json and friends from this directory
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Run the app's command line on activation
    #[arg(long)]
    pub exec: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive grid (default)
    Tui,

    /// Print the sections in display order
    List,

    /// Add an app to favorites, or remove it if it already is one
    Favorite {
        /// App id, e.g. firefox.desktop
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_tui() {
        let cli = Cli::try_parse_from(["vgrid-tui"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
        assert!(!cli.exec);
    }

    #[test]
    fn test_parse_favorite_with_config_dir() {
        let cli = Cli::try_parse_from([
            "vgrid-tui",
            "--config-dir",
            "/tmp/grid",
            "favorite",
            "files.desktop",
        ])
        .unwrap();
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/grid")));
        assert!(matches!(cli.command, Some(Commands::Favorite { id }) if id == "files.desktop"));
    }
}
