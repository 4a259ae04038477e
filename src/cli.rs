//! CLI definitions for pinharvest.

use std::path::PathBuf;

use clap::Parser;
use pinharvest_config::Config;
use pinharvest_core::ResolveRange;

/// pinharvest CLI.
#[derive(Parser, Debug)]
#[command(name = "pinharvest")]
#[command(about = "Resolve full-resolution image addresses from an image board")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Board URL. Without one, the first open browser tab is used.
    #[arg(short, long, env = "PINHARVEST_BOARD_URL")]
    pub url: Option<String>,

    /// First ordinal to resolve (inclusive)
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Ordinal to stop before (exclusive). Defaults to the end.
    #[arg(long)]
    pub stop: Option<usize>,

    /// Keep only the first N references on the board
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output file, or a directory to write `<board>.txt` into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON status report here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip scroll saturation and list what is already loaded
    #[arg(long)]
    pub no_scroll: bool,

    /// Launch Chrome headless (only when pinharvest starts it)
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.board.url = Some(url.clone());
        }
        if let Some(count) = self.count {
            config.board.count = Some(count);
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.display().to_string());
        }
        if let Some(report) = &self.report {
            config.output.report = Some(report.display().to_string());
        }
        if self.no_scroll {
            config.scroll.enabled = false;
        }
        if self.headless {
            config.browser.headless = true;
        }
    }

    pub fn range(&self) -> ResolveRange {
        ResolveRange::new(self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["pinharvest"]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert!(config.scroll.enabled);
        assert!(config.board.url.is_none());
        assert_eq!(cli.range(), ResolveRange::full());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "pinharvest",
            "--url",
            "https://www.pinterest.com/someone/wallpapers/",
            "--start",
            "3",
            "--stop",
            "6",
            "-n",
            "40",
            "--no-scroll",
            "--headless",
            "-o",
            "out",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(
            config.board.url.as_deref(),
            Some("https://www.pinterest.com/someone/wallpapers/")
        );
        assert_eq!(config.board.count, Some(40));
        assert!(!config.scroll.enabled);
        assert!(config.browser.headless);
        assert_eq!(config.output.path.as_deref(), Some("out"));
        assert_eq!(cli.range(), ResolveRange::new(3, Some(6)));
    }
}
