//! One harvest run: board tab, scroll saturation, listing, resolution, output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pinharvest_browser_cdp::{BrowserError, BrowserManager, BrowserManagerConfig};
use pinharvest_config::Config;
use pinharvest_core::{
    ExtractorKind, HostError, LoaderConfig, LoaderError, Resolution, ResolveError,
    ResolveRange, Resolver, ResolverConfig, ResultSequence, RunSummary, ScrollLoader, board_name,
    collect_references, write_lines, write_report,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run-level failures. Per-ordinal failures never show up here.
#[derive(Debug, Error)]
pub(crate) enum HarvestError {
    #[error("Browser: {0}")]
    Browser(#[from] BrowserError),

    #[error("Board page: {0}")]
    Host(#[from] HostError),

    #[error("Scroll loading: {0}")]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Invalid setting: {0}")]
    Setting(String),

    #[error("Writing output: {0}")]
    Io(#[from] io::Error),

    #[error("Writing report: {0}")]
    Report(#[from] serde_json::Error),
}

pub(crate) fn manager_config(config: &Config) -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: config.browser.debug_port,
        profile_dir: Some(config.browser.profile_dir()),
        headless: config.browser.headless,
        launch: config.browser.launch,
        request_timeout: Duration::from_secs(config.browser.request_timeout_secs),
    }
}

pub(crate) fn loader_config(config: &Config) -> LoaderConfig {
    LoaderConfig {
        max_rounds: config.scroll.max_rounds,
        settle: Duration::from_millis(config.scroll.settle_ms),
        scroll_multiplier: config.scroll.scroll_multiplier,
    }
}

/// Where the result lines go: `None` is stdout. A directory gets
/// `<board>.txt` inside it.
pub(crate) fn output_target(path: Option<PathBuf>, board: Option<&str>) -> Option<PathBuf> {
    let path = path?;
    if path.is_dir() {
        Some(path.join(format!("{}.txt", board.unwrap_or("board"))))
    } else {
        Some(path)
    }
}

fn write_output(seq: &ResultSequence, target: Option<&Path>) -> io::Result<()> {
    match target {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_lines(seq, &mut out)?;
            out.flush()?;
            info!("Wrote {} lines to {}", seq.len(), path.display());
            Ok(())
        }
        None => write_lines(seq, &mut io::stdout().lock()),
    }
}

/// Harvest the board described by `config`.
pub(crate) async fn run(
    config: &Config,
    range: ResolveRange,
    cancel: &CancellationToken,
) -> Result<RunSummary, HarvestError> {
    let kind: ExtractorKind = config.resolve.extractor.parse().map_err(HarvestError::Setting)?;
    let min: Resolution = config.resolve.min_resolution.parse().map_err(HarvestError::Setting)?;

    let manager = BrowserManager::new(manager_config(config));
    let result = harvest(&manager, config, kind, min, range, cancel).await;

    if manager.launched_chrome().await {
        manager.shutdown_chrome().await?;
    } else {
        manager.close().await?;
    }

    result
}

async fn harvest(
    manager: &BrowserManager,
    config: &Config,
    kind: ExtractorKind,
    min: Resolution,
    range: ResolveRange,
    cancel: &CancellationToken,
) -> Result<RunSummary, HarvestError> {
    let host = manager.host_page(config.board.url.as_deref()).await?;

    let board_url = match &config.board.url {
        Some(url) => url.clone(),
        None => host.session().get_url().await.map_err(HostError::from)?,
    };
    let board = board_name(&board_url);
    info!("Harvesting {} ({})", board.as_deref().unwrap_or("board"), board_url);

    if config.scroll.enabled {
        let loader = ScrollLoader::new(loader_config(config));
        match loader.saturate(&host, cancel).await {
            Ok(extent) => info!("Board saturated at {}px", extent.height_px),
            Err(LoaderError::SaturationIncomplete { rounds, extent }) => warn!(
                "Board still growing after {} rounds ({}px); continuing with what loaded",
                rounds, extent.height_px
            ),
            Err(e) => return Err(e.into()),
        }
    }

    let refs = collect_references(&host, &config.board.link_selector, config.board.count).await?;
    info!("Found {} references", refs.len());

    let opener = manager.context_opener().await?;
    let resolver = Resolver::with_extractor(
        opener,
        kind.build(min),
        ResolverConfig {
            load_timeout: Duration::from_secs(config.resolve.load_timeout_secs),
        },
    );
    let seq = resolver.resolve(&refs, range, cancel).await?;

    let target = output_target(config.output.path(), board.as_deref());
    write_output(&seq, target.as_deref())?;

    if let Some(report) = config.output.report() {
        let mut out = BufWriter::new(File::create(&report)?);
        write_report(&seq, board.as_deref(), &mut out)?;
        out.flush()?;
        info!("Wrote report to {}", report.display());
    }

    let unresolved = seq.unresolved_ordinals();
    if !unresolved.is_empty() {
        warn!("Unresolved ordinals: {:?}", unresolved);
    }

    Ok(seq.summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_target_stdout() {
        assert_eq!(output_target(None, Some("wallpapers")), None);
    }

    #[test]
    fn test_output_target_directory_uses_board_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = output_target(Some(dir.path().to_path_buf()), Some("wallpapers")).unwrap();
        assert_eq!(target, dir.path().join("wallpapers.txt"));
    }

    #[test]
    fn test_output_target_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("links.txt");
        assert_eq!(output_target(Some(file.clone()), Some("wallpapers")), Some(file));
    }

    #[test]
    fn test_configs_follow_file() {
        let config: Config = pinharvest_config::ConfigLoader::load_str(
            r#"
            [browser]
            debug_port = 9333
            launch = false

            [scroll]
            max_rounds = 12
            settle_ms = 750
            "#,
        )
        .unwrap();

        let browser = manager_config(&config);
        assert_eq!(browser.debug_port, 9333);
        assert!(!browser.launch);

        let loader = loader_config(&config);
        assert_eq!(loader.max_rounds, 12);
        assert_eq!(loader.settle, Duration::from_millis(750));
    }
}
