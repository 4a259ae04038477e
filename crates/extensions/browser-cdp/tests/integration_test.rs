//! Integration tests against a real Chrome.
//!
//! These tests require Chrome to be installed on the system.
//! Run with: cargo test -p pinharvest-browser-cdp --test integration_test -- --ignored --nocapture

use std::time::Duration;

use pinharvest_browser_cdp::manager::{BrowserManager, BrowserManagerConfig};
use pinharvest_core::{
    HostPage, LoaderConfig, LowResReference, ResolveRange, Resolver, ResolverConfig, ScrollLoader,
    collect_references,
};
use tokio_util::sync::CancellationToken;

/// Test helper to create a manager with test-specific config.
fn test_config() -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: 9333, // Use different port to avoid conflicts
        profile_dir: Some(std::env::temp_dir().join("pinharvest-test-profile")),
        headless: true,
        launch: true,
        request_timeout: Duration::from_secs(20),
    }
}

fn detail_page(src: &str) -> String {
    format!(
        "data:text/html,<img src='data:image/gif;base64,R0lGODlhAQABAAAAACw='><img src='{}'>",
        src
    )
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_chrome_detection() {
    let chrome_path = BrowserManager::find_chrome();
    assert!(chrome_path.is_some(), "Chrome should be installed on the system");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_board_tab_scroll_and_links() {
    let manager = BrowserManager::new(test_config());
    let board = "data:text/html,<body style='margin:0'><div style='height:5000px'></div><a class='pinLink' href='https://example.com/pin/1/'>1</a><a class='pinLink' href='https://example.com/pin/2/'>2</a></body>";

    let page = manager.host_page(Some(board)).await.expect("board tab");
    let probe = page.measure().await.expect("measure");
    assert!(probe.extent() >= 5000.0);

    let loader = ScrollLoader::new(LoaderConfig {
        settle: Duration::from_millis(200),
        ..Default::default()
    });
    let extent = loader
        .saturate(&page, &CancellationToken::new())
        .await
        .expect("static page saturates");
    assert!(extent.height_px >= 5000.0);

    let refs = collect_references(&page, "a.pinLink", None).await.expect("links");
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[1].address, "https://example.com/pin/2/");

    manager.shutdown_chrome().await.expect("shutdown");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_resolve_detail_tabs() {
    let manager = BrowserManager::new(test_config());
    manager.connect().await.expect("connect");
    let opener = manager.context_opener().await.expect("opener");

    let refs = vec![
        LowResReference::new(0, detail_page("https://example.com/a.jpg")),
        LowResReference::new(1, "data:text/html,<p>no images</p>"),
        LowResReference::new(2, detail_page("https://example.com/c.jpg")),
    ];

    let resolver = Resolver::new(
        opener,
        ResolverConfig {
            load_timeout: Duration::from_secs(15),
        },
    );
    let seq = resolver
        .resolve(&refs, ResolveRange::full(), &CancellationToken::new())
        .await
        .expect("resolve");

    let lines: Vec<String> = seq.iter().map(|a| a.line()).collect();
    assert_eq!(lines[0], "https://example.com/a.jpg");
    assert_eq!(lines[1], "# 1 failed: no asset found");
    assert_eq!(lines[2], "https://example.com/c.jpg");

    manager.shutdown_chrome().await.expect("shutdown");
}
