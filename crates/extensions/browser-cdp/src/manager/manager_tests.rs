use super::manager_pages::{first_web_tab, shows_board};
use super::*;
use crate::cdp::{CdpError, PageInfo};

fn tab(url: &str) -> PageInfo {
    PageInfo {
        id: format!("id-{}", url.len()),
        page_type: "page".to_string(),
        title: String::new(),
        url: url.to_string(),
        web_socket_debugger_url: None,
    }
}

#[test]
fn test_config_default() {
    let config = BrowserManagerConfig::default();
    assert_eq!(config.debug_port, 9222);
    assert!(config.launch);
    assert!(!config.headless);
    assert_eq!(config.request_timeout.as_secs(), 30);
}

#[test]
fn test_config_endpoint() {
    let config = BrowserManagerConfig {
        debug_port: 9333,
        ..Default::default()
    };
    assert_eq!(config.endpoint(), "http://localhost:9333");
}

#[test]
fn test_config_profile_dir() {
    let config = BrowserManagerConfig::default();
    let profile = config.get_profile_dir();
    assert!(profile.ends_with(".pinharvest/browser-profile"));
}

#[test]
fn test_browser_error_display() {
    let err = BrowserError::ConnectionFailed("timeout".to_string());
    assert_eq!(err.to_string(), "Connection failed: timeout");

    let err = BrowserError::ChromeNotFound;
    assert_eq!(err.to_string(), "Chrome not found. Please install Google Chrome.");
}

#[test]
fn test_cdp_error_conversion() {
    let err: BrowserError = CdpError::SessionClosed.into();
    assert!(matches!(err, BrowserError::NotConnected));

    let err: BrowserError = CdpError::NavigationFailed("net::ERR_ABORTED".to_string()).into();
    assert!(matches!(err, BrowserError::NavigationFailed(_)));
}

#[test]
fn test_shows_board_ignores_trailing_slash() {
    let open = tab("https://www.pinterest.com/someone/wallpapers/");
    assert!(shows_board(&open, "https://www.pinterest.com/someone/wallpapers"));
    assert!(shows_board(&open, "https://www.pinterest.com/someone/wallpapers/"));
    assert!(!shows_board(&open, "https://www.pinterest.com/someone/cats/"));
}

#[test]
fn test_first_web_tab_skips_internal_pages() {
    let mut worker = tab("https://www.pinterest.com/sw.js");
    worker.page_type = "service_worker".to_string();
    let pages = vec![
        tab("chrome://newtab/"),
        worker,
        tab("https://www.pinterest.com/someone/wallpapers/"),
    ];
    let found = first_web_tab(&pages).unwrap();
    assert!(found.url.ends_with("/wallpapers/"));
    assert!(first_web_tab(&pages[..1]).is_none());
}

#[tokio::test]
async fn test_close_without_connect() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    assert!(manager.close().await.is_ok());
    assert!(!manager.launched_chrome().await);
}

#[tokio::test]
async fn test_client_requires_connect() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    assert!(matches!(manager.client().await, Err(BrowserError::NotConnected)));
}

#[tokio::test]
async fn test_connect_without_launch_fails_fast() {
    // Port 1 is privileged and never serves DevTools.
    let manager = BrowserManager::new(BrowserManagerConfig {
        debug_port: 1,
        launch: false,
        ..Default::default()
    });
    let err = manager.connect().await.unwrap_err();
    assert!(matches!(err, BrowserError::ConnectionFailed(_)));
}
