//! The board tab as a [`HostPage`].

use async_trait::async_trait;
use pinharvest_core::{ExtentProbe, HostError, HostPage};
use tracing::trace;

use crate::cdp::PageSession;

const MEASURE_SCRIPT: &str = r#"(() => {
    const body = document.body || {};
    const root = document.documentElement || {};
    return {
        bodyScrollHeight: body.scrollHeight || 0,
        bodyOffsetHeight: body.offsetHeight || 0,
        clientHeight: root.clientHeight || 0,
        scrollHeight: root.scrollHeight || 0,
        offsetHeight: root.offsetHeight || 0,
        scrollTop: window.scrollY || root.scrollTop || 0,
        visibleHeight: window.innerHeight || root.clientHeight || 0,
    };
})()"#;

/// Build the link-listing script for `selector`.
///
/// The selector goes in as a JSON string literal so quotes in it cannot
/// break out of the expression.
fn list_links_script(selector: &str) -> Result<String, HostError> {
    let quoted = serde_json::to_string(selector)
        .map_err(|e| HostError::InvalidResponse(e.to_string()))?;
    Ok(format!(
        "Array.from(document.querySelectorAll({quoted})).map(a => a.href || a.getAttribute('href') || '').filter(h => h.length > 0)"
    ))
}

/// An attached board tab.
pub struct CdpHostPage {
    session: PageSession,
}

impl CdpHostPage {
    pub fn new(session: PageSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }
}

#[async_trait]
impl HostPage for CdpHostPage {
    async fn measure(&self) -> Result<ExtentProbe, HostError> {
        let probe: ExtentProbe = self.session.evaluate_as(MEASURE_SCRIPT).await?;
        trace!("Measured extent {} (top {})", probe.extent(), probe.scroll_top);
        Ok(probe)
    }

    async fn scroll_to(&self, y: f64) -> Result<(), HostError> {
        self.session
            .evaluate(&format!("window.scrollTo(0, {y})"))
            .await?;
        Ok(())
    }

    async fn list_links(&self, selector: &str) -> Result<Vec<String>, HostError> {
        let script = list_links_script(selector)?;
        Ok(self.session.evaluate_as(&script).await?)
    }
}
