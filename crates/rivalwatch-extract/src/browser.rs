//! Headless browser rendering for script-heavy pages
//!
//! One browser process per render. The process is closed on every exit
//! path, including navigation failures and the render ceiling.

use futures::StreamExt;
use tracing::{debug, info, warn};

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Browser, BrowserConfig};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;

/// Launch a browser, load `url`, wait for scripts to settle and return the
/// rendered markup
pub(crate) async fn render_html(url: String, config: ExtractorConfig) -> Result<String, ExtractError> {
    let browser_config = browser_config(&config)?;

    info!("Launching headless browser for {}", url);
    let (mut browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| ExtractError::Browser(format!("failed to launch browser: {}", e)))?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let ceiling = config.render_timeout;
    let result = match tokio::time::timeout(ceiling, load_and_read(&browser, &url, &config)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Render of {} exceeded {}s", url, ceiling.as_secs());
            Err(ExtractError::RenderTimeout(ceiling.as_secs()))
        }
    };

    shutdown(&mut browser).await;
    handler_task.abort();

    result
}

fn browser_config(config: &ExtractorConfig) -> Result<BrowserConfig, ExtractError> {
    let mut builder = BrowserConfig::builder()
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--disable-gpu");

    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    builder
        .build()
        .map_err(|e| ExtractError::Browser(format!("invalid browser config: {}", e)))
}

async fn load_and_read(
    browser: &Browser,
    url: &str,
    config: &ExtractorConfig,
) -> Result<String, ExtractError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| ExtractError::Browser(format!("failed to open page: {}", e)))?;

    page.execute(SetUserAgentOverrideParams::new(config.user_agent.clone()))
        .await
        .map_err(|e| ExtractError::Browser(format!("failed to set user agent: {}", e)))?;

    let nav_params = NavigateParams::builder()
        .url(url)
        .build()
        .map_err(|e| ExtractError::Browser(format!("invalid URL {}: {}", url, e)))?;

    debug!("Navigating to {}", url);
    page.execute(nav_params)
        .await
        .map_err(|e| ExtractError::Browser(format!("navigation failed for {}: {}", url, e)))?;

    if let Err(e) = page.wait_for_navigation().await {
        debug!("Waiting for load of {} failed: {}", url, e);
    }

    tokio::time::sleep(config.settle_wait).await;

    let content = page
        .content()
        .await
        .map_err(|e| ExtractError::Browser(format!("failed to read page content: {}", e)))?;

    if let Err(e) = page.close().await {
        debug!("Failed to close page: {}", e);
    }

    Ok(content)
}

async fn shutdown(browser: &mut Browser) {
    if let Err(e) = browser.close().await {
        warn!("Browser did not close cleanly, killing it: {}", e);
        let _ = browser.kill().await;
        return;
    }
    match browser.wait().await {
        Ok(_) => debug!("Browser process exited"),
        Err(e) => warn!("Failed waiting for browser exit: {}", e),
    }
}
