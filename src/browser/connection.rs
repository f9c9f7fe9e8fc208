use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, BrowserError};

/// 连接到已开启调试端口的浏览器，并选出要提取的页面
///
/// 选择顺序：
/// 1. 标题包含 `target_title` 的页面
/// 2. 新开页面导航到 `target_url`
/// 3. 第一个已打开的页面
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}, 目标标题: {:?}", target_url, target_title);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器同步已有的 target
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser
        .pages()
        .await
        .map_err(BrowserError::ScriptExecutionFailed)?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(title) = target_title {
        debug!("正在查找标题包含 '{}' 的页面", title);
        for p in pages.iter() {
            if let Ok(Some(page_title)) = p.get_title().await {
                debug!("检查页面标题: {}", page_title);
                if page_title.contains(title) {
                    info!("✓ 找到目标页面: {}", page_title);
                    return Ok((browser, p.clone()));
                }
            }
        }
        warn!("⚠️ 没有标题包含 '{}' 的页面", title);
    }

    if let Some(url) = target_url {
        debug!("创建新页面并导航到: {}", url);
        let page = browser.new_page(url).await.map_err(|e| {
            error!("打开 {} 失败: {}", url, e);
            BrowserError::ScriptExecutionFailed(e)
        })?;
        info!("已导航到: {}", url);
        return Ok((browser, page));
    }

    match pages.into_iter().next() {
        Some(page) => {
            let title = page.get_title().await.ok().flatten().unwrap_or_default();
            info!("✓ 使用第一个页面: {}", title);
            Ok((browser, page))
        }
        None => Err(BrowserError::LaunchFailed("浏览器中没有可用的页面".to_string()).into()),
    }
}
