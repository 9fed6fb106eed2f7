use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, RenderError};

/// 启动无头浏览器并打开空白渲染页
pub async fn launch_headless_browser() -> AppResult<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");

    let config = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",            // 容器内没有沙盒权限
            "--disable-dev-shm-usage", // 防止共享内存不足
        ])
        .build()
        .map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            AppError::Render(RenderError::ConfigurationFailed {
                message: format!("配置无头浏览器失败: {}", e),
            })
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        AppError::Render(RenderError::ConfigurationFailed {
            message: format!("启动无头浏览器失败: {}", e),
        })
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::Render(RenderError::ConfigurationFailed {
            message: format!("创建页面失败: {}", e),
        })
    })?;

    info!("✅ 无头浏览器已就绪");
    Ok((browser, page))
}
