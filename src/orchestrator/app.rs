//! 应用生命周期 - 编排层
//!
//! 1. 初始化输出文件、打印启动信息
//! 2. 按配置选择页面来源：快照文件 / 无头浏览器 / 已打开的浏览器
//! 3. 提取一次，或按间隔轮询，只在输出变化时打印
//! 4. 输出统计

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{save_snapshot_file, JsExecutor};
use crate::orchestrator::session::{CopySession, CopyStatus, SnapshotSource};
use crate::utils::logging::{append_output, init_log_file, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    // 浏览器必须活得和会话一样久
    _browser: Option<Browser>,
    session: CopySession,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let (browser, source) = if let Some(path) = &config.snapshot_path {
            (None, SnapshotSource::File(PathBuf::from(path)))
        } else if config.headless {
            let url = config.target_url.as_deref().unwrap_or("about:blank");
            let (browser, page) =
                browser::launch_headless_browser(url, config.chrome_executable.as_deref()).await?;
            (Some(browser), SnapshotSource::Live(JsExecutor::new(page)))
        } else {
            let (browser, page) = browser::connect_to_browser_and_page(
                config.browser_debug_port,
                config.target_url.as_deref(),
                config.target_title.as_deref(),
            )
            .await?;
            (Some(browser), SnapshotSource::Live(JsExecutor::new(page)))
        };

        Ok(Self {
            config,
            _browser: browser,
            session: CopySession::new(source),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<()> {
        let mut changes = 0;

        match self.config.poll_interval_ms {
            None => {
                self.copy_once(&mut changes).await?;
            }
            Some(ms) => {
                info!("🔁 开始轮询，Ctrl+C 结束");
                let mut ticker = tokio::time::interval(Duration::from_millis(ms));
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            // 轮询中单次失败不终止，页面可能正在跳转
                            if let Err(e) = self.copy_once(&mut changes).await {
                                warn!("⚠️ 本次提取失败: {:#}", e);
                            }
                        }
                        _ = tokio::signal::ctrl_c() => {
                            info!("🛑 收到中断信号，停止轮询");
                            break;
                        }
                    }
                }
            }
        }

        self.save_snapshot().await;
        print_final_stats(self.session.runs(), changes, &self.config.output_log_file);
        Ok(())
    }

    async fn copy_once(&mut self, changes: &mut usize) -> Result<()> {
        let (text, status) = self.session.copy().await?;
        if status == CopyStatus::Changed {
            *changes += 1;
            println!("{}\n", text);
            append_output(&self.config.output_log_file, self.session.runs(), &text)?;
        }
        Ok(())
    }

    async fn save_snapshot(&self) {
        let (Some(path), Some(snapshot)) = (
            self.config.save_snapshot_path.as_deref(),
            self.session.last_snapshot(),
        ) else {
            return;
        };
        if let Err(e) = save_snapshot_file(path, snapshot).await {
            error!("❌ 保存快照失败: {}", e);
        }
    }
}
