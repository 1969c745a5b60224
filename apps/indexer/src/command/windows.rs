use super::Command;
use crate::error::Result;
use chrono::{DateTime, Utc};
use index_core::{IndexerConfig, RunMode};

pub struct WindowsCommand {
    config: IndexerConfig,
    backfill: bool,
    anchor: Option<i64>,
}

impl WindowsCommand {
    pub fn new(config: IndexerConfig, backfill: bool, anchor: Option<i64>) -> Self {
        Self {
            config,
            backfill,
            anchor,
        }
    }
}

#[async_trait::async_trait]
impl Command for WindowsCommand {
    async fn execute(&self) -> Result<()> {
        let mode = if self.backfill {
            RunMode::Backfill
        } else {
            RunMode::Production
        };
        let anchor = self.anchor.unwrap_or_else(|| Utc::now().timestamp());

        let windows = index_core::generate(mode, &self.config, anchor)?;
        for window in &windows {
            println!(
                "[{} ~ {}) {}",
                format_ts(window.start),
                format_ts(window.end),
                window.label
            );
        }
        println!("共 {} 个窗口", windows.len());
        Ok(())
    }
}

fn format_ts(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}
