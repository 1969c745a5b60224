// index-core/src/shard.rs
//! 分片路由 - 时间窗口生成与归属解析
//!
//! 窗口集在一次运行开始时生成一次，之后只读。

use chrono::Utc;

use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};

/// 运行模式 - 作为普通参数显式传递，不读任何全局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// 单窗口增量运行：已有分片续写，不破坏旧数据
    Production,
    /// 回填运行：从纪元起按步长重建全部分片
    Backfill,
}

/// 一个时间窗口分片：`[start, end)` 内的记录归它所有
///
/// 不变式：窗口按 `start` 升序、互不重叠且在配置区间上连续。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardWindow {
    pub start: i64,
    pub end: i64,
    /// 分片目录，由基路径、集合名与起点时间戳确定性推导
    pub label: String,
}

/// 生成有序的窗口集
///
/// - `Production`：以锚点为起点恰好一个窗口 `[anchor, anchor + step)`
/// - `Backfill`：从配置纪元起按固定步长推进，直到步长边界到达当前时间
pub fn generate(mode: RunMode, config: &IndexerConfig, anchor: i64) -> Result<Vec<ShardWindow>> {
    if config.step_secs <= 0 {
        return Err(IndexError::Config(format!(
            "非法分片步长: {}",
            config.step_secs
        )));
    }

    let windows = match mode {
        RunMode::Production => vec![window_at(config, anchor)],
        RunMode::Backfill => {
            let now = Utc::now().timestamp();
            let mut windows = Vec::new();
            let mut start = config.backfill_epoch;
            while start < now {
                windows.push(window_at(config, start));
                start += config.step_secs;
            }
            windows
        }
    };
    Ok(windows)
}

fn window_at(config: &IndexerConfig, start: i64) -> ShardWindow {
    let label = config
        .db_path
        .join(format!("_{}_{}", config.collection, start))
        .to_string_lossy()
        .into_owned();
    ShardWindow {
        start,
        end: start + config.step_secs,
        label,
    }
}

/// 把时间戳解析到拥有它的分片标签
///
/// 越过末窗口起点的时间戳并入末窗口（尾部记录绝不丢弃）；
/// 早于首窗口起点的时间戳说明调用方在生成区间之外要求索引，
/// 属配置错误。
pub fn resolve<'a>(windows: &'a [ShardWindow], timestamp: i64) -> Result<&'a str> {
    let (first, last) = match (windows.first(), windows.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(IndexError::Config("分片窗口集为空".to_string())),
    };

    if timestamp < first.start {
        return Err(IndexError::Config(format!(
            "时间戳 {timestamp} 早于首个分片窗口 {}",
            first.start
        )));
    }
    for window in windows {
        if timestamp < window.end {
            return Ok(&window.label);
        }
    }
    Ok(&last.label)
}
