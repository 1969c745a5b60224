// index-core/src/config.rs
//! 配置模块
//!
//! 配置只在启动时加载一次，之后作为普通参数显式传递，
//! 不设全局可变状态。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::schema::version::DEFAULT_SCHEMA_VERSION;

/// 索引器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// 分片数据库的基路径
    pub db_path: PathBuf,
    /// 集合名，参与分片目录命名
    pub collection: String,
    /// 激活的 schema 版本号
    pub schema_version: u32,
    /// 分片窗口步长（秒）
    pub step_secs: i64,
    /// 回填模式的起始纪元（Unix 秒）
    pub backfill_epoch: i64,
    /// 每处理多少条记录汇报一次进度
    pub progress_interval: u64,
    /// 单个分片写入器的内存预算（字节）
    pub writer_memory: usize,
    pub tokenizer: TokenizerConfig,
}

/// 分词器配置（词典只在进程启动时加载一次，之后只读）
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// 基础词典
    pub dict_path: Option<PathBuf>,
    /// 繁体变体词典
    pub dict_variant_path: Option<PathBuf>,
    /// 自定义词典
    pub custom_dict_path: Option<PathBuf>,
    /// 停用词词典（单字条目，靠词长检查天然剔除）
    pub stopword_dict_path: Option<PathBuf>,
    /// 表情词词典
    pub emotion_dict_path: Option<PathBuf>,
    /// 词典文件的文本编码
    pub encoding: String,
    /// 忽略纯标点词元
    pub ignore_punctuation: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/timeline"),
            collection: "master_timeline_weibo".to_string(),
            schema_version: DEFAULT_SCHEMA_VERSION,
            // 默认步长 50 天
            step_secs: 50 * 24 * 3600,
            // 2010-01-01 00:00:00 UTC
            backfill_epoch: 1_262_304_000,
            progress_interval: 10_000,
            writer_memory: 50_000_000,
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            dict_path: None,
            dict_variant_path: None,
            custom_dict_path: None,
            stopword_dict_path: None,
            emotion_dict_path: None,
            encoding: "utf-8".to_string(),
            ignore_punctuation: true,
        }
    }
}

impl IndexerConfig {
    /// 从 TOML 文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: IndexerConfig =
            toml::from_str(&content).map_err(|e| IndexError::Config(e.to_string()))?;
        Ok(config)
    }

    /// 尝试加载配置，失败则使用默认值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }
}
