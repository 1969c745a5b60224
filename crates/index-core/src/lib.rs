// index-core/src/lib.rs
//! 时间线全文索引核心库
//!
//! 基于 Tantivy 的时间分片全文索引，支持：
//! - 时间窗口分片路由（单窗口增量与回填重建两种模式）
//! - 版本化 schema 的字段索引规则
//! - 幂等 upsert 与句柄的精确一次清理
//! - jieba 中文分词

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod search;
pub mod shard;
pub mod tokenizer;
pub mod writer;

// 重导出核心类型
pub use config::{IndexerConfig, TokenizerConfig};
pub use error::{IndexError, Result};
pub use feed::JsonLinesFeed;
pub use models::SourceRecord;
pub use pipeline::{IngestionPipeline, RunReport};
pub use schema::{IndexedDocument, SchemaVersion, SourceField, DEFAULT_SCHEMA_VERSION};
pub use search::{get_by_id, scan, RangeQuery, RangeScan};
pub use shard::{generate, resolve, RunMode, ShardWindow};
pub use tokenizer::{JiebaSegmenter, Segment};
pub use writer::ShardWriter;
