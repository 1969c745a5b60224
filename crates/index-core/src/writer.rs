// index-core/src/writer.rs
//! 分片写入管理
//!
//! 每个标签至多一个在开的可写句柄，首次写入时懒打开并在整轮运行中复用；
//! 关闭对每个句柄恰好一次，成功与失败路径都必须执行。

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use crate::engine::{self, OpenMode, ShardHandle};
use crate::error::Result;
use crate::schema::document::IndexedDocument;
use crate::schema::version::SchemaVersion;
use crate::shard::RunMode;

pub struct ShardWriter {
    mode: RunMode,
    schema: SchemaVersion,
    writer_memory: usize,
    open: HashMap<String, ShardHandle>,
}

impl ShardWriter {
    pub fn new(mode: RunMode, schema: SchemaVersion, writer_memory: usize) -> Self {
        Self {
            mode,
            schema,
            writer_memory,
            open: HashMap::new(),
        }
    }

    fn open_mode(&self) -> OpenMode {
        match self.mode {
            // 重跑单窗口摄取不得破坏已有数据
            RunMode::Production => OpenMode::CreateOrOpen,
            // 回填按设计从零重建分片
            RunMode::Backfill => OpenMode::CreateOrOverwrite,
        }
    }

    /// 幂等 upsert：懒打开标签对应的句柄，替换同 id-term 的旧文档
    pub fn upsert(&mut self, label: &str, doc: &IndexedDocument) -> Result<()> {
        let mode = self.open_mode();
        let handle = match self.open.entry(label.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!("打开分片 {label}");
                let handle =
                    engine::open_shard(Path::new(label), mode, &self.schema, self.writer_memory)?;
                entry.insert(handle)
            }
        };
        handle.replace_document(doc)
    }

    /// 关闭所有在开句柄，各恰好一次；空集调用安全
    ///
    /// 个别句柄关闭失败不阻止其余句柄关闭，首个错误在收尾后返回。
    pub fn close_all(&mut self) -> Result<()> {
        let mut first_err = None;
        for (label, handle) in self.open.drain() {
            match handle.close() {
                Ok(()) => tracing::debug!("分片 {label} 已关闭"),
                Err(e) => {
                    tracing::error!("关闭分片 {label} 失败: {e}");
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// 分片文档数；从未建立或无法打开的分片计为 0，绝不报错
    pub fn doc_count(label: &str) -> u64 {
        engine::doc_count(Path::new(label)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceRecord;
    use crate::tokenizer::Segment;
    use tempfile::TempDir;

    struct WhitespaceSegmenter;

    impl Segment for WhitespaceSegmenter {
        fn segment(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(str::to_string).collect()
        }
    }

    fn record(id: &str, text: &str) -> SourceRecord {
        SourceRecord {
            id: id.to_string(),
            uid: 7,
            name: "a".to_string(),
            text: text.to_string(),
            timestamp: 100,
        }
    }

    #[test]
    fn doc_count_of_missing_shard_is_zero() {
        let dir = TempDir::new().unwrap();
        let label = dir.path().join("_timeline_0").to_string_lossy().into_owned();
        assert_eq!(ShardWriter::doc_count(&label), 0);
    }

    #[test]
    fn double_upsert_keeps_one_document() {
        let dir = TempDir::new().unwrap();
        let label = dir.path().join("_timeline_0").to_string_lossy().into_owned();
        let schema = SchemaVersion::load(2).unwrap();
        let seg = WhitespaceSegmenter;

        let mut writer = ShardWriter::new(RunMode::Production, schema.clone(), 50_000_000);
        let first = schema.build_document(&record("1", "hello world"), &seg).unwrap();
        let second = schema.build_document(&record("1", "hello again"), &seg).unwrap();
        writer.upsert(&label, &first).unwrap();
        writer.upsert(&label, &second).unwrap();
        writer.close_all().unwrap();

        assert_eq!(ShardWriter::doc_count(&label), 1);
    }

    #[test]
    fn production_reopen_preserves_existing_documents() {
        let dir = TempDir::new().unwrap();
        let label = dir.path().join("_timeline_0").to_string_lossy().into_owned();
        let schema = SchemaVersion::load(2).unwrap();
        let seg = WhitespaceSegmenter;

        let mut writer = ShardWriter::new(RunMode::Production, schema.clone(), 50_000_000);
        let doc = schema.build_document(&record("1", "hello"), &seg).unwrap();
        writer.upsert(&label, &doc).unwrap();
        writer.close_all().unwrap();

        let mut writer = ShardWriter::new(RunMode::Production, schema.clone(), 50_000_000);
        let doc = schema.build_document(&record("2", "world"), &seg).unwrap();
        writer.upsert(&label, &doc).unwrap();
        writer.close_all().unwrap();

        assert_eq!(ShardWriter::doc_count(&label), 2);
    }

    #[test]
    fn backfill_reopen_rebuilds_the_shard() {
        let dir = TempDir::new().unwrap();
        let label = dir.path().join("_timeline_0").to_string_lossy().into_owned();
        let schema = SchemaVersion::load(2).unwrap();
        let seg = WhitespaceSegmenter;

        let mut writer = ShardWriter::new(RunMode::Backfill, schema.clone(), 50_000_000);
        let doc = schema.build_document(&record("1", "hello"), &seg).unwrap();
        writer.upsert(&label, &doc).unwrap();
        writer.close_all().unwrap();

        let mut writer = ShardWriter::new(RunMode::Backfill, schema.clone(), 50_000_000);
        let doc = schema.build_document(&record("2", "world"), &seg).unwrap();
        writer.upsert(&label, &doc).unwrap();
        writer.close_all().unwrap();

        assert_eq!(ShardWriter::doc_count(&label), 1);
    }

    #[test]
    fn close_all_on_empty_writer_is_safe() {
        let schema = SchemaVersion::load(1).unwrap();
        let mut writer = ShardWriter::new(RunMode::Production, schema, 50_000_000);
        writer.close_all().unwrap();
        writer.close_all().unwrap();
    }
}
