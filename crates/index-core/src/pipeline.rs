// index-core/src/pipeline.rs
//! 摄取管线 - Idle → Generating → Ingesting → Closing → {Done, Failed}
//!
//! 不论 Ingesting 如何终止，Closing 都先于返回执行；
//! 已写入的文档不回滚，重跑凭 upsert 的幂等性安全。

use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};
use crate::models::SourceRecord;
use crate::schema::version::SchemaVersion;
use crate::shard::{self, RunMode, ShardWindow};
use crate::tokenizer::Segment;
use crate::writer::ShardWriter;

/// 一次运行结束后的诊断汇总
#[derive(Debug)]
pub struct RunReport {
    /// 处理的记录条数
    pub records: u64,
    /// 每个窗口标签的最终文档数
    pub shards: Vec<(String, u64)>,
}

pub struct IngestionPipeline<'a> {
    config: &'a IndexerConfig,
    schema: SchemaVersion,
    segmenter: &'a dyn Segment,
}

impl<'a> IngestionPipeline<'a> {
    /// 构造管线；未知 schema 版本与非法进度间隔在任何写入前失败
    pub fn new(config: &'a IndexerConfig, segmenter: &'a dyn Segment) -> Result<Self> {
        if config.progress_interval == 0 {
            return Err(IndexError::Config("进度汇报间隔不能为 0".to_string()));
        }
        let schema = SchemaVersion::load(config.schema_version)?;
        Ok(Self {
            config,
            schema,
            segmenter,
        })
    }

    /// 运行一遍完整摄取
    ///
    /// 逐条消费 feed：解析归属分片、按规则集派生文档、幂等 upsert。
    /// 单线程同步执行，尊重引擎的单写者约束。
    pub fn run<F>(&self, feed: F, mode: RunMode, anchor: i64) -> Result<RunReport>
    where
        F: IntoIterator<Item = Result<SourceRecord>>,
    {
        // Generating
        let windows = shard::generate(mode, self.config, anchor)?;
        if windows.is_empty() {
            return Err(IndexError::Config("分片窗口集为空".to_string()));
        }
        tracing::info!("生成 {} 个分片窗口，模式 {mode:?}", windows.len());

        // Ingesting
        let mut writer = ShardWriter::new(mode, self.schema.clone(), self.config.writer_memory);
        let outcome = self.ingest(feed, &windows, &mut writer);

        // Closing：成败都先关句柄，之后才向调用方汇报
        let closed = writer.close_all();
        let records = outcome?;
        closed?;

        let shards = windows
            .iter()
            .map(|w| (w.label.clone(), ShardWriter::doc_count(&w.label)))
            .collect();
        Ok(RunReport { records, shards })
    }

    fn ingest<F>(
        &self,
        feed: F,
        windows: &[ShardWindow],
        writer: &mut ShardWriter,
    ) -> Result<u64>
    where
        F: IntoIterator<Item = Result<SourceRecord>>,
    {
        let mut count = 0u64;
        for record in feed {
            let record = record?;
            let label = shard::resolve(windows, record.timestamp)?;
            let doc = self.schema.build_document(&record, self.segmenter)?;
            writer.upsert(label, &doc)?;
            count += 1;
            if count % self.config.progress_interval == 0 {
                tracing::info!("已处理 {count} 条记录");
            }
        }
        tracing::info!("数据源耗尽，共 {count} 条记录");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Segment;
    use tempfile::TempDir;

    struct WhitespaceSegmenter;

    impl Segment for WhitespaceSegmenter {
        fn segment(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(str::to_string).collect()
        }
    }

    fn test_config(dir: &TempDir) -> IndexerConfig {
        IndexerConfig {
            db_path: dir.path().to_path_buf(),
            collection: "timeline".to_string(),
            schema_version: 2,
            step_secs: 1000,
            backfill_epoch: 0,
            progress_interval: 1000,
            ..Default::default()
        }
    }

    fn record(id: &str, ts: i64) -> SourceRecord {
        SourceRecord {
            id: id.to_string(),
            uid: 7,
            name: "a".to_string(),
            text: "hello world".to_string(),
            timestamp: ts,
        }
    }

    #[test]
    fn double_ingest_of_same_record_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let seg = WhitespaceSegmenter;
        let pipeline = IngestionPipeline::new(&config, &seg).unwrap();

        let feed = vec![Ok(record("1", 100)), Ok(record("1", 100))];
        let report = pipeline.run(feed, RunMode::Production, 0).unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(report.shards.len(), 1);
        assert_eq!(report.shards[0].1, 1);
    }

    #[test]
    fn records_land_in_their_windows() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        // 回填三个窗口
        config.backfill_epoch = chrono::Utc::now().timestamp() - 2500;
        let epoch = config.backfill_epoch;
        let seg = WhitespaceSegmenter;
        let pipeline = IngestionPipeline::new(&config, &seg).unwrap();

        let feed = vec![
            Ok(record("1", epoch + 10)),
            Ok(record("2", epoch + 1010)),
            Ok(record("3", epoch + 1020)),
        ];
        let report = pipeline.run(feed, RunMode::Backfill, 0).unwrap();

        assert_eq!(report.records, 3);
        assert_eq!(report.shards[0].1, 1);
        assert_eq!(report.shards[1].1, 2);
    }

    #[test]
    fn failure_mid_feed_still_closes_and_keeps_prior_work() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let seg = WhitespaceSegmenter;
        let pipeline = IngestionPipeline::new(&config, &seg).unwrap();

        let feed = vec![
            Ok(record("1", 100)),
            Ok(record("2", 110)),
            Ok(record("3", 120)),
            Err(IndexError::Transport("连接中断".to_string())),
            Ok(record("4", 130)),
        ];
        let err = pipeline.run(feed, RunMode::Production, 0).unwrap_err();
        assert!(matches!(err, IndexError::Transport(_)));

        // Closing 已执行：句柄被提交并关闭，之前的写入可见
        let windows = shard::generate(RunMode::Production, &config, 0).unwrap();
        assert_eq!(ShardWriter::doc_count(&windows[0].label), 3);
    }

    #[test]
    fn rerun_after_failure_does_not_duplicate() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let seg = WhitespaceSegmenter;
        let pipeline = IngestionPipeline::new(&config, &seg).unwrap();

        let feed = vec![
            Ok(record("1", 100)),
            Err(IndexError::Transport("连接中断".to_string())),
        ];
        pipeline.run(feed, RunMode::Production, 0).unwrap_err();

        // 重跑完整 feed：已写入的记录被替换而非重复
        let feed = vec![Ok(record("1", 100)), Ok(record("2", 110))];
        let report = pipeline.run(feed, RunMode::Production, 0).unwrap();
        assert_eq!(report.shards[0].1, 2);
    }

    #[test]
    fn record_before_first_window_fails_the_run() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let seg = WhitespaceSegmenter;
        let pipeline = IngestionPipeline::new(&config, &seg).unwrap();

        let feed = vec![Ok(record("1", 50))];
        let err = pipeline.run(feed, RunMode::Production, 100).unwrap_err();
        assert!(matches!(err, IndexError::Config(_)));
    }

    #[test]
    fn zero_progress_interval_fails_before_any_write() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.progress_interval = 0;
        let seg = WhitespaceSegmenter;
        assert!(matches!(
            IngestionPipeline::new(&config, &seg),
            Err(IndexError::Config(_))
        ));
    }

    #[test]
    fn unknown_schema_version_fails_before_any_write() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.schema_version = 99;
        let seg = WhitespaceSegmenter;
        assert!(matches!(
            IngestionPipeline::new(&config, &seg),
            Err(IndexError::Config(_))
        ));
    }
}
