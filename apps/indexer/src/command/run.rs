use super::Command;
use crate::error::{Result, WrapErr};
use index_core::{IndexerConfig, IngestionPipeline, JiebaSegmenter, JsonLinesFeed, RunMode};
use std::path::PathBuf;

pub struct RunCommand {
    config: IndexerConfig,
    anchor: i64,
    input: PathBuf,
}

impl RunCommand {
    pub fn new(config: IndexerConfig, anchor: i64, input: PathBuf) -> Self {
        Self {
            config,
            anchor,
            input,
        }
    }
}

#[async_trait::async_trait]
impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        let segmenter = JiebaSegmenter::from_config(&self.config.tokenizer)?;
        let pipeline = IngestionPipeline::new(&self.config, &segmenter)?;
        let feed = JsonLinesFeed::open(&self.input)
            .wrap_err_with(|| format!("打开数据文件 {} 失败", self.input.display()))?;

        let report = pipeline.run(feed, RunMode::Production, self.anchor)?;
        for (label, docs) in &report.shards {
            println!("  {label}: {docs} 篇文档");
        }
        println!("完成，共处理 {} 条记录", report.records);
        Ok(())
    }
}
