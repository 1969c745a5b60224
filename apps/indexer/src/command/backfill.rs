use super::Command;
use crate::error::{Result, WrapErr};
use index_core::{IndexerConfig, IngestionPipeline, JiebaSegmenter, JsonLinesFeed, RunMode};
use std::path::PathBuf;

pub struct BackfillCommand {
    config: IndexerConfig,
    input: PathBuf,
}

impl BackfillCommand {
    pub fn new(config: IndexerConfig, input: PathBuf) -> Self {
        Self { config, input }
    }
}

#[async_trait::async_trait]
impl Command for BackfillCommand {
    async fn execute(&self) -> Result<()> {
        println!(
            "回填重建：纪元 {} 起，步长 {} 秒",
            self.config.backfill_epoch, self.config.step_secs
        );
        let segmenter = JiebaSegmenter::from_config(&self.config.tokenizer)?;
        let pipeline = IngestionPipeline::new(&self.config, &segmenter)?;
        let feed = JsonLinesFeed::open(&self.input)
            .wrap_err_with(|| format!("打开数据文件 {} 失败", self.input.display()))?;

        // 回填模式不用锚点，窗口从配置纪元推导
        let report = pipeline.run(feed, RunMode::Backfill, self.config.backfill_epoch)?;
        for (label, docs) in &report.shards {
            println!("  {label}: {docs} 篇文档");
        }
        println!("完成，共处理 {} 条记录", report.records);
        Ok(())
    }
}
