// index-core/src/feed.rs
//! 数据源 - 拉模式的惰性记录序列
//!
//! 正常耗尽与传输失败是两种同样常见的结局，调用方分别处理。

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::models::SourceRecord;

/// 离线回填用的定长数据文件：每行一个 JSON 记录数组
pub struct JsonLinesFeed {
    lines: Lines<BufReader<File>>,
    pending: std::vec::IntoIter<SourceRecord>,
}

impl JsonLinesFeed {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            pending: Vec::new().into_iter(),
        })
    }
}

impl Iterator for JsonLinesFeed {
    type Item = Result<SourceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(Ok(record));
            }
            match self.lines.next()? {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Vec<SourceRecord>>(&line) {
                        Ok(batch) => self.pending = batch.into_iter(),
                        // 按设计不静默丢数据：坏行直接终止本次运行
                        Err(e) => return Some(Err(IndexError::MalformedRecord(e.to_string()))),
                    }
                }
                Err(e) => return Some(Err(IndexError::Transport(e.to_string()))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_feed(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("feed.jsonl");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_one_json_array_per_line() {
        let dir = TempDir::new().unwrap();
        let path = write_feed(
            &dir,
            concat!(
                r#"[{"id":"1","uid":7,"name":"a","text":"x","timestamp":100}]"#,
                "\n",
                "\n",
                r#"[{"id":"2","uid":8,"name":"b","text":"y","timestamp":200},"#,
                r#"{"id":"3","uid":9,"name":"c","text":"z","timestamp":300}]"#,
                "\n",
            ),
        );

        let records: Vec<SourceRecord> = JsonLinesFeed::open(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[2].timestamp, 300);
    }

    #[test]
    fn malformed_line_surfaces_as_error() {
        let dir = TempDir::new().unwrap();
        let path = write_feed(&dir, "not json\n");

        let mut feed = JsonLinesFeed::open(&path).unwrap();
        assert!(matches!(
            feed.next(),
            Some(Err(IndexError::MalformedRecord(_)))
        ));
    }

    #[test]
    fn missing_required_field_surfaces_as_error() {
        let dir = TempDir::new().unwrap();
        let path = write_feed(&dir, r#"[{"id":"1","uid":7}]"#);

        let mut feed = JsonLinesFeed::open(&path).unwrap();
        assert!(matches!(
            feed.next(),
            Some(Err(IndexError::MalformedRecord(_)))
        ));
    }
}
