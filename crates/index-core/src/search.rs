// index-core/src/search.rs
//! 只读查询面 - 按时间范围扫描分片，返回字段子集
//!
//! 复用写入侧的 id-term、词条前缀与 value 槽位约定；
//! 排序、相关性打分和查询语言不在此层。

use std::path::Path;

use serde_json::{Map, Value};
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::{AllQuery, TermQuery};
use tantivy::schema::{IndexRecordOption, Value as _};
use tantivy::{TantivyDocument, Term};

use crate::engine;
use crate::error::{IndexError, Result};
use crate::models::SourceRecord;
use crate::schema::fields::DOCUMENT_ID_TERM_PREFIX;
use crate::schema::rules::SourceField;
use crate::shard::ShardWindow;

/// 范围查询：时间区间过滤加一个可选的单字段排除谓词
#[derive(Debug, Clone)]
pub struct RangeQuery {
    /// 起始时间（含）
    pub start: i64,
    /// 结束时间（不含）
    pub end: i64,
    /// 排除谓词：命中该 uid 的记录被剔除
    pub exclude_uid: Option<i64>,
    /// 返回的字段子集，不得为空
    pub fields: Vec<SourceField>,
}

/// 惰性、有限的扫描序列；重新发起 `scan` 即从头重来
pub struct RangeScan {
    query: RangeQuery,
    windows: std::vec::IntoIter<ShardWindow>,
    current: std::vec::IntoIter<Map<String, Value>>,
    failed: bool,
}

/// 对窗口集发起一次范围扫描
///
/// 只触碰与查询区间有交集的窗口；末窗口吸收越界时间戳，
/// 因此它的右边界视为无穷。
pub fn scan(windows: &[ShardWindow], query: RangeQuery) -> Result<RangeScan> {
    if query.fields.is_empty() {
        return Err(IndexError::Config("字段子集不能为空".to_string()));
    }

    let last_index = windows.len().checked_sub(1);
    let overlapping: Vec<ShardWindow> = windows
        .iter()
        .enumerate()
        .filter(|(i, w)| {
            let end = if Some(*i) == last_index { i64::MAX } else { w.end };
            end > query.start && w.start < query.end
        })
        .map(|(_, w)| w.clone())
        .collect();

    Ok(RangeScan {
        query,
        windows: overlapping.into_iter(),
        current: Vec::new().into_iter(),
        failed: false,
    })
}

impl Iterator for RangeScan {
    type Item = Result<Map<String, Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(item) = self.current.next() {
                return Some(Ok(item));
            }
            let window = self.windows.next()?;
            match load_matches(&window, &self.query) {
                Ok(items) => self.current = items.into_iter(),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn load_matches(window: &ShardWindow, query: &RangeQuery) -> Result<Vec<Map<String, Value>>> {
    let index = match engine::open_readonly(Path::new(&window.label)) {
        Ok(index) => index,
        // 缺失分片按空处理，与 doc_count 的约定一致
        Err(IndexError::IndexUnavailable { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let payload_field = index.schema().get_field(engine::FIELD_PAYLOAD)?;
    let reader = index.reader()?;
    let searcher = reader.searcher();

    let addresses = searcher.search(&AllQuery, &DocSetCollector)?;
    let mut matches = Vec::new();
    for address in addresses {
        let doc: TantivyDocument = searcher.doc(address)?;
        let Some(bytes) = doc.get_first(payload_field).and_then(|v| v.as_bytes()) else {
            continue;
        };
        let record: SourceRecord = bincode::deserialize(bytes)
            .map_err(|e| IndexError::MalformedRecord(e.to_string()))?;
        if record.timestamp < query.start || record.timestamp >= query.end {
            continue;
        }
        if query.exclude_uid == Some(record.uid) {
            continue;
        }
        matches.push(project(&record, &query.fields));
    }
    Ok(matches)
}

/// 按 id 取回一条记录的字段子集
pub fn get_by_id(
    windows: &[ShardWindow],
    id: &str,
    fields: &[SourceField],
) -> Result<Option<Map<String, Value>>> {
    if fields.is_empty() {
        return Err(IndexError::Config("字段子集不能为空".to_string()));
    }
    let id_term = format!("{DOCUMENT_ID_TERM_PREFIX}{id}");

    for window in windows {
        let index = match engine::open_readonly(Path::new(&window.label)) {
            Ok(index) => index,
            Err(IndexError::IndexUnavailable { .. }) => continue,
            Err(e) => return Err(e),
        };
        let schema = index.schema();
        let id_field = schema.get_field(engine::FIELD_ID)?;
        let payload_field = schema.get_field(engine::FIELD_PAYLOAD)?;
        let reader = index.reader()?;
        let searcher = reader.searcher();

        let query = TermQuery::new(
            Term::from_field_text(id_field, &id_term),
            IndexRecordOption::Basic,
        );
        let top = searcher.search(&query, &TopDocs::with_limit(1))?;
        if let Some((_, address)) = top.into_iter().next() {
            let doc: TantivyDocument = searcher.doc(address)?;
            let Some(bytes) = doc.get_first(payload_field).and_then(|v| v.as_bytes()) else {
                continue;
            };
            let record: SourceRecord = bincode::deserialize(bytes)
                .map_err(|e| IndexError::MalformedRecord(e.to_string()))?;
            return Ok(Some(project(&record, fields)));
        }
    }
    Ok(None)
}

fn project(record: &SourceRecord, fields: &[SourceField]) -> Map<String, Value> {
    let mut item = Map::new();
    for field in fields {
        item.insert(field.name().to_string(), field.to_json(record));
    }
    item
}
