// index-core/src/schema/document.rs
//! 索引文档 - 由一条记录按激活的规则集派生

use std::collections::{BTreeMap, BTreeSet};

use super::fields::DOCUMENT_ID_TERM_PREFIX;
use super::rules::{sortable_serialize, FieldRule};
use super::version::SchemaVersion;
use crate::error::{IndexError, Result};
use crate::models::SourceRecord;
use crate::tokenizer::Segment;

/// 待写入分片的文档
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    /// 幂等键：同一条记录反复派生总得到同一 id-term，
    /// 因此按 id 替换天然幂等
    pub id_term: String,
    /// 去重后的前缀词条
    pub terms: BTreeSet<String>,
    /// value 槽位 → 序列化值
    pub values: BTreeMap<u32, Vec<u8>>,
    /// 原始记录的不透明负载
    pub payload: Vec<u8>,
}

impl SchemaVersion {
    /// 应用本版本的全部规则，派生索引文档
    pub fn build_document(
        &self,
        record: &SourceRecord,
        segmenter: &dyn Segment,
    ) -> Result<IndexedDocument> {
        let payload = bincode::serialize(record)
            .map_err(|e| IndexError::MalformedRecord(e.to_string()))?;
        let mut doc = IndexedDocument {
            id_term: format!("{DOCUMENT_ID_TERM_PREFIX}{}", record.id),
            terms: BTreeSet::new(),
            values: BTreeMap::new(),
            payload,
        };
        for rule in self.rules() {
            apply_rule(rule, record, segmenter, &mut doc)?;
        }
        Ok(doc)
    }
}

fn apply_rule(
    rule: &FieldRule,
    record: &SourceRecord,
    segmenter: &dyn Segment,
    doc: &mut IndexedDocument,
) -> Result<()> {
    match rule {
        FieldRule::Term { field, prefix } => {
            doc.terms.insert(format!("{prefix}{}", field.as_term(record)));
        }
        FieldRule::SortableValue { field, column } => {
            // 规则与字段的匹配已在 schema 加载时校验过
            let value = field.as_number(record).ok_or_else(|| {
                IndexError::MalformedRecord(format!("字段 {} 缺少数值", field.name()))
            })?;
            doc.values.insert(*column, sortable_serialize(value).to_vec());
        }
        FieldRule::TokenizedText {
            field,
            prefix,
            column,
        } => {
            let text = field.as_text(record).ok_or_else(|| {
                IndexError::MalformedRecord(format!("字段 {} 缺少文本", field.name()))
            })?;
            for token in segmenter.segment(text) {
                // 停用词和标点以单字条目进入词典，靠词长检查天然剔除
                if token.chars().count() <= 1 {
                    continue;
                }
                doc.terms.insert(format!("{prefix}{token}"));
            }
            // 原文另存入槽位，供检索时取回
            doc.values.insert(*column, text.as_bytes().to_vec());
        }
    }
    Ok(())
}
