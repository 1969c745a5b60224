// index-core/src/schema/rules.rs
//! 字段规则 - 每条规则把记录的一个字段映射成词条或排序值
//!
//! 规则是带标签的变体，在 schema 加载时一次性校验，
//! 摄取过程中不做任何字符串分发。

use serde_json::Value;

use crate::models::SourceRecord;

/// 记录中可被索引的字段（类型化，取代按名字的动态分发）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField {
    Id,
    Uid,
    Name,
    Text,
    Timestamp,
}

impl SourceField {
    pub fn name(&self) -> &'static str {
        match self {
            SourceField::Id => "id",
            SourceField::Uid => "uid",
            SourceField::Name => "name",
            SourceField::Text => "text",
            SourceField::Timestamp => "timestamp",
        }
    }

    /// 字段的词条文本（整数按十进制渲染）
    pub fn as_term(&self, record: &SourceRecord) -> String {
        match self {
            SourceField::Id => record.id.clone(),
            SourceField::Uid => record.uid.to_string(),
            SourceField::Name => record.name.clone(),
            SourceField::Text => record.text.clone(),
            SourceField::Timestamp => record.timestamp.to_string(),
        }
    }

    /// 字段的数值，仅数值字段可用
    pub fn as_number(&self, record: &SourceRecord) -> Option<i64> {
        match self {
            SourceField::Uid => Some(record.uid),
            SourceField::Timestamp => Some(record.timestamp),
            _ => None,
        }
    }

    /// 字段的原始文本，仅文本字段可用
    pub fn as_text<'a>(&self, record: &'a SourceRecord) -> Option<&'a str> {
        match self {
            SourceField::Text => Some(&record.text),
            SourceField::Name => Some(&record.name),
            _ => None,
        }
    }

    /// 字段的 JSON 表示，供查询面做字段子集投影
    pub fn to_json(&self, record: &SourceRecord) -> Value {
        match self {
            SourceField::Id => Value::from(record.id.clone()),
            SourceField::Uid => Value::from(record.uid),
            SourceField::Name => Value::from(record.name.clone()),
            SourceField::Text => Value::from(record.text.clone()),
            SourceField::Timestamp => Value::from(record.timestamp),
        }
    }
}

/// 单条索引规则
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// 整个字段作为一个前缀词条（标识符类字段）
    Term {
        field: SourceField,
        prefix: &'static str,
    },
    /// 保序编码后写入 value 槽位（排序/范围比较）
    SortableValue { field: SourceField, column: u32 },
    /// 分词后逐词条写入，原文另存入槽位供取回
    TokenizedText {
        field: SourceField,
        prefix: &'static str,
        column: u32,
    },
}

/// 保序编码：对任意整数 a < b，编码结果按字节序比较也满足 a < b
pub fn sortable_serialize(value: i64) -> [u8; 8] {
    ((value as u64) ^ (1 << 63)).to_be_bytes()
}
