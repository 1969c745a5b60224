// index-core/src/schema/version.rs
//! 版本化 schema - 规则集按版本号一次性选定并校验
//!
//! 不支持的版本号或与字段能力不匹配的规则在加载时立刻报错，
//! 绝不留到摄取中途。

use std::collections::HashSet;

use super::fields::*;
use super::rules::{FieldRule, SourceField};
use crate::error::{IndexError, Result};

/// 默认 schema 版本
pub const DEFAULT_SCHEMA_VERSION: u32 = 2;

/// 一个版本的有序规则集，启动时选定，之后只读
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    pub version: u32,
    rules: Vec<FieldRule>,
}

impl SchemaVersion {
    /// 按版本号加载规则集
    pub fn load(version: u32) -> Result<Self> {
        let rules = match version {
            // v1：最小规则集，作者 uid + 分词正文 + 时间排序键
            1 => vec![
                FieldRule::Term {
                    field: SourceField::Uid,
                    prefix: TERM_PREFIX_UID,
                },
                FieldRule::TokenizedText {
                    field: SourceField::Text,
                    prefix: TERM_PREFIX_TEXT,
                    column: COLUMN_TEXT,
                },
                FieldRule::SortableValue {
                    field: SourceField::Timestamp,
                    column: COLUMN_TIMESTAMP,
                },
            ],
            // v2：补充作者昵称词条与 uid 排序键
            2 => vec![
                FieldRule::Term {
                    field: SourceField::Uid,
                    prefix: TERM_PREFIX_UID,
                },
                FieldRule::Term {
                    field: SourceField::Name,
                    prefix: TERM_PREFIX_NAME,
                },
                FieldRule::TokenizedText {
                    field: SourceField::Text,
                    prefix: TERM_PREFIX_TEXT,
                    column: COLUMN_TEXT,
                },
                FieldRule::SortableValue {
                    field: SourceField::Timestamp,
                    column: COLUMN_TIMESTAMP,
                },
                FieldRule::SortableValue {
                    field: SourceField::Uid,
                    column: COLUMN_UID,
                },
            ],
            other => {
                return Err(IndexError::Config(format!(
                    "不支持的 schema 版本: {other}"
                )))
            }
        };

        let schema = Self { version, rules };
        schema.validate()?;
        Ok(schema)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// 本版本占用的 value 槽位（升序去重）
    pub fn columns(&self) -> Vec<u32> {
        let mut columns: Vec<u32> = self
            .rules
            .iter()
            .filter_map(|rule| match rule {
                FieldRule::SortableValue { column, .. } => Some(*column),
                FieldRule::TokenizedText { column, .. } => Some(*column),
                FieldRule::Term { .. } => None,
            })
            .collect();
        columns.sort_unstable();
        columns.dedup();
        columns
    }

    /// 加载期校验：规则必须与字段能力匹配，槽位不得冲突
    fn validate(&self) -> Result<()> {
        let probe = crate::models::SourceRecord {
            id: String::new(),
            uid: 0,
            name: String::new(),
            text: String::new(),
            timestamp: 0,
        };
        let mut used_columns = HashSet::new();

        for rule in &self.rules {
            let column = match rule {
                FieldRule::Term { .. } => None,
                FieldRule::SortableValue { field, column } => {
                    if field.as_number(&probe).is_none() {
                        return Err(IndexError::Config(format!(
                            "字段 {} 不是数值，不能作排序值",
                            field.name()
                        )));
                    }
                    Some(*column)
                }
                FieldRule::TokenizedText { field, column, .. } => {
                    if field.as_text(&probe).is_none() {
                        return Err(IndexError::Config(format!(
                            "字段 {} 不是文本，不能分词索引",
                            field.name()
                        )));
                    }
                    Some(*column)
                }
            };
            if let Some(column) = column {
                if !used_columns.insert(column) {
                    return Err(IndexError::Config(format!("value 槽位 {column} 冲突")));
                }
            }
        }
        Ok(())
    }
}
