// index-core/src/engine.rs
//! 存储引擎边界 - tantivy 分片的打开、写入、计数与关闭
//!
//! 引擎侧 schema 由激活的 SchemaVersion 推导：
//! - `id`：原样索引的 id-term，upsert 的删除键
//! - `term`：原样索引的前缀词条，一词条一个值
//! - `value{N}`：每个 value 槽位一个存储的 bytes 字段
//! - `payload`：存储的原始记录负载

use std::fs;
use std::path::Path;

use tantivy::directory::MmapDirectory;
use tantivy::schema::{Field, Schema, STORED, STRING};
use tantivy::{Index, IndexWriter, TantivyDocument, Term};

use crate::error::{IndexError, Result};
use crate::schema::document::IndexedDocument;
use crate::schema::version::SchemaVersion;

pub const FIELD_ID: &str = "id";
pub const FIELD_TERM: &str = "term";
pub const FIELD_PAYLOAD: &str = "payload";

/// value 槽位对应的引擎字段名
pub fn value_field_name(column: u32) -> String {
    format!("value{column}")
}

/// 打开模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// 存在则续写，不存在则新建
    CreateOrOpen,
    /// 清空重建 - 回填运行按设计从零重建分片
    CreateOrOverwrite,
}

/// 引擎侧字段句柄，打开时解析一次
struct EngineFields {
    id: Field,
    term: Field,
    payload: Field,
    values: Vec<(u32, Field)>,
}

/// 一个分片的独占可写句柄
pub struct ShardHandle {
    writer: IndexWriter,
    fields: EngineFields,
}

/// 由激活的 schema 版本推导 tantivy schema
fn engine_schema(schema_version: &SchemaVersion) -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field(FIELD_ID, STRING | STORED);
    builder.add_text_field(FIELD_TERM, STRING);
    for column in schema_version.columns() {
        builder.add_bytes_field(&value_field_name(column), STORED);
    }
    builder.add_bytes_field(FIELD_PAYLOAD, STORED);
    builder.build()
}

/// 打开分片的可写句柄
pub fn open_shard(
    path: &Path,
    mode: OpenMode,
    schema_version: &SchemaVersion,
    writer_memory: usize,
) -> Result<ShardHandle> {
    if mode == OpenMode::CreateOrOverwrite && path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;

    let schema = engine_schema(schema_version);
    let dir = MmapDirectory::open(path).map_err(|_| IndexError::IndexUnavailable {
        path: path.to_path_buf(),
    })?;
    let index = Index::open_or_create(dir, schema.clone())?;
    let writer: IndexWriter = index.writer(writer_memory)?;

    let values = schema_version
        .columns()
        .into_iter()
        .map(|column| Ok((column, schema.get_field(&value_field_name(column))?)))
        .collect::<Result<Vec<_>>>()?;
    let fields = EngineFields {
        id: schema.get_field(FIELD_ID)?,
        term: schema.get_field(FIELD_TERM)?,
        payload: schema.get_field(FIELD_PAYLOAD)?,
        values,
    };

    Ok(ShardHandle { writer, fields })
}

impl ShardHandle {
    /// 按 id-term 替换：同键文档至多一份，重复写入不产生重复
    pub fn replace_document(&mut self, doc: &IndexedDocument) -> Result<()> {
        self.writer
            .delete_term(Term::from_field_text(self.fields.id, &doc.id_term));

        let mut tdoc = TantivyDocument::default();
        tdoc.add_text(self.fields.id, &doc.id_term);
        for term in &doc.terms {
            tdoc.add_text(self.fields.term, term);
        }
        for (column, field) in &self.fields.values {
            if let Some(value) = doc.values.get(column) {
                tdoc.add_bytes(*field, value.as_slice());
            }
        }
        tdoc.add_bytes(self.fields.payload, doc.payload.as_slice());
        self.writer.add_document(tdoc)?;
        Ok(())
    }

    /// 提交并关闭；句柄被消费，关闭恰好一次
    pub fn close(mut self) -> Result<()> {
        self.writer.commit()?;
        Ok(())
    }
}

/// 只读打开一个分片
pub fn open_readonly(path: &Path) -> Result<Index> {
    let dir = MmapDirectory::open(path).map_err(|_| IndexError::IndexUnavailable {
        path: path.to_path_buf(),
    })?;
    Index::open(dir).map_err(|_| IndexError::IndexUnavailable {
        path: path.to_path_buf(),
    })
}

/// 只读统计分片的存活文档数
///
/// 分片不存在或无法打开返回 `IndexUnavailable`，
/// 由调用方决定是否按 0 处理。
pub fn doc_count(path: &Path) -> Result<u64> {
    if !path.is_dir() {
        return Err(IndexError::IndexUnavailable {
            path: path.to_path_buf(),
        });
    }
    let index = open_readonly(path)?;
    let reader = index.reader()?;
    Ok(reader.searcher().num_docs())
}
