// index-core/src/schema/mod.rs
//! Schema 模块 - 版本化的字段索引规则
//!
//! 统一管理词条前缀与 value 槽位，避免魔法字符串分散在代码各处。

pub mod document;
pub mod fields;
pub mod rules;
pub mod version;

pub use document::IndexedDocument;
pub use fields::*;
pub use rules::{sortable_serialize, FieldRule, SourceField};
pub use version::{SchemaVersion, DEFAULT_SCHEMA_VERSION};
