// index-core/src/schema/fields.rs
//! 词条前缀与 value 槽位常量定义

/// 文档 id-term 前缀 - 幂等 upsert 的键
pub const DOCUMENT_ID_TERM_PREFIX: &str = "M";

/// 自定义字段词条前缀（下列前缀的公共首字母）
pub const DOCUMENT_CUSTOM_TERM_PREFIX: &str = "X";

/// 作者 uid 词条前缀
pub const TERM_PREFIX_UID: &str = "XUID";

/// 作者昵称词条前缀
pub const TERM_PREFIX_NAME: &str = "XNAME";

/// 正文词条前缀
pub const TERM_PREFIX_TEXT: &str = "XTEXT";

/// 正文原文所在 value 槽位（供检索时取回）
pub const COLUMN_TEXT: u32 = 0;

/// 时间戳排序键槽位
pub const COLUMN_TIMESTAMP: u32 = 1;

/// 作者 uid 排序键槽位
pub const COLUMN_UID: u32 = 2;
