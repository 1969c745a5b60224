// index-core/src/error.rs
//! 错误类型定义
//!
//! 只有只读路径的"分片不存在"允许就地恢复（计为 0），
//! 其余错误在强制的清理步骤之后向调用方传播。

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    /// 配置错误：未知字段规则、不支持的 schema 版本、空窗口集等，
    /// 全部在任何写入发生之前检出
    #[error("配置错误: {0}")]
    Config(String),

    /// 打开分片失败（只读路径视为文档数 0，写入路径致命）
    #[error("索引不可用: {path}")]
    IndexUnavailable { path: PathBuf },

    /// 数据源在迭代中途失败（与正常耗尽是两种同样常见的结局）
    #[error("数据源传输失败: {0}")]
    Transport(String),

    /// 记录缺字段或无法解析 - 按设计直接失败，不静默丢数据
    #[error("记录格式错误: {0}")]
    MalformedRecord(String),

    #[error(transparent)]
    Engine(#[from] tantivy::TantivyError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
