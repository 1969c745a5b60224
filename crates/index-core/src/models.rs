// index-core/src/models.rs
//! 数据模型定义

use serde::{Deserialize, Serialize};

/// 原始输入记录 - 上游 feed 产出的一条时间线数据
///
/// 由外部数据源产生，摄取过程中只读，每轮摄取消费一次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// 主键
    pub id: String,
    /// 作者 uid
    pub uid: i64,
    /// 作者昵称
    pub name: String,
    /// 正文（UTF-8）
    pub text: String,
    /// Unix 时间戳（秒）
    pub timestamp: i64,
}
