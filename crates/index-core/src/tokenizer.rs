// index-core/src/tokenizer.rs
//! 分词适配层 - 封装 jieba 切词
//!
//! 词典在进程启动时一次性加载，之后只读，没有按调用的配置。

use std::fs;
use std::io::Cursor;
use std::path::Path;

use jieba_rs::Jieba;

use crate::config::TokenizerConfig;
use crate::error::{IndexError, Result};

/// 分词契约 - schema 侧消费的唯一接口
pub trait Segment {
    /// 切分文本，按出现顺序返回词元
    fn segment(&self, text: &str) -> Vec<String>;
}

/// 基于 jieba 的分词器
pub struct JiebaSegmenter {
    jieba: Jieba,
    ignore_punctuation: bool,
}

impl JiebaSegmenter {
    /// 按配置加载全部词典
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let mut jieba = match &config.dict_path {
            Some(path) => {
                let mut reader = Cursor::new(read_dict(path, &config.encoding)?);
                Jieba::with_dict(&mut reader).map_err(|e| {
                    IndexError::Config(format!("基础词典 {} 加载失败: {e}", path.display()))
                })?
            }
            None => Jieba::new(),
        };

        // 附加词典按固定顺序叠加：繁体变体、自定义、停用词、表情词
        let extra = [
            &config.dict_variant_path,
            &config.custom_dict_path,
            &config.stopword_dict_path,
            &config.emotion_dict_path,
        ];
        for path in extra.into_iter().flatten() {
            let mut reader = Cursor::new(read_dict(path, &config.encoding)?);
            jieba.load_dict(&mut reader).map_err(|e| {
                IndexError::Config(format!("词典 {} 加载失败: {e}", path.display()))
            })?;
        }

        Ok(Self {
            jieba,
            ignore_punctuation: config.ignore_punctuation,
        })
    }
}

impl Segment for JiebaSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, false)
            .into_iter()
            .filter(|t| !self.ignore_punctuation || t.chars().any(|c| c.is_alphanumeric()))
            .map(str::to_string)
            .collect()
    }
}

/// 读取词典文件并按配置的编码解码
fn read_dict(path: &Path, encoding: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let enc = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .ok_or_else(|| IndexError::Config(format!("未知词典编码: {encoding}")))?;
    let (text, _, _) = enc.decode(&bytes);
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dict_segments_chinese() {
        let seg = JiebaSegmenter::from_config(&TokenizerConfig::default()).unwrap();
        let tokens = seg.segment("我爱北京天安门");
        assert!(!tokens.is_empty());
        assert!(tokens.iter().any(|t| t == "天安门"));
    }

    #[test]
    fn punctuation_tokens_are_filtered() {
        let seg = JiebaSegmenter::from_config(&TokenizerConfig::default()).unwrap();
        let tokens = seg.segment("你好，世界！");
        assert!(tokens.iter().all(|t| t.chars().any(|c| c.is_alphanumeric())));
    }

    #[test]
    fn missing_dict_file_fails_at_startup() {
        let config = TokenizerConfig {
            custom_dict_path: Some("/nonexistent.dict".into()),
            encoding: "utf-8".into(),
            ..Default::default()
        };
        // 缺失词典文件在启动时立刻失败
        assert!(JiebaSegmenter::from_config(&config).is_err());
    }
}
