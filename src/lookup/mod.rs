//! 标识符查找
//!
//! 查询串必须恰好命中数据集中的一行：命中零行或多行都是错误，
//! 需要人工修正数据集，不做"最佳匹配"。

mod dataset;

pub use dataset::Dataset;

use crate::error::{LookupError, Result};
use tracing::debug;

/// 数据集中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub identifier: String,
    /// `enrichr` 列
    pub link: String,
    /// `screenshot` 列，相对数据集文件所在目录
    pub screenshot: String,
}

impl LookupEntry {
    pub fn new(
        identifier: impl Into<String>,
        link: impl Into<String>,
        screenshot: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            link: link.into(),
            screenshot: screenshot.into(),
        }
    }

    /// 条目标识符（小写、去空白后）是否包含查询串
    pub fn matches(&self, query: &str) -> bool {
        self.identifier.to_lowercase().trim().contains(query)
    }
}

/// 在数据集中解析查询串，要求恰好一条命中
pub fn resolve<'a>(query: &str, entries: &'a [LookupEntry]) -> Result<&'a LookupEntry> {
    if query.is_empty() {
        return Err(LookupError::NotFound(query.to_string()).into());
    }

    let mut hits = entries.iter().filter(|e| e.matches(query));
    let first = hits
        .next()
        .ok_or_else(|| LookupError::NotFound(query.to_string()))?;
    let extra = hits.count();
    debug!(query, matches = extra + 1, "查找完成");
    if extra > 0 {
        return Err(LookupError::Ambiguous {
            identifier: query.to_string(),
            matches: extra + 1,
        }
        .into());
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;

    fn entries() -> Vec<LookupEntry> {
        vec![
            LookupEntry::new("gene_a_mutation", "http://x/a", "a.png"),
            LookupEntry::new("gene_b_mutation", "http://x/b", "b.png"),
        ]
    }

    #[test]
    fn test_unique_match() {
        let entries = entries();
        let entry = resolve("gene_a", &entries).unwrap();
        assert_eq!(entry.identifier, "gene_a_mutation");
    }

    #[test]
    fn test_ambiguous_match() {
        let entries = entries();
        match resolve("gene", &entries) {
            Err(BotError::Lookup(LookupError::Ambiguous {
                identifier,
                matches,
            })) => {
                assert_eq!(identifier, "gene");
                assert_eq!(matches, 2);
            }
            other => panic!("应该是 Ambiguous: {:?}", other),
        }
    }

    #[test]
    fn test_not_found() {
        let entries = entries();
        match resolve("gene_c", &entries) {
            Err(BotError::Lookup(LookupError::NotFound(id))) => assert_eq!(id, "gene_c"),
            other => panic!("应该是 NotFound: {:?}", other),
        }
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let entries = vec![LookupEntry::new("  TP53_Pathway_Analysis ", "l", "s")];
        assert!(resolve("tp53_pathway", &entries).is_ok());
    }

    #[test]
    fn test_empty_query_is_not_found() {
        let entries = vec![LookupEntry::new("only_row", "l", "s")];
        assert!(matches!(
            resolve("", &entries),
            Err(BotError::Lookup(LookupError::NotFound(_)))
        ));
    }

    #[test]
    fn test_error_message_names_identifier() {
        let entries = entries();
        let err = resolve("gene", &entries).unwrap_err();
        assert_eq!(err.to_string(), "Lookup Error: gene matched 2 results");
    }
}
