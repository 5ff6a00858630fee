use super::LookupEntry;
use crate::error::{LookupError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const IDENTIFIER_COLUMN: &str = "identifier";
const LINK_COLUMN: &str = "enrichr";
const SCREENSHOT_COLUMN: &str = "screenshot";

/// 每次运行重新加载的只读查找表
///
/// TSV 文件首行为表头，按列名定位 `identifier` / `enrichr` / `screenshot`，
/// 其余列忽略。
#[derive(Debug, Clone)]
pub struct Dataset {
    entries: Vec<LookupEntry>,
    base_dir: PathBuf,
    enrichr_url: String,
}

impl Dataset {
    pub fn new(
        entries: Vec<LookupEntry>,
        base_dir: impl Into<PathBuf>,
        enrichr_url: impl Into<String>,
    ) -> Self {
        Self {
            entries,
            base_dir: base_dir.into(),
            enrichr_url: enrichr_url.into(),
        }
    }

    pub fn load(path: impl AsRef<Path>, enrichr_url: &str) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| LookupError::DatasetUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let entries = parse_tsv(&raw)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        info!(path = %path.display(), rows = entries.len(), "📋 数据集已加载");
        Ok(Self::new(entries, base_dir, enrichr_url))
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    /// 截图的实际路径（相对数据集文件所在目录）
    pub fn screenshot_path(&self, entry: &LookupEntry) -> PathBuf {
        self.base_dir.join(&entry.screenshot)
    }

    /// 绝对链接原样返回，相对链接拼接 Enrichr 根地址
    pub fn link(&self, entry: &LookupEntry) -> String {
        let link = entry.link.trim();
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!(
            "{}/{}",
            self.enrichr_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}

fn parse_tsv(raw: &str) -> Result<Vec<LookupEntry>> {
    let mut lines = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(LookupError::MissingColumn(IDENTIFIER_COLUMN.to_string()).into());
    };
    let columns: Vec<&str> = header.split('\t').map(|c| unquote(c.trim())).collect();
    let position = |name: &str| -> Result<usize> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| LookupError::MissingColumn(name.to_string()).into())
    };
    let identifier = position(IDENTIFIER_COLUMN)?;
    let link = position(LINK_COLUMN)?;
    let screenshot = position(SCREENSHOT_COLUMN)?;

    let mut entries = Vec::new();
    for (index, line) in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        let field = |i: usize, name: &str| -> Result<String> {
            fields
                .get(i)
                .map(|f| unquote(f).to_string())
                .ok_or_else(|| {
                    LookupError::MalformedRow {
                        line: index + 1,
                        message: format!("missing '{}' field", name),
                    }
                    .into()
                })
        };
        entries.push(LookupEntry {
            identifier: field(identifier, IDENTIFIER_COLUMN)?,
            link: field(link, LINK_COLUMN)?,
            screenshot: field(screenshot, SCREENSHOT_COLUMN)?,
        });
    }
    Ok(entries)
}

fn unquote(field: &str) -> &str {
    let field = field.trim_end_matches('\r');
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}
