//! 运行配置加载
//!
//! 进程启动时从环境变量读取一次（`.env` 由 `main` 预先加载），之后不可变，
//! 由 `main` 构造并注入到各个组件：
//! ```text
//! CONSUMER_KEY=...
//! CONSUMER_SECRET=...
//! ACCESS_TOKEN=...
//! ACCESS_TOKEN_SECRET=...
//! TWEET_STORAGE_PATH=~/enrichrbot/tweets/
//! LOOKUP_RESULTS=/data/results/lookup.tsv
//! ENRICHR_URL=https://amp.pharm.mssm.edu/Enrichr     # 可选
//! TARGET_HANDLE=SbotGwa                              # 可选
//! TWITTER_API_BASE=https://api.twitter.com           # 可选
//! TWITTER_UPLOAD_BASE=https://upload.twitter.com     # 可选
//! ```

use crate::error::{ConfigError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENRICHR_URL: &str = "https://amp.pharm.mssm.edu/Enrichr";
pub const DEFAULT_TARGET_HANDLE: &str = "SbotGwa";
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_UPLOAD_BASE: &str = "https://upload.twitter.com";

/// Twitter 应用与用户凭据
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("access_token", &"***")
            .field("access_token_secret", &"***")
            .finish()
    }
}

/// Twitter API 根地址，测试时可指向本地 mock 服务
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_base: String,
    pub upload_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// 每条帖子一个 JSON 文件的目录
    pub storage_dir: PathBuf,
    /// TSV 查找表路径，截图路径相对于它所在目录
    pub lookup_results: PathBuf,
    pub enrichr_url: String,
    /// 被监听并回复的账号
    pub target_handle: String,
    pub endpoints: Endpoints,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构造配置（测试无需修改进程环境）
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingField(key.to_string()).into())
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let credentials = Credentials {
            consumer_key: required("CONSUMER_KEY")?,
            consumer_secret: required("CONSUMER_SECRET")?,
            access_token: required("ACCESS_TOKEN")?,
            access_token_secret: required("ACCESS_TOKEN_SECRET")?,
        };

        let enrichr_url = optional("ENRICHR_URL", DEFAULT_ENRICHR_URL);
        if !is_http_url(&enrichr_url) {
            return Err(ConfigError::InvalidValue {
                field: "ENRICHR_URL".to_string(),
                message: format!("expected an http(s) URL, got '{}'", enrichr_url),
            }
            .into());
        }

        let endpoints = Endpoints {
            api_base: optional("TWITTER_API_BASE", DEFAULT_API_BASE),
            upload_base: optional("TWITTER_UPLOAD_BASE", DEFAULT_UPLOAD_BASE),
        };

        Ok(Self {
            credentials,
            storage_dir: expand_tilde(Path::new(&required("TWEET_STORAGE_PATH")?)),
            lookup_results: expand_tilde(Path::new(&required("LOOKUP_RESULTS")?)),
            enrichr_url,
            target_handle: optional("TARGET_HANDLE", DEFAULT_TARGET_HANDLE),
            endpoints,
        })
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if s.starts_with("~/")
        && let Some(home) = std::env::var("HOME")
            .ok()
            .or_else(|| std::env::var("USERPROFILE").ok())
    {
        return PathBuf::from(home).join(&s[2..]);
    }
    path.to_path_buf()
}
