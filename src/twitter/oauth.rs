//! OAuth 1.0a 请求签名（HMAC-SHA1）
//!
//! 发布接口需要用户上下文鉴权：签名基串由 HTTP 方法、基础 URL 和
//! 排序后的参数（oauth 参数 + 查询/表单参数）拼接而成，
//! multipart 请求体中的字段不参与签名。

use crate::config::Credentials;
use crate::error::PublishError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use urlencoding::encode;

type HmacSha1 = Hmac<Sha1>;

/// 把参数编码为 `application/x-www-form-urlencoded` 请求体
pub fn encode_form(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// 单次请求的签名器，nonce 与时间戳可注入以便测试
pub struct OAuthSigner<'a> {
    credentials: &'a Credentials,
    nonce: String,
    timestamp: u64,
}

impl<'a> OAuthSigner<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            credentials,
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>, timestamp: u64) -> Self {
        self.nonce = nonce.into();
        self.timestamp = timestamp;
        self
    }

    fn oauth_params(&self) -> Vec<(String, String)> {
        vec![
            (
                "oauth_consumer_key".to_string(),
                self.credentials.consumer_key.clone(),
            ),
            ("oauth_nonce".to_string(), self.nonce.clone()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), self.timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.credentials.access_token.clone(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]
    }

    /// 计算签名（base64 编码的 HMAC-SHA1）
    pub fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let mut all: Vec<(String, String)> = self
            .oauth_params()
            .into_iter()
            .chain(params.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .map(|(k, v)| (encode(&k).into_owned(), encode(&v).into_owned()))
            .collect();
        all.sort();
        let param_string = all
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url),
            encode(&param_string)
        );
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| PublishError::SigningFailed(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// 生成 `Authorization` 请求头的值
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let signature = self.signature(method, url, params)?;
        let mut fields = self.oauth_params();
        fields.push(("oauth_signature".to_string(), signature));
        fields.sort();
        let joined = fields
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {joined}"))
    }
}
