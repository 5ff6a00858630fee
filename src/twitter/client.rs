use crate::config::{Credentials, Endpoints};
use crate::error::{FeedError, PublishError, Result};
use crate::twitter::oauth::{OAuthSigner, encode_form};
use crate::twitter::types::{BearerTokenResponse, MediaUploadResponse};
use crate::twitter::{FeedClient, MediaRef, Publisher, RawPost, TimelineQuery};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// 基于应用级 bearer token 的时间线客户端
///
/// token 在首次请求时获取，进程内缓存。
pub struct TwitterFeedClient {
    client: Arc<Client>,
    credentials: Credentials,
    api_base: String,
    bearer: OnceCell<String>,
}

impl TwitterFeedClient {
    pub fn new(client: Arc<Client>, credentials: Credentials, endpoints: &Endpoints) -> Self {
        Self {
            client,
            credentials,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
            bearer: OnceCell::new(),
        }
    }

    async fn bearer_token(&self) -> Result<&str> {
        let token = self
            .bearer
            .get_or_try_init(|| self.obtain_bearer_token())
            .await?;
        Ok(token.as_str())
    }

    async fn obtain_bearer_token(&self) -> Result<String> {
        let url = format!("{}/oauth2/token", self.api_base);
        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.consumer_key,
                Some(&self.credentials.consumer_secret),
            )
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=UTF-8",
            )
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(FeedError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FeedError::AuthFailed(format!("status {}: {}", status, text)).into());
        }

        let token = response
            .json::<BearerTokenResponse>()
            .await
            .map_err(|e| FeedError::AuthFailed(e.to_string()))?;
        if !token.token_type.eq_ignore_ascii_case("bearer") {
            return Err(FeedError::AuthFailed(format!(
                "unexpected token type '{}'",
                token.token_type
            ))
            .into());
        }
        debug!("Bearer token 获取成功");
        Ok(token.access_token)
    }
}

#[async_trait]
impl FeedClient for TwitterFeedClient {
    async fn fetch_timeline(&self, query: &TimelineQuery) -> Result<Vec<RawPost>> {
        let token = self.bearer_token().await?;
        let url = format!("{}/1.1/statuses/user_timeline.json", self.api_base);

        let mut params: Vec<(&str, String)> = vec![
            ("screen_name", query.handle.clone()),
            ("count", query.count.to_string()),
            ("exclude_replies", query.exclude_replies.to_string()),
            ("include_rts", query.include_reposts.to_string()),
        ];
        if let Some(since_id) = &query.since_id {
            params.push(("since_id", since_id.clone()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(FeedError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FeedError::ApiError { status, message }.into());
        }

        let posts = response
            .json::<Vec<RawPost>>()
            .await
            .map_err(|e| FeedError::InvalidResponse(e.to_string()))?;
        debug!(handle = %query.handle, count = posts.len(), "时间线拉取完成");
        Ok(posts)
    }
}

/// 基于 OAuth 1.0a 用户鉴权的发布客户端
pub struct TwitterPublisher {
    client: Arc<Client>,
    credentials: Credentials,
    api_base: String,
    upload_base: String,
}

impl TwitterPublisher {
    pub fn new(client: Arc<Client>, credentials: Credentials, endpoints: &Endpoints) -> Self {
        Self {
            client,
            credentials,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
            upload_base: endpoints.upload_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn upload_media(&self, path: &Path) -> Result<MediaRef> {
        let shown = path.display().to_string();
        let upload_failed = |message: String| PublishError::UploadFailed {
            path: shown.clone(),
            message,
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| upload_failed(e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        let url = format!("{}/1.1/media/upload.json", self.upload_base);
        let auth = OAuthSigner::new(&self.credentials).authorization_header("POST", &url, &[])?;
        let form = reqwest::multipart::Form::new()
            .part("media", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(upload_failed(format!("status {}: {}", status, text)).into());
        }

        let uploaded = response
            .json::<MediaUploadResponse>()
            .await
            .map_err(|e| upload_failed(e.to_string()))?;
        debug!(path = %shown, media_id = %uploaded.media_id_string, "媒体上传完成");
        Ok(MediaRef(uploaded.media_id_string))
    }

    async fn submit_reply(
        &self,
        status: &str,
        in_reply_to_id: &str,
        media: &[MediaRef],
    ) -> Result<()> {
        let submit_failed = |message: String| PublishError::SubmitFailed {
            in_reply_to: in_reply_to_id.to_string(),
            message,
        };

        let url = format!("{}/1.1/statuses/update.json", self.api_base);
        let media_ids = media
            .iter()
            .map(MediaRef::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let mut params: Vec<(&str, &str)> =
            vec![("status", status), ("in_reply_to_status_id", in_reply_to_id)];
        if !media_ids.is_empty() {
            params.push(("media_ids", media_ids.as_str()));
        }

        let auth =
            OAuthSigner::new(&self.credentials).authorization_header("POST", &url, &params)?;
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(encode_form(&params))
            .send()
            .await
            .map_err(|e| submit_failed(e.to_string()))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(submit_failed(format!("status {}: {}", code, text)).into());
        }
        Ok(())
    }
}
