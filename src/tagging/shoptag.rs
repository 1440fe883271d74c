use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Request};
use std::path::Path;

use super::{TagResponse, TaggingService, parse_response};
use crate::config::ApiConfig;

pub struct ShopTagService {
    api_token: String,
    options: ApiConfig,
    client: Client,
}

impl ShopTagService {
    pub fn new(api_token: String, options: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_token,
            options,
            client,
        })
    }

    /// Assemble the multipart upload without sending it.
    fn build_request(&self, file_name: &str, bytes: Vec<u8>, mime_type: &str) -> Result<Request> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .context("Invalid MIME type for upload")?;

        let form = Form::new()
            .text("language", self.options.language.clone())
            .text("maxKeywords", self.options.max_keywords.to_string())
            .part("file", part);

        self.client
            .post(&self.options.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .multipart(form)
            .build()
            .context("Failed to build ShopTag request")
    }
}

#[async_trait::async_trait]
impl TaggingService for ShopTagService {
    fn name(&self) -> &str {
        "ShopTag"
    }

    async fn tag(&self, path: &Path, mime_type: &str) -> Result<TagResponse> {
        // The file is opened, read and closed here, before the upload starts.
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let request = self.build_request(&file_name, bytes, mime_type)?;

        let resp = self
            .client
            .execute(request)
            .await
            .context("ShopTag request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("Failed to read ShopTag response")?;

        match parse_response(&text) {
            Ok(response) => Ok(response),
            Err(_) if !status.is_success() => {
                anyhow::bail!("ShopTag API error ({}): {}", status, text)
            }
            Err(e) => Err(e),
        }
    }
}
