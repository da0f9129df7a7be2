// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::PrefectSettings;
use crate::domain::repositories::profile_block_source::{ProfileBlockError, ProfileBlockSource};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// prefect-proxy 客户端
///
/// 读取 dbt CLI profile 块并返回其中的 `profile` 对象
pub struct PrefectProxyClient {
    client: reqwest::Client,
    base_url: Url,
}

impl PrefectProxyClient {
    pub fn new(settings: &PrefectSettings) -> Result<Self, ProfileBlockError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        let base_url = Url::parse(&settings.proxy_url).map_err(|e| {
            ProfileBlockError::Request(format!("invalid proxy url {}: {}", settings.proxy_url, e))
        })?;
        Ok(Self { client, base_url })
    }

    /// `{proxy_url}/proxy/blocks/dbtcli/profile/{block_name}`，块名按路径段编码
    fn profile_url(&self, block_name: &str) -> Result<Url, ProfileBlockError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProfileBlockError::Request(format!("{} cannot be a base url", self.base_url))
            })?
            .pop_if_empty()
            .extend(["proxy", "blocks", "dbtcli", "profile", block_name]);
        Ok(url)
    }
}

#[async_trait]
impl ProfileBlockSource for PrefectProxyClient {
    async fn fetch_profile(&self, block_name: &str) -> Result<Value, ProfileBlockError> {
        let url = self.profile_url(block_name)?;
        debug!("Fetching dbt cli profile block {}", block_name);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProfileBlockError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let mut body: Value = response.json().await?;
        match body.get_mut("profile") {
            Some(profile) => Ok(profile.take()),
            None => Err(ProfileBlockError::Request(format!(
                "block {} has no profile",
                block_name
            ))),
        }
    }
}
