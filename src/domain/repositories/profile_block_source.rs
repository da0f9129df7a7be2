// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileBlockError {
    #[error("Profile request failed: {0}")]
    Request(String),
    #[error("Profile service returned status {status}: {message}")]
    Status { status: u16, message: String },
}

impl From<reqwest::Error> for ProfileBlockError {
    fn from(err: reqwest::Error) -> Self {
        ProfileBlockError::Request(err.to_string())
    }
}

/// dbt CLI profile 来源
///
/// 根据块名取回块中的 profile 对象，写入 profiles.yml
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileBlockSource: Send + Sync {
    async fn fetch_profile(&self, block_name: &str) -> Result<Value, ProfileBlockError>;
}
