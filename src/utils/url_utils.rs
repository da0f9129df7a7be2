// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

const TOKEN_USER: &str = "oauth2";
const REDACTED: &str = "***";

/// 将访问令牌嵌入 git 仓库 URL
///
/// 生成 `https://oauth2:<token>@host/owner/repo` 形式的克隆地址
pub fn embed_access_token(repo_url: &str, token: &str) -> Result<String, ParseError> {
    let mut url = Url::parse(repo_url)?;
    // set_username/set_password only fail for cannot-be-a-base URLs
    if url.set_username(TOKEN_USER).is_err() || url.set_password(Some(token)).is_err() {
        return Err(ParseError::SetHostOnCannotBeABaseUrl);
    }
    Ok(url.to_string())
}

/// 去掉 URL 中的凭据，用于日志输出
pub fn redact_credentials(repo_url: &str) -> String {
    match Url::parse(repo_url) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some(REDACTED));
            }
            url.to_string()
        }
        Err(_) => repo_url.to_string(),
    }
}

/// 把文本中出现的密钥替换为占位符
pub fn scrub_secret(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, REDACTED),
        _ => text.to_string(),
    }
}
