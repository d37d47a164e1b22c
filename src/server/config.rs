use std::net::SocketAddr;

use url::Url;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_APP_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_EMAIL_DOMAIN: &str = "@connect.polyu.hk";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_IMPORT_PASSWORD: &str = "123456";
const DEFAULT_AI_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_AI_MODEL: &str = "deepseek-chat";
const DEFAULT_STORAGE_BUCKET: &str = "course-documents";

pub struct Config {
    pub database_url: String,
    pub app_addr: SocketAddr,
    pub static_dir: String,

    /// Suffix every registered email must end with, e.g. `@connect.polyu.hk`.
    pub email_domain: String,
    pub default_admin_password: String,
    /// Password given to accounts created by bulk imports when none is supplied.
    pub default_import_password: String,

    /// Chat completion API key. When absent every AI call degrades to its fallback.
    pub ai_api_key: Option<String>,
    pub ai_base_url: String,
    pub ai_model: String,

    pub storage_url: String,
    pub storage_key: String,
    pub storage_bucket: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let app_addr = optional_var("APP_ADDR")
            .unwrap_or_else(|| DEFAULT_APP_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: "APP_ADDR".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            app_addr,
            static_dir: optional_var("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            email_domain: optional_var("EMAIL_DOMAIN")
                .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string()),
            default_admin_password: optional_var("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            default_import_password: optional_var("DEFAULT_IMPORT_PASSWORD")
                .unwrap_or_else(|| DEFAULT_IMPORT_PASSWORD.to_string()),
            ai_api_key: optional_var("AI_API_KEY").or_else(|| optional_var("DEEPSEEK_API_KEY")),
            ai_base_url: checked_url(
                "AI_BASE_URL",
                optional_var("AI_BASE_URL").unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            )?,
            ai_model: optional_var("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            storage_url: checked_url("SUPABASE_URL", required_var("SUPABASE_URL")?)?,
            storage_key: required_var("SUPABASE_SERVICE_ROLE_KEY")?,
            storage_bucket: optional_var("STORAGE_BUCKET")
                .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
        })
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    optional_var(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Rejects values that are not absolute http(s) URLs.
fn checked_url(name: &str, value: String) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason,
    };

    let url = Url::parse(&value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// Reads a variable, treating an empty value as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_url_trims_trailing_slash() {
        let url = checked_url("SUPABASE_URL", "https://xyz.supabase.co/".to_string()).unwrap();

        assert_eq!(url, "https://xyz.supabase.co");
    }

    #[test]
    fn checked_url_rejects_relative_and_non_http() {
        assert!(matches!(
            checked_url("AI_BASE_URL", "api.deepseek.com".to_string()),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
        assert!(matches!(
            checked_url("AI_BASE_URL", "ftp://example.com".to_string()),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
    }
}
