use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScoutError};
use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

/// The value shipped in sample configs. A key equal to this is never sent upstream.
pub const PLACEHOLDER_API_KEY: &str = "your-openai-api-key-here";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ScoutError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Reject keys that are missing, the sample placeholder, or an unresolved `${VAR}`.
/// The key itself never appears in the error.
pub fn validate_api_key(field_name: &str, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ScoutError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let unresolved = key.starts_with("${") && key.ends_with('}');
    if key == PLACEHOLDER_API_KEY || unresolved {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "<placeholder>".to_string(),
            reason: "API key is not configured; set OPENAI_API_KEY".to_string(),
        });
    }

    Ok(())
}

/// Checks shared by every configuration source.
pub fn validate_provider_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_socket_addr("server.bind", config.bind_addr())?;

    let timeout = config.request_timeout().as_secs();
    validate_range("server.request_timeout_secs", timeout, 1, 600)?;

    if let Some(path) = config.inventory_path() {
        validate_path("inventory.path", path)?;
        validate_file_extension("inventory.path", path, &["json"])?;
    }

    let provider = config.provider();
    validate_url("provider.base_url", &provider.base_url)?;
    validate_non_empty_string("provider.model", &provider.model)?;
    validate_api_key("provider.api_key", &provider.api_key)?;
    validate_range("provider.temperature", provider.temperature, 0.0, 2.0)?;
    validate_range("provider.max_output_tokens", provider.max_output_tokens, 1, 4096)?;

    Ok(())
}
