use crate::config::site::SiteProfile;
use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound on concurrently fetched detail pages
pub const MAX_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_start_url(&config.start_url)?;

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(
            "progress_interval must be >= 1".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the start URL: absolute, http or https
pub fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' must use http or https",
            start_url
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout={}s connect={}s",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates site markup configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.next_page_text.trim().is_empty() {
        return Err(ConfigError::Validation(
            "next_page_text cannot be empty".to_string(),
        ));
    }

    if config.fields.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site.fields]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for field in &config.fields {
        if field.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "field name cannot be empty".to_string(),
            ));
        }
        if field.name == "url" {
            return Err(ConfigError::Validation(
                "field name 'url' is reserved for the detail page URL".to_string(),
            ));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate field name '{}'",
                field.name
            )));
        }
    }

    // Compiling checks every selector
    SiteProfile::compile(config)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.relative_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "relative_path cannot be empty".to_string(),
        ));
    }

    if config.relative_path.is_absolute() {
        return Err(ConfigError::Validation(format!(
            "relative_path must be relative, got '{}'",
            config.relative_path.display()
        )));
    }

    if let Some(marker) = &config.root_marker {
        if marker.is_empty() || marker.contains('/') || marker.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "root_marker must be a single directory name, got '{}'",
                marker
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{FieldConfig, FieldKind};
    use std::path::PathBuf;

    fn field(name: &str) -> FieldConfig {
        FieldConfig {
            name: name.to_string(),
            selector: ".x".to_string(),
            kind: FieldKind::Text,
            required: false,
        }
    }

    fn site() -> SiteConfig {
        SiteConfig {
            listing_link_selector: "a.detail".to_string(),
            pagination_selector: ".pagination a".to_string(),
            next_page_text: "Next".to_string(),
            fields: vec![field("title")],
        }
    }

    #[test]
    fn test_validate_start_url() {
        assert!(validate_start_url("https://example.com/list?page=1").is_ok());
        assert!(validate_start_url("http://127.0.0.1:8080/").is_ok());

        assert!(validate_start_url("").is_err());
        assert!(validate_start_url("/relative/path").is_err());
        assert!(validate_start_url("ftp://example.com/").is_err());
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let mut site = site();
        site.fields.push(field("title"));
        assert!(matches!(
            validate_site_config(&site),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_reserved_url_field_rejected() {
        let mut site = site();
        site.fields.push(field("url"));
        assert!(validate_site_config(&site).is_err());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut site = site();
        site.fields.clear();
        assert!(validate_site_config(&site).is_err());
    }

    #[test]
    fn test_blank_next_page_text_rejected() {
        let mut site = site();
        site.next_page_text = "  ".to_string();
        assert!(validate_site_config(&site).is_err());
    }

    #[test]
    fn test_output_paths() {
        let mut output = OutputConfig::default();
        assert!(validate_output_config(&output).is_ok());

        output.relative_path = PathBuf::from("/etc/static_data.json");
        assert!(validate_output_config(&output).is_err());

        output = OutputConfig::default();
        output.root_marker = Some("a/b".to_string());
        assert!(validate_output_config(&output).is_err());
    }

    #[test]
    fn test_http_timeouts() {
        let mut http = HttpConfig::default();
        assert!(validate_http_config(&http).is_ok());
        http.timeout_secs = 0;
        assert!(validate_http_config(&http).is_err());
    }
}
