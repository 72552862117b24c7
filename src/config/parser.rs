use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use home_scraper::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Start URL: {}", config.crawler.start_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be told apart when the site markup
/// settings were edited in between.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID: &str = r#"
[crawler]
start-url = "https://example.com/list"
concurrency = 4

[site]
listing-link-selector = "a.detail"
pagination-selector = ".pagination a"
next-page-text = "次へ"

[[site.fields]]
name = "price"
selector = ".price"
kind = "number"
required = true

[[site.fields]]
name = "title"
selector = "h1"

[output]
root-marker = "local_home_scraper"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.start_url, "https://example.com/list");
        assert_eq!(config.crawler.concurrency, 4);
        assert_eq!(config.site.next_page_text, "次へ");
        assert_eq!(config.site.fields.len(), 2);
        assert_eq!(config.site.fields[0].kind, FieldKind::Number);
        assert!(config.site.fields[0].required);
        assert_eq!(config.output.root_marker.as_deref(), Some("local_home_scraper"));
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse_config(VALID).unwrap();

        assert_eq!(config.crawler.progress_interval, 10);
        assert_eq!(config.crawler.max_pages, None);
        assert_eq!(config.crawler.page_delay_ms, 0);
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("home-scraper/"));
        assert_eq!(config.site.fields[1].kind, FieldKind::Text);
        assert!(!config.site.fields[1].required);
        assert_eq!(
            config.output.relative_path,
            std::path::PathBuf::from("frontend/public/static_data.json")
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_field_kind_rejected() {
        let content = VALID.replace("kind = \"number\"", "kind = \"currency\"");
        assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = VALID.replace("concurrency = 4", "concurrency = 0");
        let result = parse_config(&content);
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let content = VALID.replace("selector = \".price\"", "selector = \"div[\"");
        assert!(matches!(
            parse_config(&content),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
