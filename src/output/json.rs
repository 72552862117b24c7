//! JSON file sink
//!
//! Writes the listing records as an indented UTF-8 JSON array for the
//! front-end. The target path is either given explicitly or resolved from a
//! base directory, an optional project-root marker, and a relative path.

use crate::config::OutputConfig;
use crate::crawler::CrawlResult;
use crate::output::traits::ResultSink;
use crate::PersistError;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `output.root`
pub const OUTPUT_ROOT_ENV: &str = "HOME_SCRAPER_ROOT";

/// Where a [`JsonFileSink`] writes
#[derive(Debug, Clone)]
enum Target {
    /// Written verbatim
    Path(PathBuf),
    /// Resolved at persist time
    Project {
        base: PathBuf,
        marker: Option<String>,
        relative: PathBuf,
    },
}

/// Writes crawl results to a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    target: Target,
}

impl JsonFileSink {
    /// Writes to exactly `path`
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::Path(path.into()),
        }
    }

    /// Resolves the target from `[output]`, honouring `HOME_SCRAPER_ROOT`
    pub fn from_config(config: &OutputConfig) -> Self {
        let base = std::env::var_os(OUTPUT_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| config.root.clone());
        Self::in_project(base, config.root_marker.clone(), config.relative_path.clone())
    }

    /// Writes to `path` when given, otherwise resolves from `[output]`
    pub fn with_override(config: &OutputConfig, path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::to_path(path),
            None => Self::from_config(config),
        }
    }

    /// Resolves `relative` below the project root found in `base`
    pub fn in_project(
        base: impl Into<PathBuf>,
        marker: Option<String>,
        relative: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target: Target::Project {
                base: base.into(),
                marker,
                relative: relative.into(),
            },
        }
    }

    /// The file this sink will write to
    pub fn resolve(&self) -> Result<PathBuf, PersistError> {
        match &self.target {
            Target::Path(path) => Ok(path.clone()),
            Target::Project {
                base,
                marker,
                relative,
            } => {
                let base = absolute(base)?;
                let root = match marker {
                    Some(marker) => find_project_root(&base, marker)?,
                    None => base,
                };
                Ok(root.join(relative))
            }
        }
    }
}

impl ResultSink for JsonFileSink {
    fn persist(&self, result: &CrawlResult) -> Result<PathBuf, PersistError> {
        let path = self.resolve()?;
        let json = serde_json::to_string_pretty(&result.records)?;
        write_atomically(&path, json.as_bytes())?;
        tracing::info!("Saved {} listings to {}", result.records.len(), path.display());
        Ok(path)
    }
}

/// Truncates `path` after its first component named `marker`
///
/// `/home/u/local_home_scraper/backend` with marker `local_home_scraper`
/// gives `/home/u/local_home_scraper`.
pub fn find_project_root(path: &Path, marker: &str) -> Result<PathBuf, PersistError> {
    let mut root = PathBuf::new();
    for component in path.components() {
        root.push(component);
        if component.as_os_str() == marker {
            return Ok(root);
        }
    }

    Err(PersistError::MarkerNotFound {
        marker: marker.to_string(),
        path: path.to_path_buf(),
    })
}

fn absolute(path: &Path) -> Result<PathBuf, PersistError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}

/// Writes to a sibling temporary file, then renames it over `path`
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(io_err)?;
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::ListingRecord;
    use serde_json::{json, Map, Value};
    use tempfile::TempDir;

    fn record(url: &str, title: &str) -> ListingRecord {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(title.to_string()));
        fields.insert("price".to_string(), json!(8.5));
        ListingRecord {
            url: url.to_string(),
            fields,
        }
    }

    fn result() -> CrawlResult {
        CrawlResult {
            records: vec![
                record("https://example.com/r/1", "南青山ハイツ"),
                record("https://example.com/r/2", "Maison Ebisu"),
            ],
            pages_visited: 1,
            urls_collected: 3,
        }
    }

    #[test]
    fn test_find_project_root() {
        let root = find_project_root(
            Path::new("/home/u/local_home_scraper/backend/src"),
            "local_home_scraper",
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/home/u/local_home_scraper"));
    }

    #[test]
    fn test_find_project_root_first_occurrence() {
        let root = find_project_root(Path::new("/a/proj/b/proj/c"), "proj").unwrap();
        assert_eq!(root, PathBuf::from("/a/proj"));
    }

    #[test]
    fn test_find_project_root_requires_whole_component() {
        let err = find_project_root(Path::new("/a/my_proj_x/b"), "proj").unwrap_err();
        assert!(matches!(err, PersistError::MarkerNotFound { .. }));
    }

    // Both cases share one test so the environment variable is not raced.
    #[test]
    fn test_from_config_resolution() {
        let dir = TempDir::new().unwrap();
        let mut config = OutputConfig {
            root: PathBuf::from("data"),
            root_marker: None,
            relative_path: PathBuf::from("static_data.json"),
        };

        std::env::remove_var(OUTPUT_ROOT_ENV);
        let path = JsonFileSink::from_config(&config).resolve().unwrap();
        assert_eq!(
            path,
            std::env::current_dir().unwrap().join("data/static_data.json")
        );

        config.root = PathBuf::from("/nonexistent/elsewhere");
        config.root_marker = Some("local_home_scraper".to_string());
        config.relative_path = PathBuf::from("frontend/public/static_data.json");
        std::env::set_var(
            OUTPUT_ROOT_ENV,
            dir.path().join("local_home_scraper").join("backend"),
        );
        let resolved = JsonFileSink::from_config(&config).resolve();
        std::env::remove_var(OUTPUT_ROOT_ENV);

        assert_eq!(
            resolved.unwrap(),
            dir.path()
                .join("local_home_scraper/frontend/public/static_data.json")
        );
    }

    #[test]
    fn test_override_path_wins_over_config() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            root: PathBuf::from("/nonexistent"),
            root_marker: Some("local_home_scraper".to_string()),
            relative_path: PathBuf::from("static_data.json"),
        };
        let sink = JsonFileSink::with_override(&config, Some(dir.path().join("out.json")));
        assert_eq!(sink.resolve().unwrap(), dir.path().join("out.json"));
    }

    #[test]
    fn test_persist_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("local_home_scraper").join("backend");
        let sink = JsonFileSink::in_project(
            &base,
            Some("local_home_scraper".to_string()),
            "frontend/public/static_data.json",
        );

        let path = sink.persist(&result()).unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("local_home_scraper/frontend/public/static_data.json")
        );
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 2);
        assert_eq!(written[0]["title"], "南青山ハイツ");
        assert_eq!(written[1]["url"], "https://example.com/r/2");
    }

    #[test]
    fn test_persist_is_indented_and_keeps_non_ascii() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::to_path(dir.path().join("out.json"));

        let path = sink.persist(&result()).unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert!(text.starts_with("[\n  {\n    \"url\""));
        assert!(text.contains("南青山ハイツ"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_persist_without_marker_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::in_project(
            dir.path(),
            Some("local_home_scraper".to_string()),
            "frontend/public/static_data.json",
        );

        let err = sink.persist(&result()).unwrap_err();

        assert!(matches!(err, PersistError::MarkerNotFound { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_persist_empty_result() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::to_path(dir.path().join("empty.json"));
        let path = sink.persist(&CrawlResult::default()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_persist_overwrites_previous_output() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::to_path(dir.path().join("out.json"));
        sink.persist(&result()).unwrap();
        let path = sink.persist(&CrawlResult::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(!dir.path().join("out.json.tmp").exists());
    }
}
