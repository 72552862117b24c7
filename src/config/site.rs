//! Compiled form of the `[site]` configuration
//!
//! Selectors are parsed once at load time so that a typo in the config file
//! is reported before any request is made.

use crate::config::types::{FieldKind, SiteConfig};
use crate::ConfigError;
use scraper::Selector;

/// Site markup description with all selectors compiled
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub listing_links: Selector,
    pub pagination: Selector,
    pub next_page_text: String,
    pub fields: Vec<FieldSpec>,

    /// Header and data cells of a table field's rows
    pub table_header: Selector,
    pub table_cell: Selector,
}

/// A compiled detail-page field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub selector: Selector,
    pub kind: FieldKind,
    pub required: bool,
}

impl SiteProfile {
    /// Compiles every selector in the site configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SiteProfile)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed, with its source
    pub fn compile(site: &SiteConfig) -> Result<Self, ConfigError> {
        let fields = site
            .fields
            .iter()
            .map(|field| {
                Ok(FieldSpec {
                    name: field.name.clone(),
                    selector: compile_selector(
                        &format!("field '{}'", field.name),
                        &field.selector,
                    )?,
                    kind: field.kind,
                    required: field.required,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            listing_links: compile_selector("listing-link-selector", &site.listing_link_selector)?,
            pagination: compile_selector("pagination-selector", &site.pagination_selector)?,
            next_page_text: site.next_page_text.clone(),
            fields,
            table_header: compile_selector("table header", "th")?,
            table_cell: compile_selector("table cell", "td")?,
        })
    }
}

/// Parses one CSS selector, naming the config entry on failure
pub fn compile_selector(label: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {}", label, selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::FieldConfig;

    fn site() -> SiteConfig {
        SiteConfig {
            listing_link_selector: "a.detail".to_string(),
            pagination_selector: ".pagination a".to_string(),
            next_page_text: "次へ".to_string(),
            fields: vec![FieldConfig {
                name: "price".to_string(),
                selector: ".price".to_string(),
                kind: FieldKind::Number,
                required: true,
            }],
        }
    }

    #[test]
    fn test_compile_valid_site() {
        let profile = SiteProfile::compile(&site()).unwrap();
        assert_eq!(profile.next_page_text, "次へ");
        assert_eq!(profile.fields.len(), 1);
        assert_eq!(profile.fields[0].kind, FieldKind::Number);
        assert!(profile.fields[0].required);
    }

    #[test]
    fn test_compile_table_cell_selectors() {
        let profile = SiteProfile::compile(&site()).unwrap();
        let html = scraper::Html::parse_fragment(
            "<table><tr><th>間取り</th><td>1LDK</td></tr></table>",
        );
        assert_eq!(html.select(&profile.table_header).count(), 1);
        assert_eq!(html.select(&profile.table_cell).count(), 1);
    }

    #[test]
    fn test_invalid_field_selector_names_field() {
        let mut site = site();
        site.fields[0].selector = "div[".to_string();
        let err = SiteProfile::compile(&site).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector(ref msg) if msg.contains("price")));
    }

    #[test]
    fn test_invalid_pagination_selector() {
        let mut site = site();
        site.pagination_selector = ">>>".to_string();
        assert!(SiteProfile::compile(&site).is_err());
    }
}
