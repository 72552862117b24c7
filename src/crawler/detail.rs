//! Detail page extraction
//!
//! Turns one listing's detail page into a [`ListingRecord`]. A page that is
//! missing any required field produces no record at all, and a page that
//! cannot be fetched is skipped; neither stops the crawl.

use crate::config::{FieldKind, FieldSpec, SiteProfile};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{element_text, resolve_link, PageDocument};
use crate::DetailError;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use url::Url;

/// Structured data extracted from one detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    /// The detail page this record came from
    pub url: String,

    /// Field name to value, in configuration order
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Fetches and parses detail pages
pub struct DetailExtractor<'a> {
    fetcher: &'a Fetcher,
    site: &'a SiteProfile,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(fetcher: &'a Fetcher, site: &'a SiteProfile) -> Self {
        Self { fetcher, site }
    }

    /// Extracts a record, logging and swallowing any failure
    pub async fn extract_detail(&self, url: &Url) -> Option<ListingRecord> {
        match self.try_extract_detail(url).await {
            Ok(record) => Some(record),
            Err(DetailError::Fetch(e)) => {
                tracing::warn!("Skipping listing, fetch failed: {}", e);
                None
            }
            Err(e @ DetailError::Absent { .. }) => {
                tracing::warn!("Skipping listing: {}", e);
                None
            }
        }
    }

    /// Fetches `url` and parses it into a record
    pub async fn try_extract_detail(&self, url: &Url) -> Result<ListingRecord, DetailError> {
        let body = self.fetcher.fetch(url).await?;
        parse_detail(&body, url, self.site)
    }
}

/// Parses a detail page body into a record using the fields of `site`
///
/// # Returns
///
/// * `Ok(ListingRecord)` - Every required field was found
/// * `Err(DetailError::Absent)` - The first required field that yielded nothing
pub fn parse_detail(
    body: &str,
    page_url: &Url,
    site: &SiteProfile,
) -> Result<ListingRecord, DetailError> {
    let document = PageDocument::parse(body);
    let mut values = Map::new();

    for field in &site.fields {
        match extract_field(&document, field, site, page_url) {
            Some(value) => {
                values.insert(field.name.clone(), value);
            }
            None if field.required => {
                return Err(DetailError::Absent {
                    url: page_url.to_string(),
                    field: field.name.clone(),
                });
            }
            None => {
                values.insert(field.name.clone(), Value::Null);
            }
        }
    }

    Ok(ListingRecord {
        url: page_url.to_string(),
        fields: values,
    })
}

/// Reads one field's value, or None if the page has nothing usable for it
fn extract_field(
    document: &PageDocument,
    field: &FieldSpec,
    site: &SiteProfile,
    page_url: &Url,
) -> Option<Value> {
    let mut matches = document.select(&field.selector);

    match field.kind {
        FieldKind::Text => {
            let text = element_text(&matches.next()?);
            (!text.is_empty()).then_some(Value::String(text))
        }
        FieldKind::Number => parse_number(&element_text(&matches.next()?)),
        FieldKind::List => {
            let items: Vec<Value> = matches
                .map(|element| element_text(&element))
                .filter(|text| !text.is_empty())
                .map(Value::String)
                .collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        FieldKind::Link => {
            let element = matches.next()?;
            let target = element
                .value()
                .attr("href")
                .or_else(|| element.value().attr("src"))?;
            resolve_link(target, page_url).map(|url| Value::String(url.into()))
        }
        FieldKind::Table => {
            let mut table = Map::new();
            for row in matches {
                read_row(&row, &site.table_header, &site.table_cell, &mut table);
            }
            (!table.is_empty()).then_some(Value::Object(table))
        }
    }
}

/// Pairs each header cell in a row with the data cell in the same position
fn read_row(row: &ElementRef<'_>, th: &Selector, td: &Selector, table: &mut Map<String, Value>) {
    for (key, value) in row.select(th).zip(row.select(td)) {
        let key = element_text(&key);
        if !key.is_empty() {
            table.insert(key, Value::String(element_text(&value)));
        }
    }
}

/// Extracts the first number in `text`
///
/// Full-width digits are accepted and thousands separators dropped, so
/// `"１,２００円"` gives 1200 and `"8.5万円"` gives 8.5. Integers stay
/// integers in the JSON output.
pub fn parse_number(text: &str) -> Option<Value> {
    let normalized: String = text.chars().map(to_ascii_numeric).collect();
    let start = normalized.find(|c: char| c.is_ascii_digit())?;

    let mut digits = String::new();
    for c in normalized[start..].chars() {
        match c {
            '0'..='9' => digits.push(c),
            ',' => continue,
            '.' if !digits.contains('.') => digits.push(c),
            _ => break,
        }
    }
    if digits.ends_with('.') {
        digits.pop();
    }

    if !digits.contains('.') {
        if let Ok(n) = digits.parse::<i64>() {
            return Some(Value::Number(n.into()));
        }
    }
    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn to_ascii_numeric(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        '．' => '.',
        '，' => ',',
        _ => c,
    }
}
