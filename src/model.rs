//! Data models for HydroShare entities returned by the REST API.

use crate::format::{to_json, Formattable, FormattingError, OutputFormat};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Identity of the authenticated user, as returned by `hsapi/userInfo/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
}

/// One page of a paginated HydroShare listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A resource as it appears in the resource listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub resource_id: String,
    pub resource_title: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_last_updated: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub discoverable: bool,
    #[serde(default)]
    pub published: bool,
    /// Total size of the resource files in bytes, only filled in on request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ResourceSize>,
}

/// Outcome of summing the file sizes of a resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceSize {
    Bytes(u64),
    Error,
}

impl ResourceSize {
    fn label(&self) -> String {
        match self {
            ResourceSize::Bytes(0) => "[?]".to_string(),
            ResourceSize::Bytes(bytes) => format!("[{}]", crate::format::human_size(*bytes)),
            ResourceSize::Error => "[ERROR]".to_string(),
        }
    }
}

/// A content file attached to a remote resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceFile {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct CreatedResourceResponse {
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ResourceTypeEntry {
    pub resource_type: String,
}

/// Metadata attributes the resource listing can be filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ResourceFilter {
    Creator,
    User,
    Owner,
    Author,
    Group,
    Text,
    Published,
    Editable,
    Public,
}

impl ResourceFilter {
    /// The query parameter name understood by the resource listing endpoint
    pub fn query_key(&self) -> &'static str {
        match self {
            ResourceFilter::Creator => "creator",
            ResourceFilter::User => "user",
            ResourceFilter::Owner => "owner",
            ResourceFilter::Author => "author",
            ResourceFilter::Group => "group",
            ResourceFilter::Text => "full_text_search",
            ResourceFilter::Published => "published",
            ResourceFilter::Editable => "edit_permission",
            ResourceFilter::Public => "public",
        }
    }

    pub fn names() -> Vec<String> {
        ResourceFilter::iter().map(|f| f.to_string()).collect()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid filter: {0}")]
pub struct InvalidFilter(pub String);

/// Parse a `KEY=VALUE` filter expression, e.g. `owner=alice`
pub fn parse_filter(expression: &str) -> Result<(ResourceFilter, String), InvalidFilter> {
    let (key, value) = expression
        .split_once('=')
        .ok_or_else(|| InvalidFilter(expression.to_string()))?;
    if value.is_empty() || value.contains('=') {
        return Err(InvalidFilter(expression.to_string()));
    }
    let filter =
        ResourceFilter::from_str(key.trim()).map_err(|_| InvalidFilter(expression.to_string()))?;
    Ok((filter, value.to_string()))
}

/// Parameters of a resource listing request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceQuery {
    pub filters: Vec<(ResourceFilter, String)>,
    /// Maximum number of resources to return
    pub limit: Option<usize>,
}

impl ResourceQuery {
    pub fn owned_by(username: &str) -> Self {
        Self {
            filters: vec![(ResourceFilter::Owner, username.to_string())],
            limit: None,
        }
    }

    /// Add a filter, replacing an earlier one on the same attribute
    pub fn with_filter(mut self, filter: ResourceFilter, value: String) -> Self {
        self.filters.retain(|(f, _)| *f != filter);
        self.filters.push((filter, value));
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.filters
            .iter()
            .map(|(filter, value)| (filter.query_key(), value.clone()))
            .collect()
    }
}

/// The resources returned by a listing, in server order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResourceList {
    pub resources: Vec<ResourceSummary>,
}

const TITLE_WIDTH: usize = 25;

impl ResourceSummary {
    fn plain_line(&self) -> String {
        let size = self.size.map(|s| s.label()).unwrap_or_else(|| "[?]".to_string());
        let title: String = self.resource_title.chars().take(TITLE_WIDTH).collect();
        let ellipsis = if self.resource_title.chars().count() > TITLE_WIDTH {
            "..."
        } else {
            "   "
        };
        format!(
            "+ {:<width$}{} - {} {}",
            title,
            ellipsis,
            self.resource_id,
            size,
            width = TITLE_WIDTH
        )
    }

    fn plain_long(&self) -> String {
        let size = self.size.map(|s| s.label()).unwrap_or_else(|| "[?]".to_string());
        format!(
            "+ {} {}\n   title: {}\n   date created: {}\n   owner: {}\n   authors: {}",
            self.resource_id,
            size,
            self.resource_title,
            self.date_created.as_deref().unwrap_or(""),
            self.creator.as_deref().unwrap_or(""),
            self.authors.join(", ")
        )
    }
}

impl Formattable for ResourceList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Plain(options) => {
                let lines: Vec<String> = self
                    .resources
                    .iter()
                    .map(|r| {
                        if options.long {
                            r.plain_long()
                        } else {
                            r.plain_line()
                        }
                    })
                    .collect();
                let separator = if options.long { "\n\n" } else { "\n" };
                Ok(lines.join(separator))
            }
            OutputFormat::Json(options) => to_json(&self.resources, options),
            OutputFormat::Yaml(_) => Ok(serde_yaml::to_string(&self.resources)?),
            OutputFormat::Csv(options) => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                if options.with_headers {
                    wtr.serialize((
                        "RESOURCE_ID",
                        "TITLE",
                        "TYPE",
                        "OWNER",
                        "DATE_CREATED",
                        "SIZE",
                    ))?;
                }
                for r in &self.resources {
                    let size = match r.size {
                        Some(ResourceSize::Bytes(bytes)) => bytes.to_string(),
                        _ => String::new(),
                    };
                    wtr.serialize((
                        &r.resource_id,
                        &r.resource_title,
                        r.resource_type.as_deref().unwrap_or(""),
                        r.creator.as_deref().unwrap_or(""),
                        r.date_created.as_deref().unwrap_or(""),
                        size,
                    ))?;
                }
                let data = wtr.into_inner()?;
                Ok(String::from_utf8(data)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;

    fn summary(title: &str) -> ResourceSummary {
        ResourceSummary {
            resource_id: "abc123".to_string(),
            resource_title: title.to_string(),
            resource_type: Some("CompositeResource".to_string()),
            creator: Some("alice".to_string()),
            authors: vec!["Alice".to_string(), "Bob".to_string()],
            date_created: Some("2020-01-01".to_string()),
            date_last_updated: None,
            public: false,
            discoverable: false,
            published: false,
            size: None,
        }
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("owner=alice"),
            Ok((ResourceFilter::Owner, "alice".to_string()))
        );
        assert_eq!(
            parse_filter("TEXT=rain fall"),
            Ok((ResourceFilter::Text, "rain fall".to_string()))
        );
        assert_eq!(ResourceFilter::Text.query_key(), "full_text_search");
        assert_eq!(ResourceFilter::Editable.query_key(), "edit_permission");
    }

    #[test]
    fn test_parse_invalid_filter() {
        assert!(parse_filter("owner").is_err());
        assert!(parse_filter("color=red").is_err());
        assert!(parse_filter("owner=").is_err());
        assert!(parse_filter("owner=a=b").is_err());
    }

    #[test]
    fn test_query_filter_replaces_previous_value() {
        let query = ResourceQuery::owned_by("alice").with_filter(ResourceFilter::Owner, "bob".into());
        assert_eq!(query.query_pairs(), vec![("owner", "bob".to_string())]);
    }

    #[test]
    fn test_plain_line_truncates_long_titles() {
        let list = ResourceList {
            resources: vec![summary("A very long resource title that keeps going")],
        };
        let output = list.format(&OutputFormat::default()).unwrap();
        assert_eq!(output, "+ A very long resource titl... - abc123 [?]");
    }

    #[test]
    fn test_plain_long_format() {
        let mut resource = summary("Short");
        resource.size = Some(ResourceSize::Bytes(2048));
        let list = ResourceList {
            resources: vec![resource],
        };
        let options = OutputFormatOptions {
            long: true,
            ..Default::default()
        };
        let output = list.format(&OutputFormat::Plain(options)).unwrap();
        assert!(output.starts_with("+ abc123 [2 KB]"));
        assert!(output.contains("   owner: alice"));
        assert!(output.contains("   authors: Alice, Bob"));
    }

    #[test]
    fn test_csv_with_headers() {
        let list = ResourceList {
            resources: vec![summary("Short")],
        };
        let options = OutputFormatOptions {
            with_headers: true,
            ..Default::default()
        };
        let output = list.format(&OutputFormat::Csv(options)).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("RESOURCE_ID,TITLE,TYPE,OWNER,DATE_CREATED,SIZE")
        );
        assert_eq!(
            lines.next(),
            Some("abc123,Short,CompositeResource,alice,2020-01-01,")
        );
    }
}
