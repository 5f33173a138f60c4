//! Resource metadata.
//!
//! HydroShare keeps two metadata documents per resource: *system* metadata
//! (identifiers, dates, sharing status) and *science* metadata (title,
//! abstract, creators, keywords). [`ResourceMetadata`] merges both into one
//! read-only view.

use crate::format::{to_json, Formattable, FormattingError, OutputFormat};
use serde::{Deserialize, Serialize};

/// Document returned by `hsapi/resource/{id}/sysmeta/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadata {
    pub resource_id: String,
    #[serde(default)]
    pub resource_title: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_last_updated: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub discoverable: bool,
    #[serde(default)]
    pub shareable: bool,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub resource_url: Option<String>,
}

/// A creator (author) element of the science metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Document returned by `hsapi/resource/{id}/scimeta/elements/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceMetadata {
    #[serde(default)]
    pub title: String,
    /// The abstract
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub dates: Vec<DateElement>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub rights: Option<serde_json::Value>,
}

/// Combined, read-only view of a resource's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub resource_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub creators: Vec<Creator>,
    pub keywords: Vec<String>,
    pub resource_type: Option<String>,
    pub owner: Option<String>,
    pub date_created: Option<String>,
    pub date_last_updated: Option<String>,
    pub public: bool,
    pub discoverable: bool,
    pub shareable: bool,
    pub immutable: bool,
    pub published: bool,
    pub resource_url: Option<String>,
    pub language: Option<String>,
    pub rights: Option<serde_json::Value>,
}

/// The short projection printed by `describe` unless the long form is requested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSummary {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub creators: String,
    pub date_created: Option<String>,
    pub title: String,
}

impl ResourceMetadata {
    pub fn new(system: SystemMetadata, science: ScienceMetadata) -> Self {
        let mut creators = science.creators;
        creators.sort_by_key(|c| c.order.unwrap_or(u32::MAX));
        let authors = creators.iter().filter_map(|c| c.name.clone()).collect();

        // prefer the science metadata creation date, sysmeta formats it for display
        let date_created = science
            .dates
            .iter()
            .find(|d| d.kind == "created")
            .and_then(|d| d.start_date.clone())
            .or(system.date_created);

        let title = if science.title.is_empty() {
            system.resource_title
        } else {
            science.title
        };

        Self {
            resource_id: system.resource_id,
            title,
            abstract_text: science.description.unwrap_or_default(),
            authors,
            creators,
            keywords: science.subjects.into_iter().map(|s| s.value).collect(),
            resource_type: system.resource_type,
            owner: system.creator,
            date_created,
            date_last_updated: system.date_last_updated,
            public: system.public,
            discoverable: system.discoverable,
            shareable: system.shareable,
            immutable: system.immutable,
            published: system.published,
            resource_url: system.resource_url,
            language: science.language,
            rights: science.rights,
        }
    }

    pub fn summary(&self) -> MetadataSummary {
        let creators: Vec<&str> = self
            .creators
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect();
        MetadataSummary {
            abstract_text: self.abstract_text.replace('\n', ""),
            authors: self.authors.join(";"),
            creators: creators.join(";"),
            date_created: self.date_created.clone(),
            title: self.title.replace('\n', ""),
        }
    }
}

fn plain_lines(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => other.to_string(),
                };
                format!("{}: {}", key, rendered)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

impl Formattable for ResourceMetadata {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        // going through a JSON value sorts the keys
        let value = if format.options().long {
            serde_json::to_value(self)?
        } else {
            serde_json::to_value(self.summary())?
        };

        match format {
            OutputFormat::Plain(_) => Ok(plain_lines(&value)),
            OutputFormat::Yaml(_) => Ok(serde_yaml::to_string(&value)?),
            OutputFormat::Json(options) => to_json(&value, options),
            OutputFormat::Csv(_) => Err(FormattingError::UnsupportedOutputFormat(
                format.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;

    fn metadata() -> ResourceMetadata {
        let system: SystemMetadata = serde_json::from_str(
            r#"{
                "resource_id": "abc123",
                "resource_title": "System title",
                "resource_type": "CompositeResource",
                "creator": "alice",
                "date_created": "01-02-2020",
                "public": true,
                "published": false
            }"#,
        )
        .unwrap();
        let science: ScienceMetadata = serde_json::from_str(
            r#"{
                "title": "Snow water\nequivalent",
                "description": "An abstract\nwith lines",
                "creators": [
                    {"name": "Bob", "order": 2},
                    {"name": "Alice", "organization": "USU", "order": 1}
                ],
                "subjects": [{"value": "snow"}, {"value": "hydrology"}],
                "dates": [{"type": "created", "start_date": "2020-01-02T10:00:00Z"}]
            }"#,
        )
        .unwrap();
        ResourceMetadata::new(system, science)
    }

    #[test]
    fn test_combines_documents() {
        let meta = metadata();
        assert_eq!(meta.resource_id, "abc123");
        assert_eq!(meta.authors, vec!["Alice", "Bob"]);
        assert_eq!(meta.keywords, vec!["snow", "hydrology"]);
        assert_eq!(meta.owner.as_deref(), Some("alice"));
        assert_eq!(meta.date_created.as_deref(), Some("2020-01-02T10:00:00Z"));
        assert!(meta.public);
    }

    #[test]
    fn test_falls_back_to_system_title() {
        let system: SystemMetadata =
            serde_json::from_str(r#"{"resource_id": "x", "resource_title": "From sysmeta"}"#)
                .unwrap();
        let science: ScienceMetadata = serde_json::from_str("{}").unwrap();
        let meta = ResourceMetadata::new(system, science);
        assert_eq!(meta.title, "From sysmeta");
        assert!(meta.authors.is_empty());
    }

    #[test]
    fn test_summary_flattens_names_and_newlines() {
        let summary = metadata().summary();
        assert_eq!(summary.authors, "Alice;Bob");
        assert_eq!(summary.creators, "Alice;Bob");
        assert_eq!(summary.abstract_text, "An abstractwith lines");
        assert_eq!(summary.title, "Snow waterequivalent");
    }

    #[test]
    fn test_short_json_has_sorted_summary_keys() {
        let output = metadata().format(&OutputFormat::Json(OutputFormatOptions::default())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["abstract", "authors", "creators", "date_created", "title"]
        );
    }

    #[test]
    fn test_long_yaml_contains_keywords() {
        let options = OutputFormatOptions {
            long: true,
            ..Default::default()
        };
        let output = metadata().format(&OutputFormat::Yaml(options)).unwrap();
        assert!(output.contains("keywords:"));
        assert!(output.contains("- hydrology"));
    }

    #[test]
    fn test_plain_output() {
        let output = metadata().format(&OutputFormat::default()).unwrap();
        assert!(output.contains("authors: Alice;Bob"));
        assert!(output.starts_with("abstract: "));
    }
}
