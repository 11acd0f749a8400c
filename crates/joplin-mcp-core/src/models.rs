//! Typed projections of Joplin Data API records.
//!
//! The backend returns arbitrary JSON objects whose field set depends on the
//! `fields` query parameter. Those objects travel through the client as
//! [`JsonObject`] and are only projected into the structs below at the model
//! boundary. Unknown fields are ignored and missing nullable fields default to
//! `None`.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A raw backend record.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Project a raw backend record into a typed model.
///
/// # Errors
///
/// Fails when a required field (such as `id`) is missing or has the wrong type.
pub fn from_record<T: DeserializeOwned>(record: JsonObject) -> Result<T, serde_json::Error> {
    serde_json::from_value(serde_json::Value::Object(record))
}

/// Joplin uses `""` for "no parent"; surface that as `None`.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// A Markdown note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    /// Backend-assigned identifier
    pub id: String,
    /// Note title
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown body
    #[serde(default)]
    pub body: Option<String>,
    /// Containing folder
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<String>,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Last update time, epoch milliseconds
    #[serde(default)]
    pub updated_time: Option<i64>,
}

/// A notebook. Folders form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Folder {
    /// Backend-assigned identifier
    pub id: String,
    /// Folder title
    #[serde(default)]
    pub title: Option<String>,
    /// Parent folder, `None` for root folders
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<String>,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Last update time, epoch milliseconds
    #[serde(default)]
    pub updated_time: Option<i64>,
}

/// A tag. Note associations live in the backend only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tag {
    /// Backend-assigned identifier
    pub id: String,
    /// Tag title
    #[serde(default)]
    pub title: Option<String>,
}

/// Attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resource {
    /// Backend-assigned identifier
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// MIME type
    #[serde(default)]
    pub mime: Option<String>,
    /// Original file name
    #[serde(default)]
    pub filename: Option<String>,
    /// File extension without the dot
    #[serde(default)]
    pub file_extension: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<i64>,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Last update time, epoch milliseconds
    #[serde(default)]
    pub updated_time: Option<i64>,
}

/// Attachment content, base64 encoded. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceBlob {
    /// Resource identifier
    pub id: String,
    /// MIME type
    pub mime: Option<String>,
    /// Original file name
    pub filename: Option<String>,
    /// Length of the decoded content in bytes
    pub size: u64,
    /// Content encoded as standard base64
    pub data_base64: String,
}

/// One node of the folder hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FolderNode {
    /// Folder identifier
    pub id: String,
    /// Folder title
    pub title: Option<String>,
    /// Child folders, ordered by title
    #[serde(default)]
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(FolderNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> JsonObject {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn note_ignores_unknown_fields_and_defaults_missing_ones() {
        let note: Note = from_record(record(json!({
            "id": "abc",
            "title": "Hello",
            "is_todo": 0,
            "source_url": "",
        })))
        .unwrap();

        assert_eq!(note.id, "abc");
        assert_eq!(note.title.as_deref(), Some("Hello"));
        assert_eq!(note.body, None);
        assert_eq!(note.parent_id, None);
        assert_eq!(note.updated_time, None);
    }

    #[test]
    fn empty_parent_id_means_root() {
        let folder: Folder = from_record(record(json!({
            "id": "f1",
            "title": "Inbox",
            "parent_id": "",
        })))
        .unwrap();
        assert_eq!(folder.parent_id, None);

        let note: Note = from_record(record(json!({"id": "n1", "parent_id": null}))).unwrap();
        assert_eq!(note.parent_id, None);

        let nested: Folder = from_record(record(json!({"id": "f2", "parent_id": "f1"}))).unwrap();
        assert_eq!(nested.parent_id.as_deref(), Some("f1"));
    }

    #[test]
    fn record_without_id_is_rejected() {
        let result: Result<Note, _> = from_record(record(json!({"title": "orphan"})));
        assert!(result.is_err());
    }

    #[test]
    fn node_count_includes_whole_subtree() {
        let node = FolderNode {
            id: "a".into(),
            title: None,
            children: vec![
                FolderNode {
                    id: "b".into(),
                    title: None,
                    children: vec![],
                },
                FolderNode {
                    id: "c".into(),
                    title: None,
                    children: vec![FolderNode {
                        id: "d".into(),
                        title: None,
                        children: vec![],
                    }],
                },
            ],
        };
        assert_eq!(node.node_count(), 4);
    }
}
