//! Domain entities: payloads exchanged with the data source and query types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Section used when a query does not name one.
pub const DEFAULT_SECTION: &str = "content";

/// `section`, or [`DEFAULT_SECTION`] when it is blank.
pub fn section_or_default(section: &str) -> &str {
    if section.trim().is_empty() {
        DEFAULT_SECTION
    } else {
        section
    }
}

/// Metadata key that marks a node as the root of its tree.
pub const TREE_TYPE_KEY: &str = "treeType";

/// Opaque per-node metadata as delivered by the data source.
pub type MetaData = BTreeMap<String, Value>;

/// Raw node as delivered by the data source, before normalization.
///
/// Nested `children` are optional; most sources only send them for the
/// application root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePayload {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub route_path: Option<String>,
    pub menu_url: Option<String>,
    pub has_children: bool,
    pub meta_data: MetaData,
    pub children: Vec<NodePayload>,
}

impl NodePayload {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<NodePayload>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta_data.insert(key.into(), value.into());
        self
    }
}

/// The application tree root returned by `fetch_application_tree`.
pub type TreeRootPayload = NodePayload;

/// Ids arrive as JSON strings or numbers; both are kept in string form.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// An action associated with a tree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItem {
    pub alias: String,
    pub name: String,
    /// Display icon class. Legacy sprite classes start with `.`.
    pub cssclass: String,
    pub separator: bool,
}

impl MenuItem {
    pub fn new(alias: impl Into<String>, name: impl Into<String>, cssclass: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
            cssclass: cssclass.into(),
            separator: false,
        }
    }
}

/// Parameters for `get_tree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeQuery {
    pub section: String,
    pub cache_key: String,
}

impl Default for TreeQuery {
    fn default() -> Self {
        Self {
            section: DEFAULT_SECTION.to_string(),
            cache_key: String::new(),
        }
    }
}

impl TreeQuery {
    /// Query for `section`; a blank section means [`DEFAULT_SECTION`].
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..Self::default()
        }
        .or_default_section()
    }

    pub fn or_default_section(mut self) -> Self {
        if self.section.trim().is_empty() {
            self.section = DEFAULT_SECTION.to_string();
        }
        self
    }

    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = cache_key.into();
        self
    }

    pub fn key(&self) -> TreeKey {
        TreeKey::new(&self.cache_key, &self.section)
    }
}

/// Composite cache key: `<cacheKey>_<section>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeKey(String);

impl TreeKey {
    pub fn new(cache_key: &str, section: &str) -> Self {
        Self(format!("{cache_key}_{section}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TreeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
