//! Port traits for the external collaborators
//!
//! The tree core only talks to the outside world through these traits,
//! allowing services to be tested with scripted implementations.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{MenuItem, NodeData, NodePayload, TreeQuery, TreeRootPayload};
use crate::infrastructure::error_ext::IoResultExt;
use crate::infrastructure::{SourceError, SourceResult};

/// Data source future type alias.
pub type SourceFut<'a, T> = Pin<Box<dyn Future<Output = SourceResult<T>> + Send + 'a>>;

/// Asynchronous provider of tree and menu payloads.
pub trait DataSource: Send + Sync {
    /// Fetch the whole application tree root for `query.section`.
    fn fetch_application_tree<'a>(&'a self, query: &'a TreeQuery) -> SourceFut<'a, TreeRootPayload>;

    /// Fetch the ordered children of `node` within `section`.
    fn fetch_node_children<'a>(
        &'a self,
        section: &'a str,
        node: &'a NodeData,
    ) -> SourceFut<'a, Vec<NodePayload>>;

    /// Fetch the ordered menu items of `node`.
    fn fetch_menu<'a>(&'a self, node: &'a NodeData) -> SourceFut<'a, Vec<MenuItem>>;
}

/// Maps legacy icon identifiers onto current ones.
pub trait IconTranslator: Send + Sync {
    fn translate_legacy_icon(&self, name: &str) -> String;
}

/// Fire-and-forget user notification channel.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, reason: &str);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Data source backed by a directory of JSON payloads.
///
/// Layout:
/// - `<root>/<section>/tree.json`
/// - `<root>/<section>/nodes/<id>.json`
/// - `<root>/<section>/menus/<id>.json` (or the node's `menuUrl`, relative to `<root>`)
#[derive(Debug, Clone)]
pub struct JsonDataSource {
    root: PathBuf,
}

impl JsonDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn section_dir(&self, section: &str) -> SourceResult<PathBuf> {
        Ok(self.root.join(single_component(section)?))
    }

    fn menu_path(&self, node: &NodeData) -> SourceResult<PathBuf> {
        match &node.menu_url {
            Some(url) => {
                let rel = Path::new(url);
                if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
                    return Err(SourceError::NotFound(format!("menu url {url}")));
                }
                Ok(self.root.join(rel))
            }
            None => Ok(self
                .section_dir(&node.section)?
                .join("menus")
                .join(format!("{}.json", single_component(&node.id)?))),
        }
    }
}

/// Reject anything that is not a single plain path component.
fn single_component(name: &str) -> SourceResult<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(SourceError::NotFound(format!("invalid path segment '{name}'"))),
    }
}

async fn read_json<T: DeserializeOwned>(path: PathBuf) -> SourceResult<T> {
    debug!("read_json: {}", path.display());
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_path_context(&path)?;
    serde_json::from_str(&content).map_err(|e| SourceError::decode(&path, e))
}

impl DataSource for JsonDataSource {
    fn fetch_application_tree<'a>(&'a self, query: &'a TreeQuery) -> SourceFut<'a, TreeRootPayload> {
        Box::pin(async move { read_json(self.section_dir(&query.section)?.join("tree.json")).await })
    }

    fn fetch_node_children<'a>(
        &'a self,
        section: &'a str,
        node: &'a NodeData,
    ) -> SourceFut<'a, Vec<NodePayload>> {
        Box::pin(async move {
            let path = self
                .section_dir(section)?
                .join("nodes")
                .join(format!("{}.json", single_component(&node.id)?));
            read_json(path).await
        })
    }

    fn fetch_menu<'a>(&'a self, node: &'a NodeData) -> SourceFut<'a, Vec<MenuItem>> {
        Box::pin(async move { read_json(self.menu_path(node)?).await })
    }
}

/// Legacy sprite classes and their current icon names.
const LEGACY_ICONS: &[(&str, &str)] = &[
    (".sprNew", "add"),
    (".sprDelete", "remove"),
    (".sprMove", "enter"),
    (".sprCopy", "documents"),
    (".sprSort", "navigation-vertical"),
    (".sprPermission", "lock"),
    (".sprRefresh", "refresh"),
    (".sprBinEmpty", "trash"),
    (".sprExportDocumentType", "download-alt"),
    (".sprImportDocumentType", "page-up"),
    (".sprLiveEdit", "edit"),
    (".sprCreateFolder", "add"),
    (".sprPackage2", "box"),
    (".sprLogout", "logout"),
    (".sprSave", "save"),
    (".sprSendToTranslate", "envelope-alt"),
    (".sprToPublish", "mail-forward"),
    (".sprTranslate", "comments"),
    (".sprUpdate", "save"),
    (".sprTreeSettingDomain", "icon-home"),
    (".sprTreeDoc", "icon-document"),
    (".sprTreeDoc2", "icon-diploma-alt"),
    (".sprTreeDoc3", "icon-notepad"),
    (".sprTreeFolder", "icon-folder"),
    (".sprTreeFolder_o", "icon-folder"),
    (".sprTreeMediaFile", "icon-music"),
    (".sprTreeMediaMovie", "icon-movie"),
    (".sprTreeMediaPhoto", "icon-picture"),
    (".sprTreeMember", "icon-user"),
    (".sprTreeMemberGroup", "icon-users"),
    (".sprTreeMemberType", "icon-users"),
    (".sprTreeNewsletter", "icon-file-text-alt"),
    (".sprTreePackage", "icon-box"),
    (".sprTreeRepository", "icon-server-alt"),
    (".sprTreeSettingDataType", "icon-autofill"),
    (".sprTreeUser", "icon-user"),
    (".sprTreeUserGroup", "icon-users"),
    (".sprTreeUserType", "icon-users"),
];

/// Translates `.spr*` sprite classes; everything else passes through.
#[derive(Debug, Default)]
pub struct LegacyIconTranslator;

impl LegacyIconTranslator {
    pub fn is_legacy(name: &str) -> bool {
        name.starts_with('.')
    }
}

impl IconTranslator for LegacyIconTranslator {
    fn translate_legacy_icon(&self, name: &str) -> String {
        if !Self::is_legacy(name) {
            return name.to_string();
        }
        LEGACY_ICONS
            .iter()
            .find(|(old, _)| old.eq_ignore_ascii_case(name))
            .map(|(_, new)| (*new).to_string())
            .unwrap_or_else(|| name.to_string())
    }
}

/// Notifier that reports through the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, reason: &str) {
        warn!("{reason}");
    }
}
