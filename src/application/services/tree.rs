//! Tree service
//!
//! Builds section trees through the cache and loads node children on demand.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::application::cache::{TreeCache, TreeResult};
use crate::application::events::{TreeEvent, TreeEvents};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    build_tree, normalize, section_or_default, Branch, DomainError, NodeData, NodeId, TreeQuery,
};
use crate::infrastructure::traits::{DataSource, Notifier};
use crate::infrastructure::SourceResult;

/// Service for section trees and lazy child loading.
pub struct TreeService {
    source: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    cache: Arc<TreeCache>,
    events: TreeEvents,
}

impl TreeService {
    pub fn new(
        source: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
        cache: Arc<TreeCache>,
        events: TreeEvents,
    ) -> Self {
        Self {
            source,
            notifier,
            cache,
            events,
        }
    }

    /// Subscribe to load events.
    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.events.subscribe()
    }

    pub fn cache(&self) -> &Arc<TreeCache> {
        &self.cache
    }

    /// Get the tree for `query`, fetching it on first use.
    ///
    /// Every later call with the same cache key and section returns the same
    /// `Arc`. Concurrent first calls share a single fetch.
    #[instrument(level = "debug", skip(self), fields(section = %query.section, cache_key = %query.cache_key))]
    pub async fn get_tree(&self, query: TreeQuery) -> ApplicationResult<Arc<TreeResult>> {
        let query = query.or_default_section();
        let key = query.key();
        if let Some(hit) = self.cache.get(&key).await {
            debug!(%key, "tree cache hit");
            return Ok(hit);
        }

        self.cache
            .get_or_try_load(key.clone(), || async {
                let payload = self.source.fetch_application_tree(&query).await?;
                let arena = build_tree(payload, &query.section)?;
                debug!(%key, nodes = arena.len(), "tree fetched");
                Ok::<_, ApplicationError>(TreeResult::new(&query.section, key.clone(), arena))
            })
            .await
    }

    /// Fetch and normalize the children of `node` without installing them.
    pub async fn get_children(
        &self,
        tree: &TreeResult,
        node: NodeId,
        section: &str,
    ) -> ApplicationResult<Vec<Branch>> {
        let (data, level) = Self::snapshot(tree, node).await?;
        Ok(self.fetch_children(node, &data, level, section).await?)
    }

    /// Replace the children of `node` with a fresh set from the data source.
    ///
    /// The node's children are cleared and it is marked loading before the
    /// fetch. On success the new children are installed and the node is
    /// expanded. On failure the node stops loading, a `NodeLoadError` event
    /// and a notification are emitted, and the error is returned; the node
    /// can be loaded again.
    ///
    /// A result arriving for a node that was removed, or that a newer load
    /// has since claimed, is discarded.
    #[instrument(level = "debug", skip(self, tree), fields(tree = %tree.key))]
    pub async fn load_node_children(
        &self,
        tree: &TreeResult,
        node: NodeId,
        section: &str,
    ) -> ApplicationResult<Vec<NodeId>> {
        let (ticket, data, level) = {
            let mut arena = tree.lock().await;
            let ticket = arena.begin_load(node)?;
            let current = arena.get_node(node).ok_or(DomainError::UnknownNode(node))?;
            (ticket, current.data.clone(), current.level)
        };

        match self.fetch_children(node, &data, level, section).await {
            Ok(branches) => {
                let ids = tree.lock().await.complete_load(ticket, branches).map_err(|e| {
                    debug!(?node, "discarding loaded children: {e}");
                    e
                })?;
                self.events.emit(TreeEvent::ChildrenLoaded {
                    tree: tree.key.clone(),
                    node,
                    count: ids.len(),
                });
                Ok(ids)
            }
            Err(e) => {
                if let Err(stale) = tree.lock().await.fail_load(ticket) {
                    debug!(?node, "failed load no longer current: {stale}");
                }
                let reason = e.to_string();
                debug!(node_id = %data.id, "child load failed: {reason}");
                self.events.emit(TreeEvent::NodeLoadError {
                    tree: tree.key.clone(),
                    node,
                    node_id: data.id.clone(),
                    error: reason.clone(),
                });
                self.notifier.notify_error(&reason);
                Err(e.into())
            }
        }
    }

    async fn snapshot(tree: &TreeResult, node: NodeId) -> Result<(NodeData, u32), DomainError> {
        let arena = tree.lock().await;
        let current = arena.get_node(node).ok_or(DomainError::UnknownNode(node))?;
        Ok((current.data.clone(), current.level))
    }

    async fn fetch_children(
        &self,
        node: NodeId,
        data: &NodeData,
        level: u32,
        section: &str,
    ) -> SourceResult<Vec<Branch>> {
        let section = section_or_default(section);
        let payloads = self.source.fetch_node_children(section, data).await?;
        debug!(node_id = %data.id, count = payloads.len(), "children fetched");
        Ok(normalize(node, level, payloads, section, Some(level + 1)))
    }
}
