//! Menu service
//!
//! Resolves a node's context menu and translates legacy icon classes.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{DomainError, MenuItem, NodeData};
use crate::infrastructure::traits::{DataSource, IconTranslator};

/// Parameters for `get_menu`.
#[derive(Debug, Clone, Copy)]
pub struct MenuQuery<'a> {
    pub tree_node: &'a NodeData,
}

/// Parameters for `get_menu_item_by_alias`.
#[derive(Debug, Clone, Copy)]
pub struct MenuItemQuery<'a> {
    pub tree_node: &'a NodeData,
    pub menu_item_alias: &'a str,
}

pub struct MenuService {
    source: Arc<dyn DataSource>,
    icons: Arc<dyn IconTranslator>,
}

impl MenuService {
    pub fn new(source: Arc<dyn DataSource>, icons: Arc<dyn IconTranslator>) -> Self {
        Self { source, icons }
    }

    /// Fetch the menu of `query.tree_node`, with icons translated in place.
    #[instrument(level = "debug", skip(self, query), fields(node_id = %query.tree_node.id))]
    pub async fn get_menu(&self, query: MenuQuery<'_>) -> ApplicationResult<Vec<MenuItem>> {
        if query.tree_node.id.is_empty() {
            return Err(DomainError::InvalidArgument("tree node has no id".into()).into());
        }

        let mut items = self.source.fetch_menu(query.tree_node).await?;
        for item in &mut items {
            item.cssclass = self.icons.translate_legacy_icon(&item.cssclass);
        }
        debug!(count = items.len(), "menu resolved");
        Ok(items)
    }

    /// First menu item of the node whose alias matches, if any.
    pub async fn get_menu_item_by_alias(
        &self,
        query: MenuItemQuery<'_>,
    ) -> ApplicationResult<Option<MenuItem>> {
        if query.menu_item_alias.is_empty() {
            return Err(DomainError::InvalidArgument("menu item alias is empty".into()).into());
        }

        let items = self
            .get_menu(MenuQuery {
                tree_node: query.tree_node,
            })
            .await?;
        Ok(items
            .into_iter()
            .find(|item| item.alias == query.menu_item_alias))
    }
}
