//! Service container for dependency injection
//!
//! Wires up all services with their dependencies. One container per
//! application session; the tree cache lives exactly as long as it does.

use std::sync::Arc;

use crate::application::services::{MenuService, TreeService};
use crate::application::{TreeCache, TreeEvents};
use crate::config::Settings;
use crate::infrastructure::traits::{
    DataSource, IconTranslator, JsonDataSource, LegacyIconTranslator, Notifier, TracingNotifier,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Session-wide tree cache
    pub cache: Arc<TreeCache>,

    /// Event channel shared by the services
    pub events: TreeEvents,

    pub tree: TreeService,
    pub menu: MenuService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let source = Arc::new(JsonDataSource::new(settings.data_dir.clone()));
        Self::with_deps(
            settings,
            source,
            Arc::new(LegacyIconTranslator),
            Arc::new(TracingNotifier),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        source: Arc<dyn DataSource>,
        icons: Arc<dyn IconTranslator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let events = TreeEvents::new(settings.event_capacity);
        let cache = Arc::new(TreeCache::new());
        let tree = TreeService::new(
            Arc::clone(&source),
            notifier,
            Arc::clone(&cache),
            events.clone(),
        );
        let menu = MenuService::new(source, icons);

        Self {
            settings: Arc::new(settings),
            cache,
            events,
            tree,
            menu,
        }
    }
}
