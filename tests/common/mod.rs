//! Shared fixtures: a scripted in-memory data source and a recording notifier.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use navtree::application::services::{MenuService, TreeService};
use navtree::application::{TreeCache, TreeEvents};
use navtree::domain::{MenuItem, NodeData, NodePayload, TreeQuery, TreeRootPayload};
use navtree::infrastructure::traits::{DataSource, LegacyIconTranslator, Notifier, SourceFut};
use navtree::infrastructure::SourceError;

type Scripted = Result<Vec<NodePayload>, String>;

/// Data source answering from scripted responses.
///
/// Child responses are queued per node id and consumed in order. A "hold"
/// makes the next fetch for a key wait until the returned `Notify` fires.
#[derive(Default)]
pub struct ScriptedSource {
    trees: Mutex<HashMap<String, Result<TreeRootPayload, String>>>,
    children: Mutex<HashMap<String, VecDeque<Scripted>>>,
    menus: Mutex<HashMap<String, Vec<MenuItem>>>,
    holds: Mutex<HashMap<String, Arc<Notify>>>,
    pub tree_calls: AtomicUsize,
    pub child_calls: AtomicUsize,
    pub menu_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(self, section: &str, root: TreeRootPayload) -> Self {
        self.trees.lock().unwrap().insert(section.to_string(), Ok(root));
        self
    }

    pub fn failing_tree(self, section: &str, reason: &str) -> Self {
        self.trees
            .lock()
            .unwrap()
            .insert(section.to_string(), Err(reason.to_string()));
        self
    }

    pub fn push_children(&self, node_id: &str, children: Vec<NodePayload>) {
        self.queue(node_id, Ok(children));
    }

    pub fn push_failure(&self, node_id: &str, reason: &str) {
        self.queue(node_id, Err(reason.to_string()));
    }

    fn queue(&self, node_id: &str, response: Scripted) {
        self.children
            .lock()
            .unwrap()
            .entry(node_id.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn with_menu(self, node_id: &str, items: Vec<MenuItem>) -> Self {
        self.menus.lock().unwrap().insert(node_id.to_string(), items);
        self
    }

    /// Make the next fetch for `key` (a node id, or `tree:<section>`) wait.
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    async fn wait_if_held(&self, key: &str) {
        let gate = self.holds.lock().unwrap().remove(key);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

impl DataSource for ScriptedSource {
    fn fetch_application_tree<'a>(&'a self, query: &'a TreeQuery) -> SourceFut<'a, TreeRootPayload> {
        Box::pin(async move {
            self.tree_calls.fetch_add(1, Ordering::SeqCst);
            self.wait_if_held(&format!("tree:{}", query.section)).await;
            let scripted = self.trees.lock().unwrap().get(&query.section).cloned();
            match scripted {
                Some(Ok(root)) => Ok(root),
                Some(Err(reason)) => Err(SourceError::transport(reason)),
                None => Err(SourceError::NotFound(format!("section {}", query.section))),
            }
        })
    }

    fn fetch_node_children<'a>(
        &'a self,
        _section: &'a str,
        node: &'a NodeData,
    ) -> SourceFut<'a, Vec<NodePayload>> {
        Box::pin(async move {
            self.child_calls.fetch_add(1, Ordering::SeqCst);
            self.wait_if_held(&node.id).await;
            let next = self
                .children
                .lock()
                .unwrap()
                .get_mut(&node.id)
                .and_then(|queue| queue.pop_front());
            match next {
                Some(Ok(children)) => Ok(children),
                Some(Err(reason)) => Err(SourceError::transport(reason)),
                None => Err(SourceError::transport(format!("no scripted response for {}", node.id))),
            }
        })
    }

    fn fetch_menu<'a>(&'a self, node: &'a NodeData) -> SourceFut<'a, Vec<MenuItem>> {
        Box::pin(async move {
            self.menu_calls.fetch_add(1, Ordering::SeqCst);
            let menu = self.menus.lock().unwrap().get(&node.id).cloned();
            menu.ok_or_else(|| SourceError::NotFound(format!("menu for {}", node.id)))
        })
    }
}

/// Notifier that records every reason it was given.
#[derive(Default)]
pub struct RecordingNotifier {
    pub reasons: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, reason: &str) {
        self.reasons.lock().unwrap().push(reason.to_string());
    }
}

pub struct Fixture {
    pub source: Arc<ScriptedSource>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: TreeService,
    pub menu: MenuService,
}

pub fn fixture(source: ScriptedSource) -> Fixture {
    navtree::util::testing::init_test_setup();
    let source = Arc::new(source);
    let notifier = Arc::new(RecordingNotifier::default());
    let service = TreeService::new(
        source.clone(),
        notifier.clone(),
        Arc::new(TreeCache::new()),
        TreeEvents::new(16),
    );
    let menu = MenuService::new(source.clone(), Arc::new(LegacyIconTranslator));
    Fixture {
        source,
        notifier,
        service,
        menu,
    }
}

pub fn node(id: &str) -> NodePayload {
    NodePayload::new(id, format!("Node {id}"))
}

pub fn folder(id: &str) -> NodePayload {
    let mut payload = node(id);
    payload.has_children = true;
    payload
}

/// Content tree: root (-1, marked) -> [1 (folder), 2]
pub fn content_root() -> TreeRootPayload {
    NodePayload::new("-1", "Content")
        .with_meta("treeType", "content")
        .with_children(vec![folder("1"), node("2")])
}
