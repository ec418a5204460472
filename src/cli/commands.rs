use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{MenuItemQuery, MenuQuery};
use crate::application::TreeResult;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{NodeData, NodeId, TreeQuery};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return config_command(cli, command),
        _ => {}
    }

    let container = ServiceContainer::new(load_settings(cli)?);
    let query = TreeQuery::section(
        cli.section
            .clone()
            .unwrap_or_else(|| container.settings.default_section.clone()),
    )
    .with_cache_key(cli.cache_key.clone());
    let tree = container.tree.get_tree(query).await?;

    match &cli.command {
        Commands::Tree { depth } => _tree(&container, &tree, *depth).await,
        Commands::Children { id, depth } => _children(&container, &tree, id, *depth).await,
        Commands::Find { id, depth } => _find(&container, &tree, id, *depth).await,
        Commands::Menu { id, alias, depth } => {
            _menu(&container, &tree, id, alias.as_deref(), *depth).await
        }
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::InvalidArgs(format!("cannot determine current directory: {e}"))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = data_dir.clone();
    }
    debug!(data_dir = %settings.data_dir.display(), "settings loaded");
    Ok(settings)
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(&config_dir(cli)?).display());
        }
    }
    Ok(())
}

/// Load children level by level until `depth`. Each node is loaded at most
/// once; failures are reported and skipped.
async fn expand(container: &ServiceContainer, tree: &TreeResult, depth: u32) -> usize {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut loaded = 0;
    loop {
        let pending: Vec<NodeId> = {
            let arena = tree.lock().await;
            arena
                .iter()
                .filter(|(idx, node)| {
                    node.level < depth
                        && node.has_children
                        && node.children.is_empty()
                        && !node.loading
                        && !visited.contains(idx)
                })
                .map(|(idx, _)| idx)
                .collect()
        };
        if pending.is_empty() {
            return loaded;
        }
        for idx in pending {
            visited.insert(idx);
            match container
                .tree
                .load_node_children(tree, idx, tree.section())
                .await
            {
                Ok(_) => loaded += 1,
                Err(e) => output::warning(&e),
            }
        }
    }
}

/// Expand until `depth` and find the node with `id` (the root included).
async fn locate(
    container: &ServiceContainer,
    tree: &TreeResult,
    id: &str,
    depth: u32,
) -> CliResult<(NodeId, NodeData)> {
    expand(container, tree, depth).await;
    let arena = tree.lock().await;
    let root = arena.root();
    let found = arena
        .get_node(root)
        .filter(|node| node.data.id == id)
        .map(|_| root)
        .or_else(|| arena.descendant(root, id));
    found
        .and_then(|idx| arena.get_node(idx).map(|node| (idx, node.data.clone())))
        .ok_or_else(|| CliError::NotFound(format!("node '{id}' within {depth} levels of {}", tree.key)))
}

#[instrument(skip(container, tree))]
async fn _tree(container: &ServiceContainer, tree: &TreeResult, depth: u32) -> CliResult<()> {
    let loaded = expand(container, tree, depth).await;
    let arena = tree.lock().await;
    output::info(&arena.to_tree_string());
    debug!(loaded, nodes = arena.len(), depth = arena.depth(), "tree rendered");
    Ok(())
}

#[instrument(skip(container, tree))]
async fn _children(
    container: &ServiceContainer,
    tree: &TreeResult,
    id: &str,
    depth: u32,
) -> CliResult<()> {
    let (idx, data) = locate(container, tree, id, depth).await?;
    let children = container
        .tree
        .load_node_children(tree, idx, tree.section())
        .await?;

    output::header(&data);
    let arena = tree.lock().await;
    if children.is_empty() {
        output::detail("(no children)");
    }
    for child in children {
        if let Some(node) = arena.get_node(child) {
            output::detail(&format!("{}  {}", node.data, node.data.route_path));
        }
    }
    Ok(())
}

#[instrument(skip(container, tree))]
async fn _find(
    container: &ServiceContainer,
    tree: &TreeResult,
    id: &str,
    depth: u32,
) -> CliResult<()> {
    let (idx, data) = locate(container, tree, id, depth).await?;
    let arena = tree.lock().await;

    let mut path: Vec<String> = arena
        .ancestors(idx)
        .filter_map(|a| arena.get_node(a).map(|n| n.data.name.clone()))
        .collect();
    path.reverse();

    output::header(&data);
    output::action("route", &data.route_path);
    if let Some(node) = arena.get_node(idx) {
        output::action("level", &node.level);
    }
    output::action("path", &path.join(" / "));
    match arena.tree_root(idx).and_then(|r| arena.get_node(r)) {
        Some(root) => output::action("tree root", &root.data),
        None => output::warning("no tree root marker among ancestors"),
    }
    Ok(())
}

#[instrument(skip(container, tree))]
async fn _menu(
    container: &ServiceContainer,
    tree: &TreeResult,
    id: &str,
    alias: Option<&str>,
    depth: u32,
) -> CliResult<()> {
    let (_, data) = locate(container, tree, id, depth).await?;

    let items = match alias {
        Some(alias) => {
            let item = container
                .menu
                .get_menu_item_by_alias(MenuItemQuery {
                    tree_node: &data,
                    menu_item_alias: alias,
                })
                .await?
                .ok_or_else(|| CliError::NotFound(format!("menu item '{alias}' on {data}")))?;
            vec![item]
        }
        None => container.menu.get_menu(MenuQuery { tree_node: &data }).await?,
    };

    output::header(&data);
    for item in items {
        if item.separator {
            output::detail("---");
        }
        output::detail(&format!("{:<16} {:<24} {}", item.alias, item.name, item.cssclass));
    }
    Ok(())
}
