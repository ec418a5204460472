//! Integration tests for MenuService: icon translation and alias lookup.

mod common;

use std::sync::atomic::Ordering;

use common::{fixture, ScriptedSource};
use navtree::application::services::{MenuItemQuery, MenuQuery};
use navtree::application::ApplicationError;
use navtree::domain::{MenuItem, NodeData};

fn data(id: &str) -> NodeData {
    NodeData {
        id: id.to_string(),
        name: format!("Node {id}"),
        section: "content".into(),
        icon: None,
        route_path: format!("content/edit/{id}"),
        menu_url: None,
        meta_data: Default::default(),
    }
}

fn source() -> ScriptedSource {
    let mut separated = MenuItem::new("delete", "Delete", ".sprDelete");
    separated.separator = true;
    ScriptedSource::new().with_menu(
        "1051",
        vec![
            MenuItem::new("create", "Create", ".sprNew"),
            separated,
            MenuItem::new("sort", "Sort", "icon-navigation-vertical"),
            MenuItem::new("create", "Create again", "icon-add"),
        ],
    )
}

#[tokio::test]
async fn given_legacy_icons_when_get_menu_then_translated_in_order() {
    let f = fixture(source());
    let node = data("1051");

    let menu = f.menu.get_menu(MenuQuery { tree_node: &node }).await.unwrap();

    let icons: Vec<&str> = menu.iter().map(|i| i.cssclass.as_str()).collect();
    assert_eq!(icons, ["add", "remove", "icon-navigation-vertical", "icon-add"]);
    assert!(menu[1].separator);
}

#[tokio::test]
async fn given_alias_when_get_menu_item_by_alias_then_first_match_returned() {
    let f = fixture(source());
    let node = data("1051");

    let item = f
        .menu
        .get_menu_item_by_alias(MenuItemQuery {
            tree_node: &node,
            menu_item_alias: "create",
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(item.name, "Create");
    assert_eq!(item.cssclass, "add");
}

#[tokio::test]
async fn given_unknown_alias_when_get_menu_item_by_alias_then_none() {
    let f = fixture(source());
    let node = data("1051");

    let item = f
        .menu
        .get_menu_item_by_alias(MenuItemQuery {
            tree_node: &node,
            menu_item_alias: "publish",
        })
        .await
        .unwrap();

    assert!(item.is_none());
}

#[tokio::test]
async fn given_empty_alias_when_get_menu_item_by_alias_then_invalid_argument_without_fetch() {
    let f = fixture(source());
    let node = data("1051");

    let result = f
        .menu
        .get_menu_item_by_alias(MenuItemQuery {
            tree_node: &node,
            menu_item_alias: "",
        })
        .await;

    assert!(result.unwrap_err().is_invalid_argument());
    assert_eq!(f.source.menu_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_node_without_id_when_get_menu_then_invalid_argument() {
    let f = fixture(source());
    let node = data("");

    let result = f.menu.get_menu(MenuQuery { tree_node: &node }).await;

    assert!(result.unwrap_err().is_invalid_argument());
}

#[tokio::test]
async fn given_source_failure_when_get_menu_then_source_error() {
    let f = fixture(source());
    let node = data("404");

    let result = f.menu.get_menu(MenuQuery { tree_node: &node }).await;

    assert!(matches!(result, Err(ApplicationError::Source(_))));
}
