use std::fs;

use anyhow::Result;
use shell_dom::{Dom, DocumentFixture, MemoryDom, NodeSpec};

fn library_page() -> MemoryDom {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    dom.append(
        body,
        &NodeSpec::new("div").with_id("app-list").with_width(960.0).with_child(
            NodeSpec::new("div")
                .with_class("app-container")
                .with_attribute("href", "/apps/first/")
                .with_child(NodeSpec::new("img").pending()),
        ),
    );
    dom.append(body, &NodeSpec::new("div").with_class("app-container"));
    dom
}

#[test]
fn selects_in_document_order_and_scopes_to_root() -> Result<()> {
    let dom = library_page();
    let all = dom.select(".app-container");
    assert_eq!(all.len(), 2);

    let container = dom.first("#app-list").expect("container exists");
    let scoped = dom.select_within(container, ".app-container");
    assert_eq!(scoped, vec![all[0]]);
    assert_eq!(dom.attribute(scoped[0], "href").as_deref(), Some("/apps/first/"));
    Ok(())
}

#[test]
fn empty_selections_are_no_ops() -> Result<()> {
    let mut dom = library_page();
    dom.add_class_all("#does-not-exist", "show-nav");
    dom.set_style_all(".nothing", "height", "100%");
    dom.remove_all(".nothing");
    assert!(!dom.exists("#does-not-exist"));
    assert!(!dom.any_has_class("#does-not-exist", "show-nav"));
    assert!(dom.select("a:hover").is_empty());
    assert!(dom.select("div[").is_empty());
    Ok(())
}

#[test]
fn selector_forms_match_like_query_selector_all() -> Result<()> {
    let dom = library_page();
    let container = dom.first("#app-list").expect("container exists");
    let tiles = dom.select(".app-container");

    assert_eq!(dom.select("#app-list .app-container"), vec![tiles[0]]);
    assert_eq!(dom.select("#app-list > .app-container"), vec![tiles[0]]);
    assert!(dom.select("#app-list > img").is_empty());
    assert_eq!(dom.select("#app-list img").len(), 1);
    assert_eq!(dom.select("div[href]"), vec![tiles[0]]);
    assert_eq!(dom.select("[href=\"/apps/first/\"]"), vec![tiles[0]]);
    assert_eq!(dom.select("#missing, #app-list"), vec![container]);
    assert_eq!(dom.select("#app-list + .app-container"), vec![tiles[1]]);
    assert_eq!(dom.select("body > :first-child"), vec![container]);
    assert!(dom.matches(dom.body(), "*"));
    assert!(dom.matches(tiles[1], "DIV.app-container"));
    assert!(!dom.matches(tiles[1], "span.app-container"));
    Ok(())
}

#[test]
fn removed_subtrees_are_unreachable() -> Result<()> {
    let mut dom = library_page();
    let container = dom.first("#app-list").expect("container exists");
    let image = dom.first("img").expect("image exists");

    dom.remove(container);
    assert!(!dom.is_attached(image));
    assert!(dom.select("img").is_empty());
    assert!(dom.select_within(container, "img").is_empty());
    assert_eq!(dom.select(".app-container").len(), 1);
    Ok(())
}

#[test]
fn widths_fill_parent_and_closest_walks_up() -> Result<()> {
    let dom = library_page();
    let image = dom.first("img").expect("image exists");
    assert_eq!(dom.measure_width(image), 960.0);
    assert_eq!(dom.measure_width(dom.body()), 1280.0);

    let tile = dom.closest(image, ".app-container").expect("inside a tile");
    assert!(dom.has_class(tile, "app-container"));
    assert!(dom.closest(dom.body(), ".app-container").is_none());
    assert!(!dom.image_complete(image));
    Ok(())
}

#[test]
fn classes_and_styles_behave_like_the_browser() -> Result<()> {
    let mut dom = library_page();
    let body = dom.body();

    dom.add_class(body, "with-transition");
    dom.add_class(body, "with-transition");
    assert_eq!(dom.classes(body), ["with-transition".to_string()]);
    dom.remove_class(body, "with-transition");
    assert!(dom.classes(body).is_empty());

    dom.set_style(body, "height", "auto");
    assert_eq!(dom.style(body, "height").as_deref(), Some("auto"));
    dom.set_style(body, "height", "");
    assert_eq!(dom.style(body, "height"), None);
    Ok(())
}

#[test]
fn loads_fixture_from_disk() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("page.json");
    fs::write(
        &path,
        r##"{
            "window": { "width": 1024, "height": 700 },
            "referrer": "https://example.com/apps/",
            "host": "example.com",
            "body": [
                { "tag": "div", "id": "app-content", "height": 420 }
            ]
        }"##,
    )?;

    let fixture = DocumentFixture::load(&path)?;
    let mut dom = MemoryDom::from_fixture(&fixture);
    let content = dom.first("#app-content").expect("content exists");
    assert_eq!(dom.measure_height(content), 420.0);
    assert_eq!(dom.window_height(), 700.0);
    assert_eq!(dom.location_host(), "example.com");
    assert_eq!(dom.referrer(), "https://example.com/apps/");

    dom.navigate("/apps/");
    assert_eq!(dom.navigations(), ["/apps/".to_string()]);
    Ok(())
}
