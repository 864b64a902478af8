use anyhow::{Context, Result};
use shell_config::ShellConfig;
use shell_dom::{Dom, DocumentFixture, MemoryDom, NodeSpec};
use shell_scene::{AppShell, ShellEvent};

/// Built-in page with a navigation panel and an app library grid.
fn sample_page() -> MemoryDom {
    let mut dom = MemoryDom::new();
    dom.set_host("portal.example.com");
    dom.set_referrer("https://portal.example.com/apps/");

    let body = dom.body();
    dom.append(
        body,
        &NodeSpec::new("header")
            .with_class("tethys-app-header")
            .with_child(NodeSpec::new("a").with_class("toggle-nav")),
    );
    dom.append(
        body,
        &NodeSpec::new("div")
            .with_id("app-content-wrapper")
            .with_child(NodeSpec::new("nav").with_id("app-navigation"))
            .with_child(
                NodeSpec::new("div")
                    .with_id("app-content")
                    .with_height(640.0),
            ),
    );
    dom.append(body, &NodeSpec::new("div").with_class("header-wrapper"));
    dom.append(body, &NodeSpec::new("div").with_id("app-curtain"));

    let mut list = NodeSpec::new("div").with_id("app-list").with_width(960.0);
    for (slug, height) in [("dam-break", 220.0), ("gizmo", 180.0), ("hydro", 260.0)] {
        list = list.with_child(
            NodeSpec::new("div")
                .with_class("app-container")
                .with_attribute("href", format!("/apps/{slug}/"))
                .with_height(height)
                .with_child(NodeSpec::new("img").with_class("app-icon").pending()),
        );
    }
    dom.append(body, &list);
    dom
}

fn load_document(config: &ShellConfig) -> Result<MemoryDom> {
    match &config.demo.fixture {
        Some(path) => {
            let fixture = DocumentFixture::load(path)
                .with_context(|| format!("loading fixture {}", path.display()))?;
            Ok(MemoryDom::from_fixture(&fixture))
        }
        None => Ok(sample_page()),
    }
}

fn flush(shell: &mut AppShell<MemoryDom>) -> Result<()> {
    for notice in shell.drain_notices() {
        log::info!("{}", serde_json::to_string(&notice)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let config = ShellConfig::load_or_default();
    let dom = load_document(&config)?;
    let mut shell = AppShell::initialize(config, dom)?;
    flush(&mut shell)?;

    shell.toggle()?;
    shell.dom_mut().set_window_size(1280.0, 480.0);
    shell.handle_event(ShellEvent::Resize)?;
    flush(&mut shell)?;

    for image in shell.dom().select("#app-list img") {
        shell.dom_mut().set_image_complete(image, true);
        shell.handle_event(ShellEvent::ImageSettled { element: image })?;
    }
    flush(&mut shell)?;

    if let Some(tile) = shell.dom().first("#app-list .app-container") {
        shell.handle_event(ShellEvent::Click { target: tile })?;
    }
    let delay = shell.config().handoff.delay_ms;
    shell.advance(delay)?;
    flush(&mut shell)?;

    for url in shell.dom().navigations() {
        log::info!("navigated to {url}");
    }
    shell.teardown();
    flush(&mut shell)
}
