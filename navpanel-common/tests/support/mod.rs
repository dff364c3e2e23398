use navpanel_common::testing::{FakeDom, NodeId};

/// Initialize tracing for tests with proper test output handling
#[allow(dead_code)]
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .try_init();
}

/// Page with a toggle button and a navigation panel holding one link,
/// plus an unrelated `main` element.
#[allow(dead_code)]
pub struct Page {
    pub dom: FakeDom,
    pub toggle: NodeId,
    pub toggle_icon: NodeId,
    pub panel: NodeId,
    pub link: NodeId,
    pub main: NodeId,
}

#[allow(dead_code)]
pub fn page() -> Page {
    let dom = FakeDom::new();
    let body = dom.body();
    let header = dom.append(body, "header", &[]);
    let toggle = dom.append(
        header,
        "button",
        &[("id", "nav-btn"), ("data-nav-toggle", "")],
    );
    let toggle_icon = dom.append(toggle, "span", &[("class", "icon")]);
    let panel = dom.append(
        header,
        "div",
        &[("id", "nav-panel"), ("data-nav-panel", "")],
    );
    let link = dom.append(panel, "a", &[("href", "/about")]);
    let main = dom.append(body, "main", &[]);
    Page {
        dom,
        toggle,
        toggle_icon,
        panel,
        link,
        main,
    }
}
