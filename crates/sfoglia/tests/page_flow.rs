//! End-to-end page behavior against the in-memory document, driven the way
//! the browser binding drives it: through the binding table and
//! `Page::dispatch`.

use sfoglia::{
    bindings, el, Action, Binding, Document, Dom, EffectsProfile, MemoryStore, NodeId, Page,
    PreferenceStore, SearchFilter, Selector, Theme, Trigger, UiEvent,
};

fn card(title: &str, description: &str, tags: &[&str]) -> sfoglia::ElementSpec {
    let mut spec = el("a")
        .class("chapter-card")
        .child(el("h3").class("chapter-title").text(title))
        .child(el("p").class("chapter-description").text(description));
    for tag in tags {
        spec = spec.child(el("span").class("topic-tag").text(tag));
    }
    spec
}

fn index_page() -> Document {
    let doc = Document::new();
    let body = doc.body_id();
    doc.append(
        &body,
        el("nav")
            .class("navbar")
            .child(el("button").id("themeToggle"))
            .child(el("button").id("mobileMenuToggle"))
            .child(el("ul").class("nav-links").child(el("a").class("nav-link").attr("href", "#about"))),
    );
    doc.append(&body, el("input").id("searchInput"));
    doc.append(
        &body,
        el("div")
            .id("chaptersGrid")
            .child(card("Storage", "Disks and filesystems", &["LVM", "XFS"]))
            .child(card("Networking", "Zones and services", &["firewalld"])),
    );
    doc.append(&body, el("section").id("about"));
    doc.set_viewport(0.0, 800.0, 2400.0);
    doc
}

fn displayed(doc: &Document) -> Vec<bool> {
    doc.find_all(&Selector::Class("chapter-card"))
        .iter()
        .map(|c| doc.style(c, "display") != "none")
        .collect()
}

fn resolve(doc: &Document, binding: &Binding) -> Vec<NodeId> {
    match &binding.trigger {
        Trigger::Id(id) => doc.element_by_id(id).into_iter().collect(),
        Trigger::Each(selector) => doc.find_all(selector),
        Trigger::Document | Trigger::Window => Vec::new(),
    }
}

fn type_query(page: &mut Page<Document, MemoryStore>, doc: &Document, value: &str) {
    page.dispatch(
        doc,
        doc,
        Action::Search,
        &UiEvent::Input {
            value: value.to_string(),
        },
    );
}

// ========== Search scenarios ==========

#[test]
fn test_typing_filters_and_clears() {
    let doc = index_page();
    let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

    type_query(&mut page, &doc, "lvm");
    assert_eq!(displayed(&doc), [true, false]);
    assert!(!SearchFilter::notice_present(&doc));

    type_query(&mut page, &doc, "zzz-no-match");
    assert_eq!(displayed(&doc), [false, false]);
    let notice = doc.element_by_id("noResultsMessage").unwrap();
    assert!(doc.text(&notice).contains("zzz-no-match"));

    type_query(&mut page, &doc, "   ");
    assert_eq!(displayed(&doc), [true, true]);
    assert!(!SearchFilter::notice_present(&doc));
}

#[test]
fn test_repeated_misses_keep_one_notice() {
    let doc = index_page();
    let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);
    let grid = doc.element_by_id("chaptersGrid").unwrap();

    for query in ["q", "qq", "qqq", "qqq"] {
        type_query(&mut page, &doc, query);
    }

    assert_eq!(doc.query_all(&grid, &Selector::Class("no-results")).len(), 1);
    let notice = doc.element_by_id("noResultsMessage").unwrap();
    assert!(doc.text(&notice).contains("\"qqq\""));
}

// ========== Wiring ==========

#[test]
fn test_binding_table_resolves_against_index() {
    let doc = index_page();
    let _page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);

    let table = bindings(EffectsProfile::Basic);
    let search = table.iter().find(|b| b.action == Action::Search).unwrap();
    assert_eq!(resolve(&doc, search), doc.element_by_id("searchInput").into_iter().collect::<Vec<_>>());

    let close = table.iter().find(|b| b.action == Action::CloseMenu).unwrap();
    assert_eq!(resolve(&doc, close).len(), 1);

    let top = table.iter().find(|b| b.action == Action::ScrollToTop).unwrap();
    assert_eq!(resolve(&doc, top).len(), 1, "scroll-to-top installed by init");
}

#[test]
fn test_theme_toggle_persists() {
    let doc = index_page();
    let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);
    let toggle = doc.element_by_id("themeToggle").unwrap();

    page.dispatch(
        &doc,
        &doc,
        Action::ToggleTheme,
        &UiEvent::Click {
            target: toggle,
            current: Some(toggle),
            x: 0.0,
            y: 0.0,
        },
    );

    assert_eq!(page.theme().current(&doc), Theme::Dark);
    assert_eq!(page.theme().store().load("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(doc.text(&toggle), "☀️");
}

#[test]
fn test_menu_closes_on_outside_click() {
    let doc = index_page();
    let mut page = Page::init(&doc, &doc, MemoryStore::new(), EffectsProfile::Basic);
    let toggle = doc.element_by_id("mobileMenuToggle").unwrap();
    let panel = doc.find(&Selector::Class("nav-links")).unwrap();
    let outside = doc.element_by_id("about").unwrap();

    let click = |target| UiEvent::Click {
        target,
        current: None,
        x: 0.0,
        y: 0.0,
    };

    page.dispatch(&doc, &doc, Action::ToggleMenu, &click(toggle));
    assert!(doc.has_class(&panel, "active"));

    page.dispatch(&doc, &doc, Action::OutsideClick, &click(outside));
    assert!(!doc.has_class(&panel, "active"));
}
