//! Live filtering of chapter cards with a singleton "no results" notice.
//!
//! Every input event runs [`SearchFilter::on_query_change`] to completion.
//! Cards are enumerated once when the filter attaches; afterwards only their
//! `display` style and `fade-in` class change, never their order. The notice
//! exists exactly when the normalized query is non-empty and no card matches.

use tracing::{debug, warn};

use crate::dom::{Dom, Selector};
use crate::error::Result;

pub const SEARCH_INPUT_ID: &str = "searchInput";
pub const CARDS_CONTAINER_ID: &str = "chaptersGrid";
pub const NOTICE_ID: &str = "noResultsMessage";

const CARD_CLASS: &str = "chapter-card";
const TITLE_CLASS: &str = "chapter-title";
const DESCRIPTION_CLASS: &str = "chapter-description";
const TAG_CLASS: &str = "topic-tag";
const NOTICE_CLASS: &str = "no-results";
const FADE_IN_CLASS: &str = "fade-in";

/// A search query as typed, alongside its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    needle: String,
}

impl Query {
    /// Case-folds and trims `raw`.
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            needle: raw.to_lowercase().trim().to_string(),
        }
    }

    /// The input exactly as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Whitespace-only input counts as empty.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Plain substring containment. The empty query matches everything.
    pub fn matches(&self, searchable: &str) -> bool {
        searchable.contains(&self.needle)
    }
}

/// Case-folded title, description and tags joined by single spaces.
pub fn searchable_text(title: &str, description: &str, tags: &[String]) -> String {
    let tags = tags
        .iter()
        .map(|tag| tag.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} {} {}",
        title.to_lowercase(),
        description.to_lowercase(),
        tags
    )
}

/// Indices of the entries of `searchable` matched by `query`, in order.
pub fn visible_indices(searchable: &[String], query: &Query) -> Vec<usize> {
    searchable
        .iter()
        .enumerate()
        .filter(|(_, text)| query.matches(text))
        .map(|(idx, _)| idx)
        .collect()
}

/// Notice text shown when nothing matches. Echoes the literal input.
pub fn no_results_message(raw: &str) -> String {
    format!("No chapters found for \"{raw}\". Try a different search term.")
}

/// What a single filter pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Indices of visible cards, in page order.
    pub visible: Vec<usize>,
    /// Text of the notice, when one is shown.
    pub notice: Option<String>,
}

impl FilterOutcome {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

#[derive(Debug, Clone)]
struct Card<N> {
    node: N,
    searchable: String,
}

/// Card filter bound to one cards container.
#[derive(Debug)]
pub struct SearchFilter<D: Dom> {
    container: D::Node,
    cards: Vec<Card<D::Node>>,
}

impl<D: Dom> SearchFilter<D> {
    /// Binds to `#chaptersGrid`. Pages without the grid have no search.
    pub fn attach(dom: &D) -> Option<Self> {
        let container = dom.element_by_id(CARDS_CONTAINER_ID)?;
        Some(Self::with_container(dom, container))
    }

    /// Enumerates the `.chapter-card` elements under `container`.
    pub fn with_container(dom: &D, container: D::Node) -> Self {
        let cards: Vec<_> = dom
            .query_all(&container, &Selector::Class(CARD_CLASS))
            .into_iter()
            .map(|node| {
                let title = facet_text(dom, &node, TITLE_CLASS);
                let description = facet_text(dom, &node, DESCRIPTION_CLASS);
                let tags: Vec<String> = dom
                    .query_all(&node, &Selector::Class(TAG_CLASS))
                    .iter()
                    .map(|tag| dom.text(tag))
                    .collect();
                Card {
                    searchable: searchable_text(&title, &description, &tags),
                    node,
                }
            })
            .collect();

        debug!(cards = cards.len(), "Search filter attached");
        Self { container, cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Applies `raw` to every card and reconciles the notice.
    pub fn on_query_change(&mut self, dom: &D, raw: &str) -> FilterOutcome {
        let query = Query::new(raw);

        let mut visible = Vec::new();
        for (idx, card) in self.cards.iter().enumerate() {
            if query.matches(&card.searchable) {
                dom.set_style(&card.node, "display", "flex");
                dom.add_class(&card.node, FADE_IN_CLASS);
                visible.push(idx);
            } else {
                dom.set_style(&card.node, "display", "none");
            }
        }

        let notice = if visible.is_empty() && !query.is_empty() {
            let message = no_results_message(query.raw());
            if let Err(e) = self.show_notice(dom, &message) {
                warn!(error = %e, "Failed to insert no-results notice");
            }
            Some(message)
        } else {
            Self::clear_notice(dom);
            None
        };

        debug!(
            query = %query.needle(),
            visible = visible.len(),
            total = self.cards.len(),
            "Cards filtered"
        );

        FilterOutcome { visible, notice }
    }

    /// Whether the notice is currently in the document.
    pub fn notice_present(dom: &D) -> bool {
        dom.element_by_id(NOTICE_ID).is_some()
    }

    fn show_notice(&self, dom: &D, message: &str) -> Result<()> {
        if let Some(existing) = dom.element_by_id(NOTICE_ID) {
            let target = dom
                .query(&existing, &Selector::Tag("p"))
                .unwrap_or(existing);
            dom.set_text(&target, message);
            return Ok(());
        }

        let notice = dom.create_element("div")?;
        dom.set_attribute(&notice, "id", NOTICE_ID);
        dom.set_attribute(&notice, "class", NOTICE_CLASS);
        let paragraph = dom.create_element("p")?;
        dom.set_text(&paragraph, message);
        dom.append_child(&notice, &paragraph)?;
        dom.append_child(&self.container, &notice)
    }

    fn clear_notice(dom: &D) {
        if let Some(notice) = dom.element_by_id(NOTICE_ID) {
            dom.remove(&notice);
        }
    }
}

fn facet_text<D: Dom>(dom: &D, card: &D::Node, class: &'static str) -> String {
    dom.query(card, &Selector::Class(class))
        .map(|node| dom.text(&node))
        .unwrap_or_default()
}
