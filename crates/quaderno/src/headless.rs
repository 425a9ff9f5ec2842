//! Runs the page's search filter without a browser.
//!
//! The index is mirrored into an in-memory [`Document`] with the same
//! structure `html::render_index` emits for the cards, so the results are the
//! ones a reader would see typing the same queries.

use sfoglia::search::{CARDS_CONTAINER_ID, SEARCH_INPUT_ID};
use sfoglia::{el, Document, FilterOutcome, SearchFilter};

use crate::types::{Chapter, Guide};

/// The outcome of one query, resolved back to chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    pub query: String,
    /// Slugs of the visible chapters, in page order
    pub visible: Vec<String>,
    pub notice: Option<String>,
}

/// Headless copy of the index page's search area.
pub struct HeadlessIndex<'a> {
    guide: &'a Guide,
    doc: Document,
    filter: SearchFilter<Document>,
}

impl<'a> HeadlessIndex<'a> {
    pub fn new(guide: &'a Guide) -> Self {
        let doc = Document::new();
        let body = doc.body_id();
        doc.append(&body, el("input").id(SEARCH_INPUT_ID));

        let mut grid = el("div").id(CARDS_CONTAINER_ID).class("chapters-grid");
        for chapter in &guide.chapters {
            grid = grid.child(card(chapter));
        }
        let grid = doc.append(&body, grid);

        let filter = SearchFilter::with_container(&doc, grid);
        Self { guide, doc, filter }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Feed one input value to the filter, exactly like an `input` event.
    pub fn query(&mut self, raw: &str) -> QueryReport {
        let FilterOutcome { visible, notice } = self.filter.on_query_change(&self.doc, raw);
        QueryReport {
            query: raw.to_string(),
            visible: visible
                .into_iter()
                .filter_map(|idx| self.guide.chapters.get(idx))
                .map(|chapter| chapter.slug.clone())
                .collect(),
            notice,
        }
    }
}

fn card(chapter: &Chapter) -> sfoglia::ElementSpec {
    let mut spec = el("a")
        .class("chapter-card")
        .attr("href", &chapter.file_name())
        .child(el("h3").class("chapter-title").text(&chapter.title))
        .child(el("p").class("chapter-description").text(&chapter.description));
    for topic in &chapter.topics {
        spec = spec.child(el("span").class("topic-tag").text(topic));
    }
    spec
}

/// Run `queries` one after another against a fresh index.
pub fn run_queries<S: AsRef<str>>(guide: &Guide, queries: &[S]) -> Vec<QueryReport> {
    let mut index = HeadlessIndex::new(guide);
    queries.iter().map(|q| index.query(q.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::sample_guide;
    use sfoglia::Dom;

    #[test]
    fn test_query_matches_tag() {
        let guide = sample_guide();
        let reports = run_queries(&guide, &["lvm"]);

        assert_eq!(reports[0].visible, vec!["storage".to_string()]);
        assert_eq!(reports[0].notice, None);
    }

    #[test]
    fn test_query_without_match() {
        let guide = sample_guide();
        let reports = run_queries(&guide, &["zzz-no-match"]);

        assert!(reports[0].visible.is_empty());
        assert!(reports[0].notice.as_deref().unwrap().contains("zzz-no-match"));
    }

    #[test]
    fn test_blank_query_shows_everything() {
        let guide = sample_guide();
        let reports = run_queries(&guide, &["   "]);

        assert_eq!(reports[0].visible, vec!["storage", "networking"]);
        assert_eq!(reports[0].notice, None);
    }

    #[test]
    fn test_sequence_clears_notice() {
        let guide = sample_guide();
        let mut index = HeadlessIndex::new(&guide);

        index.query("nothing");
        assert!(SearchFilter::notice_present(index.document()));

        let report = index.query("");
        assert_eq!(report.visible.len(), 2);
        assert!(!SearchFilter::notice_present(index.document()));
    }

    #[test]
    fn test_cards_hidden_in_document() {
        let guide = sample_guide();
        let mut index = HeadlessIndex::new(&guide);
        index.query("firewalld");

        let doc = index.document();
        let cards = doc.find_all(&sfoglia::Selector::Class("chapter-card"));
        assert_eq!(doc.style(&cards[0], "display"), "none");
        assert_eq!(doc.style(&cards[1], "display"), "flex");
    }
}
