//! Multiple-choice questions that reveal their answer once an option is picked.

use tracing::debug;

use crate::dom::{Dom, Selector};

const QUESTION_CLASS: &str = "quiz-question";
const ANSWER_CLASS: &str = "quiz-answer";
const SHOW_CLASS: &str = "show";

const SELECTED_BACKGROUND: &str = "var(--bg-tertiary)";
const SELECTED_BORDER: &str = "var(--color-brand)";

/// Clickable answer options.
pub fn quiz_options() -> Selector {
    Selector::within(Selector::Class("quiz-options"), Selector::Tag("li"))
}

/// Highlights `option`, clears its siblings, and reveals the question's answer.
/// Returns whether an answer block was found.
pub fn select_option<D: Dom>(dom: &D, option: &D::Node) -> bool {
    if let Some(list) = dom.parent(option) {
        for sibling in dom.query_all(&list, &Selector::Tag("li")) {
            dom.set_style(&sibling, "background-color", "");
            dom.set_style(&sibling, "border-color", "");
        }
    }
    dom.set_style(option, "background-color", SELECTED_BACKGROUND);
    dom.set_style(option, "border-color", SELECTED_BORDER);

    let answer = dom
        .closest(option, &Selector::Class(QUESTION_CLASS))
        .and_then(|question| dom.query(&question, &Selector::Class(ANSWER_CLASS)));
    match answer {
        Some(answer) => {
            dom.add_class(&answer, SHOW_CLASS);
            debug!("Quiz answer revealed");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{el, Document};

    fn question(doc: &Document, prompt: &str) {
        doc.append(
            &doc.body_id(),
            el("div")
                .class(QUESTION_CLASS)
                .child(el("p").text(prompt))
                .child(
                    el("ul")
                        .class("quiz-options")
                        .child(el("li").text("A"))
                        .child(el("li").text("B"))
                        .child(el("li").text("C")),
                )
                .child(el("div").class(ANSWER_CLASS).text("Answer: B")),
        );
    }

    #[test]
    fn test_select_highlights_only_choice() {
        let doc = Document::new();
        question(&doc, "Which?");
        let options = doc.find_all(&quiz_options());

        select_option(&doc, &options[0]);
        select_option(&doc, &options[1]);

        assert_eq!(doc.style(&options[0], "background-color"), "");
        assert_eq!(doc.style(&options[1], "background-color"), SELECTED_BACKGROUND);
        assert_eq!(doc.style(&options[1], "border-color"), SELECTED_BORDER);
        assert_eq!(doc.style(&options[2], "border-color"), "");
    }

    #[test]
    fn test_select_reveals_own_answer_only() {
        let doc = Document::new();
        question(&doc, "First?");
        question(&doc, "Second?");
        let options = doc.find_all(&quiz_options());
        let answers = doc.find_all(&Selector::Class(ANSWER_CLASS));

        assert!(select_option(&doc, &options[4]));

        assert!(!doc.has_class(&answers[0], SHOW_CLASS));
        assert!(doc.has_class(&answers[1], SHOW_CLASS));
    }

    #[test]
    fn test_select_without_answer_block() {
        let doc = Document::new();
        doc.append(
            &doc.body_id(),
            el("ul").class("quiz-options").child(el("li").text("only")),
        );
        let option = doc.find(&quiz_options()).unwrap();
        assert!(!select_option(&doc, &option));
        assert_eq!(doc.style(&option, "background-color"), SELECTED_BACKGROUND);
    }
}
