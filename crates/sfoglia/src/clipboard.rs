//! Copy buttons for code blocks.
//!
//! Writing to the clipboard is an explicit async operation returning a
//! `Result`; the button label is a pure function of that result and the time
//! elapsed since it arrived (see [`feedback`]).

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::dom::{Dom, Selector};
use crate::error::Result;

/// How long the success/failure label stays up.
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

const COPY_BUTTON_CLASS: &str = "copy-code-btn";

/// System clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> impl Future<Output = Result<()>>;
}

/// Visual state of a copy button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied,
    Failed,
}

impl CopyState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "📋 Copy",
            Self::Copied => "✅ Copied!",
            Self::Failed => "❌ Failed",
        }
    }

    fn background(self) -> &'static str {
        match self {
            Self::Copied => "var(--color-success)",
            Self::Idle | Self::Failed => "var(--bg-secondary)",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Copied => "white",
            Self::Idle | Self::Failed => "var(--text-primary)",
        }
    }
}

/// Button state `elapsed` after `outcome` arrived; `None` means no copy yet.
pub fn feedback(outcome: Option<&Result<()>>, elapsed: Duration) -> CopyState {
    match outcome {
        Some(_) if elapsed >= FEEDBACK_DURATION => CopyState::Idle,
        Some(Ok(())) => CopyState::Copied,
        Some(Err(_)) => CopyState::Failed,
        None => CopyState::Idle,
    }
}

#[derive(Debug, Clone)]
struct CodeBlock<N> {
    button: N,
    text: String,
}

/// One copy button per `pre` block.
#[derive(Debug)]
pub struct CodeCopy<D: Dom> {
    blocks: Vec<CodeBlock<D::Node>>,
}

// Hosts clone the set to use it across an `await`.
impl<D: Dom> Clone for CodeCopy<D> {
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks.clone(),
        }
    }
}

impl<D: Dom> CodeCopy<D> {
    /// Adds a button to every `pre`. The copied text is the block's `code`
    /// child when present, otherwise the block's own text; either way it is
    /// captured before the button is added.
    pub fn install(dom: &D) -> Result<Self> {
        let mut blocks = Vec::new();
        for pre in dom.find_all(&Selector::Tag("pre")) {
            let text = dom
                .query(&pre, &Selector::Tag("code"))
                .map(|code| dom.text(&code))
                .unwrap_or_else(|| dom.text(&pre));

            let button = dom.create_element("button")?;
            dom.set_attribute(&button, "class", COPY_BUTTON_CLASS);
            dom.set_attribute(&button, "aria-label", "Copy code to clipboard");
            dom.set_attribute(&button, "type", "button");
            dom.append_child(&pre, &button)?;

            let block = CodeBlock { button, text };
            render_state(dom, &block.button, CopyState::Idle);
            blocks.push(block);
        }
        debug!(blocks = blocks.len(), "Copy buttons installed");
        Ok(Self { blocks })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &D::Node> {
        self.blocks.iter().map(|b| &b.button)
    }

    /// Index of the block owning `button`.
    pub fn index_of(&self, button: &D::Node) -> Option<usize> {
        self.blocks.iter().position(|b| &b.button == button)
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.blocks.get(index).map(|b| b.text.as_str())
    }

    /// Writes block `index` to the clipboard. Failures are reported, never
    /// propagated further than the caller's feedback.
    pub async fn copy<C: Clipboard>(&self, clipboard: &C, index: usize) -> Result<()> {
        let Some(text) = self.text(index) else {
            return Ok(());
        };
        let outcome = clipboard.write_text(text).await;
        if let Err(e) = &outcome {
            warn!(error = %e, block = index, "Copy to clipboard failed");
        }
        outcome
    }

    pub fn render(&self, dom: &D, index: usize, state: CopyState) {
        if let Some(block) = self.blocks.get(index) {
            render_state(dom, &block.button, state);
        }
    }
}

fn render_state<D: Dom>(dom: &D, button: &D::Node, state: CopyState) {
    dom.set_text(button, state.label());
    dom.set_style(button, "background-color", state.background());
    dom.set_style(button, "color", state.color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{el, Document};
    use crate::error::Error;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeClipboard {
        written: RefCell<Vec<String>>,
        reject: bool,
    }

    impl Clipboard for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<()> {
            if self.reject {
                return Err(Error::Clipboard("permission denied".to_string()));
            }
            self.written.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn page() -> Document {
        let doc = Document::new();
        doc.append(
            &doc.body_id(),
            el("pre").child(el("code").text("lvcreate -L 1G -n data vg0")),
        );
        doc.append(&doc.body_id(), el("pre").text("systemctl enable --now sshd"));
        doc
    }

    // ========== feedback tests ==========

    #[test]
    fn test_feedback_before_copy() {
        assert_eq!(feedback(None, Duration::ZERO), CopyState::Idle);
    }

    #[test]
    fn test_feedback_success_then_revert() {
        let ok: Result<()> = Ok(());
        assert_eq!(feedback(Some(&ok), Duration::ZERO), CopyState::Copied);
        assert_eq!(feedback(Some(&ok), Duration::from_millis(1999)), CopyState::Copied);
        assert_eq!(feedback(Some(&ok), FEEDBACK_DURATION), CopyState::Idle);
    }

    #[test]
    fn test_feedback_failure_then_revert() {
        let err: Result<()> = Err(Error::Clipboard("denied".to_string()));
        assert_eq!(feedback(Some(&err), Duration::from_millis(10)), CopyState::Failed);
        assert_eq!(feedback(Some(&err), Duration::from_secs(3)), CopyState::Idle);
    }

    // ========== CodeCopy tests ==========

    #[test]
    fn test_install_adds_idle_buttons() {
        let doc = page();
        let copy = CodeCopy::install(&doc).unwrap();

        assert_eq!(copy.len(), 2);
        for button in copy.buttons() {
            assert_eq!(doc.text(button), "📋 Copy");
            assert!(doc.has_class(button, "copy-code-btn"));
        }
    }

    #[test]
    fn test_text_excludes_button_label() {
        let doc = page();
        let copy = CodeCopy::install(&doc).unwrap();

        assert_eq!(copy.text(0), Some("lvcreate -L 1G -n data vg0"));
        assert_eq!(copy.text(1), Some("systemctl enable --now sshd"));
    }

    #[test]
    fn test_index_of_button() {
        let doc = page();
        let copy = CodeCopy::install(&doc).unwrap();
        let second = copy.buttons().nth(1).unwrap().clone();
        assert_eq!(copy.index_of(&second), Some(1));
        assert_eq!(copy.index_of(&doc.body_id()), None);
    }

    #[test]
    fn test_copy_writes_block_text() {
        let doc = page();
        let copy = CodeCopy::install(&doc).unwrap();
        let clipboard = FakeClipboard::default();

        block_on(copy.copy(&clipboard, 1)).unwrap();

        assert_eq!(
            clipboard.written.borrow().as_slice(),
            ["systemctl enable --now sshd".to_string()]
        );
    }

    #[test]
    fn test_copy_failure_reported() {
        let doc = page();
        let copy = CodeCopy::install(&doc).unwrap();
        let clipboard = FakeClipboard {
            reject: true,
            ..FakeClipboard::default()
        };

        let outcome = block_on(copy.copy(&clipboard, 0));
        assert!(outcome.is_err());

        copy.render(&doc, 0, feedback(Some(&outcome), Duration::ZERO));
        let button = copy.buttons().next().unwrap();
        assert_eq!(doc.text(button), "❌ Failed");
    }

    #[test]
    fn test_render_success_styles() {
        let doc = page();
        let copy = CodeCopy::install(&doc).unwrap();
        copy.render(&doc, 0, CopyState::Copied);

        let button = copy.buttons().next().unwrap();
        assert_eq!(doc.text(button), "✅ Copied!");
        assert_eq!(doc.style(button, "background-color"), "var(--color-success)");
        assert_eq!(doc.style(button, "color"), "white");
    }
}
