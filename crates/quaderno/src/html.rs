use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use sfoglia::sections::EXPAND_LABEL;
use sfoglia::{EffectsProfile, Theme};

use crate::types::{Block, Chapter, Guide};

/// Initial presentation baked into every page
#[derive(Debug, Clone, Copy, Default)]
pub struct Look {
    pub theme: Theme,
    pub effects: EffectsProfile,
}

/// Generate the whole site into `output_dir`, returning the written paths
pub fn generate_site(
    guide: &Guide,
    output_dir: &Path,
    look: Look,
    generated_at: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(guide.chapters.len() + 2);

    let index_path = output_dir.join("index.html");
    write_page(&index_path, render_index(guide, look, generated_at))?;
    written.push(index_path);

    for (idx, chapter) in guide.chapters.iter().enumerate() {
        let path = output_dir.join(chapter.file_name());
        write_page(&path, render_chapter(guide, idx, look, generated_at))?;
        debug!(chapter = %chapter.slug, "Chapter page written");
        written.push(path);
    }

    let css_path = output_dir.join("style.css");
    fs::write(&css_path, CSS.trim_start())
        .with_context(|| format!("Failed to write {}", css_path.display()))?;
    written.push(css_path);

    Ok(written)
}

fn write_page(path: &Path, markup: Markup) -> Result<()> {
    fs::write(path, markup.into_string())
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn render_index(guide: &Guide, look: Look, generated_at: &str) -> Markup {
    let body = html! {
        section.hero #home {
            div.hero-content {
                h1.hero-title { (guide.title) }
                @if !guide.tagline.is_empty() {
                    p.hero-tagline { (guide.tagline) }
                }
                div.hero-actions {
                    a.btn.btn-primary href="#chapters" { "Start Learning" }
                    @if !guide.about.is_empty() {
                        a.btn.btn-secondary href="#about" { "About" }
                    }
                }
            }
        }

        section.chapters-section #chapters {
            div.container {
                h2.section-title { "Chapters" }
                div.search-box {
                    input #searchInput type="search"
                        placeholder="Search chapters... (Ctrl+K)"
                        aria-label="Search chapters"
                        autocomplete="off";
                }
                div.chapters-grid #chaptersGrid {
                    @for chapter in &guide.chapters {
                        (render_card(chapter))
                    }
                }
            }
        }

        @if !guide.about.is_empty() {
            section.about-section #about {
                div.container {
                    h2.section-title { "About" }
                    div.about-grid {
                        @for card in &guide.about {
                            div.about-card {
                                @if !card.icon.is_empty() {
                                    div.about-icon { (card.icon) }
                                }
                                h3 { (card.title) }
                                p { (card.body) }
                            }
                        }
                    }
                }
            }
        }

        @if !guide.features.is_empty() {
            section.features-section #features {
                div.container {
                    h2.section-title { "What's Inside" }
                    ul.feature-list {
                        @for feature in &guide.features {
                            li.feature-item {
                                @if !feature.icon.is_empty() {
                                    span.feature-icon { (feature.icon) }
                                }
                                span { (feature.text) }
                            }
                        }
                    }
                }
            }
        }
    };

    layout(guide, &guide.title, look, true, generated_at, body)
}

fn render_card(chapter: &Chapter) -> Markup {
    html! {
        a.chapter-card href=(chapter.file_name()) {
            span.chapter-number { "Chapter " (chapter.number) }
            h3.chapter-title { (chapter.title) }
            p.chapter-description { (chapter.description) }
            @if !chapter.topics.is_empty() {
                div.chapter-topics {
                    @for topic in &chapter.topics {
                        span.topic-tag { (topic) }
                    }
                }
            }
        }
    }
}

pub fn render_chapter(guide: &Guide, idx: usize, look: Look, generated_at: &str) -> Markup {
    let chapter = &guide.chapters[idx];
    let prev = idx.checked_sub(1).and_then(|i| guide.chapters.get(i));
    let next = guide.chapters.get(idx + 1);

    let body = html! {
        div.chapter-layout {
            aside.sidebar {
                nav.sidebar-nav aria-label="Chapters" {
                    h3 { "Chapters" }
                    ul {
                        @for other in &guide.chapters {
                            li {
                                a href=(other.file_name()) {
                                    (other.number) ". " (other.title)
                                }
                            }
                        }
                    }
                }
            }

            main.chapter-content {
                header.chapter-header {
                    span.chapter-number { "Chapter " (chapter.number) }
                    h1 { (chapter.title) }
                    p.chapter-description { (chapter.description) }
                }

                @if !chapter.sections.is_empty() {
                    nav.toc {
                        h2 { "Contents" }
                        ul.toc-list {
                            @for section in &chapter.sections {
                                li { a href={ "#" (section.id) } { (section.heading) } }
                            }
                            @if !chapter.quiz.is_empty() {
                                li { a href="#quiz" { "Quiz" } }
                            }
                        }
                    }
                }

                @for section in &chapter.sections {
                    section.content-section id=(section.id) {
                        h2 { (section.heading) }
                        (render_blocks(&section.blocks))
                    }
                }

                @if !chapter.quiz.is_empty() {
                    section.quiz #quiz {
                        h2 { "Check Yourself" }
                        @for question in &chapter.quiz {
                            div.quiz-question {
                                p.quiz-prompt { (question.prompt) }
                                ul.quiz-options {
                                    @for option in &question.options {
                                        li { (option) }
                                    }
                                }
                                div.quiz-answer {
                                    p { (question.answer) }
                                }
                            }
                        }
                    }
                }

                nav.chapter-pager {
                    @if let Some(prev) = prev {
                        a.btn.btn-secondary href=(prev.file_name()) { "← " (prev.title) }
                    }
                    @if let Some(next) = next {
                        a.btn.btn-primary href=(next.file_name()) { (next.title) " →" }
                    }
                }
            }
        }
    };

    let title = format!("{} | {}", chapter.title, guide.title);
    layout(guide, &title, look, false, generated_at, body)
}

fn render_blocks(blocks: &[Block]) -> Markup {
    html! {
        @for block in blocks {
            @match block {
                Block::Paragraph { text } => {
                    p { (text) }
                }
                Block::Code { language, code } => {
                    pre {
                        @if language.is_empty() {
                            code { (code) }
                        } @else {
                            code class={ "language-" (language) } { (code) }
                        }
                    }
                }
                Block::Expandable { label, blocks } => {
                    div.expandable {
                        p.expandable-label { (label) }
                        button.expand-toggle type="button" aria-expanded="false" { (EXPAND_LABEL) }
                        div.expandable-content style="display: none" {
                            (render_blocks(blocks))
                        }
                    }
                }
            }
        }
    }
}

/// Shared page shell. On the index, navbar links are in-page anchors so they
/// scroll; elsewhere they point back at the index.
fn layout(
    guide: &Guide,
    title: &str,
    look: Look,
    on_index: bool,
    generated_at: &str,
    body: Markup,
) -> Markup {
    let base = if on_index { "" } else { "index.html" };
    let brand_href = if on_index { "#home" } else { "index.html" };
    let theme = look.theme;

    html! {
        (DOCTYPE)
        html lang="en" data-theme=(theme.as_str()) data-effects=(look.effects.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="style.css";
                script type="module" { (PreEscaped(LOADER)) }
            }
            body {
                nav.navbar {
                    div.nav-container {
                        a.nav-brand href=(brand_href) { (guide.title) }
                        ul.nav-links {
                            li { a.nav-link href={ (base) "#chapters" } { "Chapters" } }
                            @if !guide.about.is_empty() {
                                li { a.nav-link href={ (base) "#about" } { "About" } }
                            }
                            @if !guide.features.is_empty() {
                                li { a.nav-link href={ (base) "#features" } { "Features" } }
                            }
                        }
                        div.nav-actions {
                            button.theme-toggle #themeToggle type="button" aria-label="Toggle dark mode" {
                                (theme.icon())
                            }
                            button.mobile-menu-toggle #mobileMenuToggle type="button" aria-label="Toggle menu" {
                                span {} span {} span {}
                            }
                        }
                    }
                }
                (body)
                footer.footer {
                    p { (guide.title) " · generated " (generated_at) }
                }
            }
        }
    }
}

/// Boots the `vetrina` wasm module built with `wasm-bindgen --target web`.
const LOADER: &str = r#"
import init from './pkg/vetrina.js';
init();
"#;

const CSS: &str = r#"
:root {
    --bg-primary: #ffffff;
    --bg-secondary: #f4f5f7;
    --bg-tertiary: #e7ebf3;
    --text-primary: #1d2330;
    --text-secondary: #5a6375;
    --color-brand: #c8102e;
    --color-success: #2e8540;
    --border: #d9dde5;
    --shadow: 0 4px 18px rgba(20, 28, 45, 0.08);
    --navbar-height: 64px;
}

[data-theme="dark"] {
    --bg-primary: #12151c;
    --bg-secondary: #1b2029;
    --bg-tertiary: #262d3a;
    --text-primary: #e8ebf1;
    --text-secondary: #a3acbd;
    --color-brand: #ff5a6e;
    --color-success: #3fb45a;
    --border: #2f3747;
    --shadow: 0 4px 18px rgba(0, 0, 0, 0.4);
}

* {
    box-sizing: border-box;
}

body {
    margin: 0;
    font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    line-height: 1.6;
    transition: background 0.3s ease, color 0.3s ease;
}

a {
    color: var(--color-brand);
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 0 20px;
}

/* Navbar */

.navbar {
    position: sticky;
    top: 0;
    z-index: 100;
    height: var(--navbar-height);
    background: var(--bg-secondary);
    border-bottom: 1px solid var(--border);
}

.nav-container {
    max-width: 1100px;
    height: 100%;
    margin: 0 auto;
    padding: 0 20px;
    display: flex;
    align-items: center;
    gap: 24px;
}

.nav-brand {
    font-weight: 800;
    text-decoration: none;
    color: var(--text-primary);
}

.nav-links {
    display: flex;
    gap: 18px;
    margin: 0 0 0 auto;
    padding: 0;
    list-style: none;
}

.nav-link {
    color: var(--text-secondary);
    text-decoration: none;
    font-weight: 600;
}

.nav-link:hover,
.nav-link.active {
    color: var(--color-brand);
}

.nav-actions {
    display: flex;
    gap: 8px;
}

.theme-toggle,
.mobile-menu-toggle {
    background: none;
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 6px 10px;
    cursor: pointer;
    color: var(--text-primary);
}

.mobile-menu-toggle {
    display: none;
    flex-direction: column;
    gap: 4px;
}

.mobile-menu-toggle span {
    display: block;
    width: 18px;
    height: 2px;
    background: var(--text-primary);
}

/* Hero */

.hero {
    padding: 96px 20px 72px;
    text-align: center;
    background: linear-gradient(160deg, var(--bg-secondary), var(--bg-primary));
}

.hero-title {
    font-size: 3em;
    margin: 0 0 12px;
}

.hero-tagline {
    color: var(--text-secondary);
    font-size: 1.2em;
}

.hero-actions {
    display: flex;
    justify-content: center;
    gap: 12px;
    margin-top: 28px;
}

.btn {
    position: relative;
    overflow: hidden;
    display: inline-block;
    padding: 10px 22px;
    border-radius: 8px;
    font-weight: 700;
    text-decoration: none;
    transition: transform 0.2s ease;
}

.btn:hover {
    transform: translateY(-2px);
}

.btn-primary {
    background: var(--color-brand);
    color: #fff;
}

.btn-secondary {
    border: 2px solid var(--color-brand);
    color: var(--color-brand);
}

.ripple {
    position: absolute;
    border-radius: 50%;
    background: rgba(255, 255, 255, 0.5);
    transform: scale(0);
    animation: ripple 0.6s linear;
    pointer-events: none;
}

@keyframes ripple {
    to {
        transform: scale(4);
        opacity: 0;
    }
}

/* Chapters */

.chapters-section,
.about-section,
.features-section {
    padding: 56px 0;
}

.section-title {
    text-align: center;
    font-size: 2em;
}

.search-box {
    max-width: 520px;
    margin: 0 auto 32px;
}

#searchInput {
    width: 100%;
    padding: 12px 16px;
    font-size: 1em;
    border: 1px solid var(--border);
    border-radius: 10px;
    background: var(--bg-secondary);
    color: var(--text-primary);
}

.chapters-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
    gap: 20px;
}

.chapter-card {
    display: flex;
    flex-direction: column;
    gap: 6px;
    padding: 22px;
    border: 1px solid var(--border);
    border-radius: 12px;
    background: var(--bg-secondary);
    color: var(--text-primary);
    text-decoration: none;
    box-shadow: var(--shadow);
    transition: transform 0.2s ease, box-shadow 0.2s ease;
}

.chapter-card:hover {
    transform: translateY(-4px);
}

.chapter-number {
    color: var(--color-brand);
    font-size: 0.8em;
    font-weight: 800;
    text-transform: uppercase;
    letter-spacing: 0.06em;
}

.chapter-title {
    margin: 0;
}

.chapter-description {
    color: var(--text-secondary);
    margin: 0;
}

.chapter-topics {
    display: flex;
    flex-wrap: wrap;
    gap: 6px;
    margin-top: auto;
}

.topic-tag {
    font-size: 0.75em;
    padding: 2px 8px;
    border-radius: 999px;
    background: var(--bg-tertiary);
}

.no-results {
    grid-column: 1 / -1;
    text-align: center;
    color: var(--text-secondary);
    padding: 40px 0;
}

.fade-in {
    animation: fadeIn 0.5s ease forwards;
}

@keyframes fadeIn {
    from {
        opacity: 0;
        transform: translateY(12px);
    }
    to {
        opacity: 1;
        transform: translateY(0);
    }
}

/* About and features */

.about-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
    gap: 20px;
}

.about-card {
    padding: 24px;
    border-radius: 12px;
    background: var(--bg-secondary);
    box-shadow: var(--shadow);
    transition: transform 0.2s ease;
}

.about-icon {
    font-size: 2em;
}

.feature-list {
    max-width: 720px;
    margin: 0 auto;
    padding: 0;
    list-style: none;
}

.feature-item {
    display: flex;
    gap: 12px;
    padding: 12px 0;
    border-bottom: 1px solid var(--border);
}

/* Chapter pages */

.chapter-layout {
    display: grid;
    grid-template-columns: 240px 1fr;
    gap: 40px;
    max-width: 1200px;
    margin: 0 auto;
    padding: 32px 20px;
}

.sidebar-nav {
    position: sticky;
    top: calc(var(--navbar-height) + 20px);
}

.sidebar-nav ul {
    list-style: none;
    padding: 0;
}

.sidebar-nav a {
    display: block;
    padding: 6px 10px;
    border-radius: 6px;
    color: var(--text-secondary);
    text-decoration: none;
}

.sidebar-nav a.active {
    background: var(--bg-tertiary);
    color: var(--color-brand);
    font-weight: 700;
}

.toc {
    padding: 16px 20px;
    border-radius: 10px;
    background: var(--bg-secondary);
}

.toc h2 {
    margin-top: 0;
    font-size: 1.1em;
}

.content-section {
    padding-top: 12px;
}

pre {
    position: relative;
    padding: 16px;
    border-radius: 8px;
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    overflow-x: auto;
}

.copy-code-btn {
    position: absolute;
    top: 8px;
    right: 8px;
    padding: 4px 10px;
    font-size: 0.75em;
    border: 1px solid var(--border);
    border-radius: 6px;
    cursor: pointer;
}

.expandable {
    margin: 16px 0;
}

.expandable-label {
    font-weight: 700;
    margin-bottom: 4px;
}

.expand-toggle {
    border: none;
    background: none;
    color: var(--color-brand);
    font-weight: 700;
    cursor: pointer;
    padding: 0;
}

.quiz-question {
    margin: 20px 0;
    padding: 18px;
    border-radius: 10px;
    background: var(--bg-secondary);
}

.quiz-options {
    list-style: none;
    padding: 0;
}

.quiz-options li {
    margin: 6px 0;
    padding: 8px 12px;
    border: 2px solid var(--border);
    border-radius: 8px;
    cursor: pointer;
}

.quiz-answer {
    display: none;
    margin-top: 12px;
    color: var(--color-success);
    font-weight: 600;
}

.quiz-answer.show {
    display: block;
}

.chapter-pager {
    display: flex;
    justify-content: space-between;
    margin-top: 48px;
}

/* Injected controls */

.scroll-to-top {
    position: fixed;
    right: 24px;
    bottom: 24px;
    width: 44px;
    height: 44px;
    border: none;
    border-radius: 50%;
    background: var(--color-brand);
    color: #fff;
    font-size: 1.2em;
    cursor: pointer;
    box-shadow: var(--shadow);
}

.reading-progress {
    position: fixed;
    top: 0;
    left: 0;
    height: 3px;
    z-index: 200;
    background: var(--color-brand);
    transition: width 0.1s linear;
}

.footer {
    padding: 32px 20px;
    text-align: center;
    color: var(--text-secondary);
    border-top: 1px solid var(--border);
}

@media (max-width: 768px) {
    .mobile-menu-toggle {
        display: flex;
    }

    .nav-links {
        display: none;
        position: absolute;
        top: var(--navbar-height);
        left: 0;
        right: 0;
        flex-direction: column;
        padding: 16px 20px;
        background: var(--bg-secondary);
        border-bottom: 1px solid var(--border);
    }

    .nav-links.active {
        display: flex;
    }

    .chapter-layout {
        grid-template-columns: 1fr;
    }

    .sidebar {
        display: none;
    }

    .hero-title {
        font-size: 2.2em;
    }
}

@media print {
    .navbar,
    .sidebar,
    .scroll-to-top,
    .reading-progress,
    .copy-code-btn,
    .expand-toggle,
    .chapter-pager {
        display: none !important;
    }

    .quiz-answer {
        display: block;
    }
}
"#;
