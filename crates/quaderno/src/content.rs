use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{Block, Guide};

/// A problem found while checking guide content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIssue {
    #[error("guide title is empty")]
    EmptyGuideTitle,

    #[error("guide has no chapters")]
    NoChapters,

    #[error("chapter {number} has an empty title")]
    EmptyChapterTitle { number: u32 },

    #[error("chapter slug `{0}` is used more than once")]
    DuplicateSlug(String),

    #[error("chapter slug `{0}` must be non-empty lowercase letters, digits and dashes")]
    InvalidSlug(String),

    #[error("chapter `{chapter}`: section id `{section}` is used more than once")]
    DuplicateSectionId { chapter: String, section: String },

    #[error("chapter `{chapter}`: quiz question {index} has no options")]
    QuizWithoutOptions { chapter: String, index: usize },

    #[error("chapter `{chapter}`: quiz question {index} has no answer")]
    QuizWithoutAnswer { chapter: String, index: usize },

    #[error("chapter `{chapter}`: empty code block in section `{section}`")]
    EmptyCode { chapter: String, section: String },
}

/// Load a guide from its JSON file
pub fn load_guide(path: &Path) -> Result<Guide> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read guide: {}", path.display()))?;
    let guide: Guide = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse guide: {}", path.display()))?;
    debug!(chapters = guide.chapters.len(), file = %path.display(), "Loaded guide");
    Ok(guide)
}

/// Load a guide and refuse it when it has content issues
pub fn load_valid_guide(path: &Path) -> Result<Guide> {
    let guide = load_guide(path)?;
    let issues = validate(&guide);
    if let Some(first) = issues.first() {
        for issue in &issues {
            warn!(issue = %issue, "Content issue");
        }
        anyhow::bail!("{} content issue(s) in {}, first: {}", issues.len(), path.display(), first);
    }
    Ok(guide)
}

/// Collect every content issue in `guide`. An empty result means the guide can
/// be rendered.
pub fn validate(guide: &Guide) -> Vec<ContentIssue> {
    let mut issues = Vec::new();

    if guide.title.trim().is_empty() {
        issues.push(ContentIssue::EmptyGuideTitle);
    }
    if guide.chapters.is_empty() {
        issues.push(ContentIssue::NoChapters);
    }

    let mut slugs = HashSet::new();
    for chapter in &guide.chapters {
        if chapter.title.trim().is_empty() {
            issues.push(ContentIssue::EmptyChapterTitle {
                number: chapter.number,
            });
        }
        if !is_valid_slug(&chapter.slug) {
            issues.push(ContentIssue::InvalidSlug(chapter.slug.clone()));
        }
        if !slugs.insert(chapter.slug.as_str()) {
            issues.push(ContentIssue::DuplicateSlug(chapter.slug.clone()));
        }

        let mut section_ids = HashSet::new();
        for section in &chapter.sections {
            if !section_ids.insert(section.id.as_str()) {
                issues.push(ContentIssue::DuplicateSectionId {
                    chapter: chapter.slug.clone(),
                    section: section.id.clone(),
                });
            }
            if has_empty_code(&section.blocks) {
                issues.push(ContentIssue::EmptyCode {
                    chapter: chapter.slug.clone(),
                    section: section.id.clone(),
                });
            }
        }

        for (index, question) in chapter.quiz.iter().enumerate() {
            let index = index + 1;
            if question.options.is_empty() {
                issues.push(ContentIssue::QuizWithoutOptions {
                    chapter: chapter.slug.clone(),
                    index,
                });
            }
            if question.answer.trim().is_empty() {
                issues.push(ContentIssue::QuizWithoutAnswer {
                    chapter: chapter.slug.clone(),
                    index,
                });
            }
        }
    }

    issues
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn has_empty_code(blocks: &[Block]) -> bool {
    blocks.iter().any(|block| match block {
        Block::Code { code, .. } => code.trim().is_empty(),
        Block::Expandable { blocks, .. } => has_empty_code(blocks),
        Block::Paragraph { .. } => false,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Chapter, QuizQuestion, Section};
    use tempfile::TempDir;

    pub(crate) fn chapter(slug: &str, title: &str, description: &str, topics: &[&str]) -> Chapter {
        Chapter {
            slug: slug.to_string(),
            number: 1,
            title: title.to_string(),
            description: description.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            sections: vec![],
            quiz: vec![],
        }
    }

    pub(crate) fn sample_guide() -> Guide {
        let mut storage = chapter("storage", "Storage", "Disks and filesystems", &["LVM", "XFS"]);
        storage.sections = vec![Section {
            id: "lvm".to_string(),
            heading: "Logical volumes".to_string(),
            blocks: vec![
                Block::Paragraph {
                    text: "Create a volume group first.".to_string(),
                },
                Block::Code {
                    language: "bash".to_string(),
                    code: "vgcreate vg0 /dev/sdb".to_string(),
                },
                Block::Expandable {
                    label: "Resizing".to_string(),
                    blocks: vec![Block::Code {
                        language: "bash".to_string(),
                        code: "lvextend -r -L +1G /dev/vg0/data".to_string(),
                    }],
                },
            ],
        }];
        storage.quiz = vec![QuizQuestion {
            prompt: "Which command grows a filesystem with its volume?".to_string(),
            options: vec!["lvextend -r".to_string(), "mkfs".to_string()],
            answer: "lvextend -r resizes the filesystem too.".to_string(),
        }];

        let mut networking = chapter("networking", "Networking", "Zones and services", &["firewalld"]);
        networking.number = 2;

        Guide {
            title: "RHCSA Study Guide".to_string(),
            tagline: "Everything for the exam".to_string(),
            about: vec![],
            features: vec![],
            chapters: vec![storage, networking],
        }
    }

    // ========== validate tests ==========

    #[test]
    fn test_sample_guide_is_valid() {
        assert!(validate(&sample_guide()).is_empty());
    }

    #[test]
    fn test_duplicate_slug() {
        let mut guide = sample_guide();
        guide.chapters[1].slug = "storage".to_string();

        assert_eq!(
            validate(&guide),
            vec![ContentIssue::DuplicateSlug("storage".to_string())]
        );
    }

    #[test]
    fn test_invalid_slug() {
        let mut guide = sample_guide();
        guide.chapters[0].slug = "Storage Basics".to_string();

        assert!(validate(&guide).contains(&ContentIssue::InvalidSlug("Storage Basics".to_string())));
    }

    #[test]
    fn test_duplicate_section_id() {
        let mut guide = sample_guide();
        let section = guide.chapters[0].sections[0].clone();
        guide.chapters[0].sections.push(section);

        assert_eq!(
            validate(&guide),
            vec![ContentIssue::DuplicateSectionId {
                chapter: "storage".to_string(),
                section: "lvm".to_string(),
            }]
        );
    }

    #[test]
    fn test_section_ids_may_repeat_across_chapters() {
        let mut guide = sample_guide();
        let section = guide.chapters[0].sections[0].clone();
        guide.chapters[1].sections.push(section);

        assert!(validate(&guide).is_empty());
    }

    #[test]
    fn test_quiz_without_answer() {
        let mut guide = sample_guide();
        guide.chapters[0].quiz[0].answer = "  ".to_string();

        assert_eq!(
            validate(&guide),
            vec![ContentIssue::QuizWithoutAnswer {
                chapter: "storage".to_string(),
                index: 1,
            }]
        );
    }

    #[test]
    fn test_nested_empty_code() {
        let mut guide = sample_guide();
        guide.chapters[0].sections[0].blocks.push(Block::Expandable {
            label: "Empty".to_string(),
            blocks: vec![Block::Code {
                language: String::new(),
                code: "\n".to_string(),
            }],
        });

        assert_eq!(validate(&guide).len(), 1);
    }

    #[test]
    fn test_empty_guide() {
        let guide = Guide {
            title: String::new(),
            tagline: String::new(),
            about: vec![],
            features: vec![],
            chapters: vec![],
        };
        assert_eq!(
            validate(&guide),
            vec![ContentIssue::EmptyGuideTitle, ContentIssue::NoChapters]
        );
    }

    // ========== load tests ==========

    #[test]
    fn test_load_guide_roundtrip_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("guide.json");
        std::fs::write(&path, serde_json::to_string(&sample_guide()).unwrap()).unwrap();

        let guide = load_guide(&path).unwrap();
        assert_eq!(guide, sample_guide());
    }

    #[test]
    fn test_load_guide_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_guide(&temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read guide"));
    }

    #[test]
    fn test_load_valid_guide_rejects_issues() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("guide.json");
        let mut guide = sample_guide();
        guide.chapters[1].slug = "storage".to_string();
        std::fs::write(&path, serde_json::to_string(&guide).unwrap()).unwrap();

        let err = load_valid_guide(&path).unwrap_err();
        assert!(err.to_string().contains("1 content issue(s)"));
    }
}
