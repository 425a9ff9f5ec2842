use serde::{Deserialize, Serialize};

/// A complete study guide, as stored in its JSON source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Guide {
    pub title: String,

    /// One-line pitch shown under the title
    #[serde(default)]
    pub tagline: String,

    #[serde(default)]
    pub about: Vec<AboutCard>,

    #[serde(default)]
    pub features: Vec<Feature>,

    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AboutCard {
    #[serde(default)]
    pub icon: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    #[serde(default)]
    pub icon: String,
    pub text: String,
}

/// One chapter page. On the index it is also one searchable card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// URL-safe identifier, used in the page file name
    pub slug: String,

    pub number: u32,
    pub title: String,
    pub description: String,

    /// Short labels shown as tags on the card
    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

impl Chapter {
    /// File name of the generated chapter page.
    pub fn file_name(&self) -> String {
        format!("chapter-{}.html", self.slug)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    /// Anchor target, unique within its chapter
    pub id: String,
    pub heading: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        text: String,
    },
    Code {
        #[serde(default)]
        language: String,
        code: String,
    },
    /// Content hidden behind an expand/collapse button
    Expandable { label: String, blocks: Vec<Block> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Explanation revealed once any option is picked
    pub answer: String,
}
