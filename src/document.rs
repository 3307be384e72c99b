use std::fmt;
use serde::{Deserialize, Serialize};

// @module: Block document model

/// Maximum length of a single run's text. Longer spans are truncated at
/// flush time so a run is always storable as one rich-text element.
pub const MAX_RUN_TEXT_LEN: usize = 2000;

/// Formatting annotations carried by a single text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    /// Validated absolute URL, if the run is a link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Display color ("default" for source text, "gray" for appended translations)
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

impl Default for Annotations {
    fn default() -> Self {
        Annotations {
            bold: false,
            italic: false,
            underline: false,
            code: false,
            link: None,
            color: default_color(),
        }
    }
}

/// A maximal span of text sharing one set of annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub annotations: Annotations,
}

impl Run {
    /// Create a run with default annotations
    pub fn plain(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            annotations: Annotations::default(),
        }
    }

    /// Create a run with the given annotations, truncating overlong text
    pub fn new(text: impl Into<String>, annotations: Annotations) -> Self {
        let mut text: String = text.into();
        if text.chars().count() > MAX_RUN_TEXT_LEN {
            text = text.chars().take(MAX_RUN_TEXT_LEN).collect();
        }
        Run { text, annotations }
    }
}

/// Kind discriminant for a block, used for fingerprinting and eligibility
/// checks without matching on the full variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Quote,
    BulletItem,
    NumberItem,
    Image,
}

impl BlockKind {
    /// Store-side type identifier for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Quote => "quote",
            BlockKind::BulletItem => "bulleted_list_item",
            BlockKind::NumberItem => "numbered_list_item",
            BlockKind::Image => "image",
        }
    }

    /// Whether blocks of this kind carry heading text
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// One structural unit of the output document.
///
/// A source `<ul>`/`<ol>` expands to one `BulletItem`/`NumberItem` per
/// `<li>`, not a single nested block. Heading levels above 3 are clamped
/// to 3 at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, runs: Vec<Run> },
    Paragraph { runs: Vec<Run> },
    Quote { runs: Vec<Run> },
    BulletItem { runs: Vec<Run> },
    NumberItem { runs: Vec<Run> },
    Image { url: String },
}

impl Block {
    /// Build a heading block, clamping the level to the supported range
    pub fn heading(level: u8, runs: Vec<Run>) -> Self {
        Block::Heading {
            level: level.clamp(1, 3),
            runs,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { level: 1, .. } => BlockKind::Heading1,
            Block::Heading { level: 2, .. } => BlockKind::Heading2,
            Block::Heading { .. } => BlockKind::Heading3,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::Quote { .. } => BlockKind::Quote,
            Block::BulletItem { .. } => BlockKind::BulletItem,
            Block::NumberItem { .. } => BlockKind::NumberItem,
            Block::Image { .. } => BlockKind::Image,
        }
    }

    /// The runs of a text-bearing block, or None for images
    pub fn runs(&self) -> Option<&[Run]> {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::Quote { runs }
            | Block::BulletItem { runs }
            | Block::NumberItem { runs } => Some(runs),
            Block::Image { .. } => None,
        }
    }

    /// Mutable access to the runs of a text-bearing block
    pub fn runs_mut(&mut self) -> Option<&mut Vec<Run>> {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::Quote { runs }
            | Block::BulletItem { runs }
            | Block::NumberItem { runs } => Some(runs),
            Block::Image { .. } => None,
        }
    }

    /// Concatenated text of all runs. Empty for images.
    pub fn plain_text(&self) -> String {
        self.runs()
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Append a translated counterpart to this block's runs: a newline run
    /// followed by the translation in italic gray. This is the only mutation
    /// a built document undergoes; existing runs are never touched.
    pub fn append_translation(&mut self, translated: &str, max_len: usize) {
        let Some(runs) = self.runs_mut() else {
            return;
        };
        runs.push(Run::plain("\n"));
        let text: String = translated.chars().take(max_len).collect();
        runs.push(Run::new(
            text,
            Annotations {
                italic: true,
                color: "gray".to_string(),
                ..Annotations::default()
            },
        ));
    }
}
