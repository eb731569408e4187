//! Plain-data description of what the widget shows.
//!
//! A view layer draws these and nothing else; they are rebuilt from widget
//! state on every call, so drawing the same value twice yields the same UI.

pub const PROMPT_TEXT: &str = "Was this page helpful?";
pub const APOLOGY_TEXT: &str = "We're sorry! Please help us improve this page.";
pub const THANKS_TEXT: &str = "Thank you for your feedback!";

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// The up/down prompt.
    Prompt,
    Survey {
        apology: bool,
        questions: Vec<QuestionView>,
        /// Affordances must be disabled while this is set.
        submitting: bool,
    },
    Thanks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMark {
    Filled,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionView {
    Binary {
        name: String,
        prompt: String,
        up_selected: bool,
        down_selected: bool,
    },
    Range {
        name: String,
        prompt: String,
        levels: Vec<LevelMark>,
    },
    Freeform {
        name: String,
        caption: String,
        text: String,
    },
}

impl QuestionView {
    pub fn name(&self) -> &str {
        match self {
            QuestionView::Binary { name, .. }
            | QuestionView::Range { name, .. }
            | QuestionView::Freeform { name, .. } => name,
        }
    }
}
