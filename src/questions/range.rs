use super::{mismatch, Question, Response};
use crate::error::WidgetError;
use crate::models::field::FieldValue;
use crate::models::view::{LevelMark, QuestionView};

pub const DEFAULT_LEVELS: usize = 5;

/// Star-style rating over a fixed number of levels.
///
/// Selecting level `i` answers `i / levels`, so answers fall in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct RangeQuestion {
    name: String,
    prompt: String,
    levels: usize,
    selected: Option<usize>,
}

impl RangeQuestion {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::with_levels(name, prompt, DEFAULT_LEVELS)
    }

    /// `levels` is clamped to at least one.
    pub fn with_levels(name: impl Into<String>, prompt: impl Into<String>, levels: usize) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            levels: levels.max(1),
            selected: None,
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, level: usize) -> Result<(), WidgetError> {
        if level >= self.levels {
            return Err(WidgetError::LevelOutOfRange {
                level,
                levels: self.levels,
            });
        }
        self.selected = Some(level);
        Ok(())
    }
}

impl Question for RangeQuestion {
    fn name(&self) -> &str {
        &self.name
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    fn answer(&self) -> Option<FieldValue> {
        self.selected
            .map(|level| FieldValue::Number(level as f64 / self.levels as f64))
    }

    fn clear(&mut self) {
        self.selected = None;
    }

    fn render(&self) -> QuestionView {
        let levels = (0..self.levels)
            .map(|i| match self.selected {
                Some(selected) if i <= selected => LevelMark::Filled,
                _ => LevelMark::Empty,
            })
            .collect();

        QuestionView::Range {
            name: self.name.clone(),
            prompt: self.prompt.clone(),
            levels,
        }
    }

    fn respond(&mut self, response: Response) -> Result<(), WidgetError> {
        match response {
            Response::Level(level) => self.select(level),
            other => Err(mismatch(&*self, &other)),
        }
    }
}
