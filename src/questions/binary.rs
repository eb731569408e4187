use super::{mismatch, Question, Response};
use crate::error::WidgetError;
use crate::models::field::FieldValue;
use crate::models::view::QuestionView;

/// Thumbs up / thumbs down follow-up.
#[derive(Debug, Clone)]
pub struct BinaryQuestion {
    name: String,
    prompt: String,
    answer: Option<bool>,
}

impl BinaryQuestion {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            answer: None,
        }
    }

    pub fn select(&mut self, up: bool) {
        self.answer = Some(up);
    }
}

impl Question for BinaryQuestion {
    fn name(&self) -> &str {
        &self.name
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    fn answer(&self) -> Option<FieldValue> {
        self.answer.map(FieldValue::Bool)
    }

    fn clear(&mut self) {
        self.answer = None;
    }

    fn render(&self) -> QuestionView {
        QuestionView::Binary {
            name: self.name.clone(),
            prompt: self.prompt.clone(),
            up_selected: self.answer == Some(true),
            down_selected: self.answer == Some(false),
        }
    }

    fn respond(&mut self, response: Response) -> Result<(), WidgetError> {
        match response {
            Response::Binary(up) => {
                self.select(up);
                Ok(())
            }
            other => Err(mismatch(&*self, &other)),
        }
    }
}
