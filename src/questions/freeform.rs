use super::{mismatch, Question, Response};
use crate::error::WidgetError;
use crate::models::field::FieldValue;
use crate::models::view::QuestionView;

/// Free-text follow-up. Once touched, the text is submitted verbatim, even
/// when empty.
#[derive(Debug, Clone)]
pub struct FreeformQuestion {
    name: String,
    caption: String,
    text: Option<String>,
}

impl FreeformQuestion {
    pub fn new(name: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caption: caption.into(),
            text: None,
        }
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl Question for FreeformQuestion {
    fn name(&self) -> &str {
        &self.name
    }

    fn prompt(&self) -> &str {
        &self.caption
    }

    fn answer(&self) -> Option<FieldValue> {
        self.text.clone().map(FieldValue::Text)
    }

    fn clear(&mut self) {
        self.text = None;
    }

    fn render(&self) -> QuestionView {
        QuestionView::Freeform {
            name: self.name.clone(),
            caption: self.caption.clone(),
            text: self.text.clone().unwrap_or_default(),
        }
    }

    fn respond(&mut self, response: Response) -> Result<(), WidgetError> {
        match response {
            Response::Text(text) => {
                self.input(text);
                Ok(())
            }
            other => Err(mismatch(&*self, &other)),
        }
    }
}
