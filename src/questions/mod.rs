//! Follow-up questions asked once the respondent has voted.

use crate::error::WidgetError;
use crate::models::field::FieldValue;
use crate::models::view::QuestionView;

mod binary;
mod freeform;
mod range;

pub use binary::BinaryQuestion;
pub use freeform::FreeformQuestion;
pub use range::{RangeQuestion, DEFAULT_LEVELS};

/// A respondent interaction routed to one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Binary(bool),
    Level(usize),
    Text(String),
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Binary(_) => "binary",
            Response::Level(_) => "level",
            Response::Text(_) => "text",
        }
    }
}

pub trait Question: Send {
    /// Field identifier used in the submission.
    fn name(&self) -> &str;

    fn prompt(&self) -> &str;

    /// `None` until the respondent interacts.
    fn answer(&self) -> Option<FieldValue>;

    /// Forget any answer. Idempotent.
    fn clear(&mut self);

    fn render(&self) -> QuestionView;

    fn respond(&mut self, response: Response) -> Result<(), WidgetError>;
}

pub(crate) fn mismatch(question: &dyn Question, response: &Response) -> WidgetError {
    WidgetError::ResponseMismatch {
        question: question.name().to_owned(),
        response: response.kind(),
    }
}
