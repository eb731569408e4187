//! An embeddable "was this page helpful?" feedback widget.
//!
//! [`widget::FeedbackWidget`] owns the vote/survey state machine, the
//! [`questions`] asked after a vote, and talks to a [`memory::VoteMemory`]
//! and an [`api::beacon::Beacon`]. Drawing is left to the host, which renders
//! [`models::view::WidgetView`].

pub mod api;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod questions;
pub mod widget;

pub use api::beacon::{Beacon, HttpBeacon};
pub use config::WidgetConfig;
pub use error::{BeaconError, StorageError, WidgetError};
pub use memory::{derive_key, FileVoteMemory, InMemoryVoteMemory, VoteMemory};
pub use models::field::{FieldSet, FieldValue};
pub use models::state::WidgetState;
pub use models::view::{LevelMark, QuestionView, WidgetView};
pub use questions::{Question, Response};
pub use widget::{FeedbackWidget, Submission};
