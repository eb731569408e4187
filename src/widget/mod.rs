//! The feedback widget: vote, optional survey, submit, remember.

use crate::api::beacon::Beacon;
use crate::config::{WidgetConfig, DEFAULT_COOLDOWN};
use crate::error::{BeaconError, WidgetError};
use crate::memory::{derive_key, VoteMemory};
use crate::models::field::FieldSet;
use crate::models::state::WidgetState;
use crate::models::view::WidgetView;
use crate::questions::{
    BinaryQuestion, FreeformQuestion, Question, RangeQuestion, Response,
};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// A submission handed out by [`FeedbackWidget::begin_submit`].
///
/// Must be passed back to [`FeedbackWidget::complete_submit`] exactly once
/// with the beacon outcome.
#[derive(Debug)]
pub struct Submission {
    vote: bool,
    fields: FieldSet,
    identity: String,
}

impl Submission {
    pub fn vote(&self) -> bool {
        self.vote
    }

    /// Answered questions only, keyed by question name.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

pub struct FeedbackWidget {
    project: String,
    path: String,
    key: String,
    questions: Vec<Box<dyn Question>>,
    state: WidgetState,
    in_flight: bool,
    opened: bool,
    memory: Arc<dyn VoteMemory>,
    clock: Arc<dyn Clock>,
}

impl FeedbackWidget {
    pub fn new(
        project: impl Into<String>,
        path: impl Into<String>,
        memory: Arc<dyn VoteMemory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_cooldown(project, path, DEFAULT_COOLDOWN, memory, clock)
    }

    pub fn with_config(
        project: impl Into<String>,
        path: impl Into<String>,
        config: &WidgetConfig,
        memory: Arc<dyn VoteMemory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_cooldown(project, path, config.cooldown, memory, clock)
    }

    fn with_cooldown(
        project: impl Into<String>,
        path: impl Into<String>,
        cooldown: Duration,
        memory: Arc<dyn VoteMemory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let project = project.into();
        let path = path.into();
        let key = derive_key(&project, &path);

        let state = if recently_voted(memory.get(&key), clock.now(), cooldown) {
            WidgetState::Voted
        } else {
            WidgetState::NotVoted
        };
        debug!("Feedback widget for {} starts {}", key, state);

        Self {
            project,
            path,
            key,
            questions: Vec::new(),
            state,
            in_flight: false,
            opened: false,
            memory,
            clock,
        }
    }

    pub fn ask_question(mut self, name: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.questions.push(Box::new(BinaryQuestion::new(name, prompt)));
        self
    }

    pub fn ask_range_question(
        mut self,
        name: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        self.questions.push(Box::new(RangeQuestion::new(name, prompt)));
        self
    }

    pub fn ask_range_question_with_levels(
        mut self,
        name: impl Into<String>,
        prompt: impl Into<String>,
        levels: usize,
    ) -> Self {
        self.questions
            .push(Box::new(RangeQuestion::with_levels(name, prompt, levels)));
        self
    }

    pub fn ask_freeform_question(
        mut self,
        name: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        self.questions
            .push(Box::new(FreeformQuestion::new(name, caption)));
        self
    }

    /// Marks the widget as shown and returns what to draw first.
    pub fn open(&mut self) -> WidgetView {
        self.opened = true;
        self.view()
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identity reported to the collector: `{project}/{path}`.
    pub fn identity(&self) -> String {
        format!("{}/{}", self.project, self.path)
    }

    pub fn questions(&self) -> &[Box<dyn Question>] {
        &self.questions
    }

    pub fn view(&self) -> WidgetView {
        match self.state {
            WidgetState::NotVoted => WidgetView::Prompt,
            WidgetState::PendingVote { vote } => WidgetView::Survey {
                apology: !vote,
                questions: self.questions.iter().map(|q| q.render()).collect(),
                submitting: self.in_flight,
            },
            WidgetState::Voted => WidgetView::Thanks,
        }
    }

    /// Enters the survey. Answers left over from an earlier survey are
    /// discarded here.
    pub fn vote(&mut self, vote: bool) -> Result<(), WidgetError> {
        self.ensure_idle()?;
        match self.state {
            WidgetState::NotVoted => {
                for question in &mut self.questions {
                    question.clear();
                }
                self.state = WidgetState::PendingVote { vote };
                debug!("{}: voted {}", self.key, vote);
                Ok(())
            }
            other => Err(invalid("vote", other)),
        }
    }

    pub fn cancel(&mut self) -> Result<(), WidgetError> {
        self.ensure_idle()?;
        match self.state {
            WidgetState::PendingVote { .. } => {
                self.state = WidgetState::NotVoted;
                debug!("{}: survey cancelled", self.key);
                Ok(())
            }
            other => Err(invalid("cancel", other)),
        }
    }

    /// Routes a respondent interaction to the question at `index`.
    pub fn respond(&mut self, index: usize, response: Response) -> Result<(), WidgetError> {
        self.ensure_idle()?;
        match self.state {
            WidgetState::PendingVote { .. } => self
                .questions
                .get_mut(index)
                .ok_or(WidgetError::UnknownQuestion(index))?
                .respond(response),
            other => Err(invalid("answer a question", other)),
        }
    }

    pub fn begin_submit(&mut self) -> Result<Submission, WidgetError> {
        self.ensure_idle()?;
        let vote = match self.state {
            WidgetState::PendingVote { vote } => vote,
            other => return Err(invalid("submit", other)),
        };

        let mut fields = FieldSet::new();
        for question in &self.questions {
            if let Some(answer) = question.answer() {
                fields.set(question.name(), answer);
            }
        }

        self.in_flight = true;
        Ok(Submission {
            vote,
            fields,
            identity: self.identity(),
        })
    }

    /// Applies the beacon outcome of a submission.
    ///
    /// Success remembers the vote and thanks the respondent. Failure is logged
    /// and drops back to the prompt without remembering anything.
    pub fn complete_submit(
        &mut self,
        submission: Submission,
        outcome: Result<(), BeaconError>,
    ) -> Result<WidgetState, WidgetError> {
        if !self.in_flight {
            return Err(invalid("complete a submission", self.state));
        }
        if submission.identity != self.identity() {
            return Err(invalid("complete another page's submission", self.state));
        }
        self.in_flight = false;

        match outcome {
            Ok(()) => {
                let now = self.clock.now();
                if let Err(e) = self.memory.set(&self.key, now) {
                    error!("Failed to remember vote for {}: {}", self.key, e);
                }
                self.state = WidgetState::Voted;
                info!("Feedback for {} submitted", submission.identity);
            }
            Err(e) => {
                error!("Failed to send feedback for {}: {}", submission.identity, e);
                self.state = WidgetState::NotVoted;
            }
        }
        Ok(self.state)
    }

    /// Submits through `beacon` and waits for the outcome.
    pub async fn submit(&mut self, beacon: &dyn Beacon) -> Result<WidgetState, WidgetError> {
        let submission = self.begin_submit()?;
        let outcome = beacon
            .send(
                submission.vote,
                submission.fields.clone(),
                &submission.identity,
            )
            .await;
        self.complete_submit(submission, outcome)
    }

    /// Back to the prompt from any state. Stored votes are left alone.
    pub fn reset(&mut self) -> Result<(), WidgetError> {
        self.ensure_idle()?;
        self.state = WidgetState::NotVoted;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), WidgetError> {
        if self.in_flight {
            Err(WidgetError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }
}

fn invalid(action: &'static str, state: WidgetState) -> WidgetError {
    WidgetError::InvalidTransition {
        action,
        state: state.name(),
    }
}

/// A missing record is infinitely old. A record from the future counts as
/// recent.
pub fn recently_voted(
    last_vote: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> bool {
    let Some(last_vote) = last_vote else {
        return false;
    };
    let elapsed = now.signed_duration_since(last_vote);
    match chrono::Duration::from_std(cooldown) {
        Ok(cooldown) => elapsed < cooldown,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryVoteMemory;
    use crate::models::field::FieldValue;
    use crate::models::view::QuestionView;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn widget() -> FeedbackWidget {
        FeedbackWidget::new(
            "docs",
            "/intro",
            Arc::new(InMemoryVoteMemory::new()),
            Arc::new(ManualClock::new(now())),
        )
        .ask_question("accurate", "Was it accurate?")
        .ask_range_question("comfort", "How comfortable are you?")
        .ask_freeform_question("comments", "Anything else?")
    }

    #[test]
    fn cooldown_boundary() {
        let cooldown = DEFAULT_COOLDOWN;
        let span = chrono::Duration::from_std(cooldown).unwrap();
        let ms = chrono::Duration::milliseconds(1);

        assert!(recently_voted(Some(now() - span + ms), now(), cooldown));
        assert!(!recently_voted(Some(now() - span), now(), cooldown));
        assert!(!recently_voted(Some(now() - span - ms), now(), cooldown));
        assert!(!recently_voted(None, now(), cooldown));
        assert!(recently_voted(Some(now() + ms), now(), cooldown));
    }

    #[test]
    fn builders_append_in_order() {
        let widget = widget();
        let names: Vec<&str> = widget.questions().iter().map(|q| q.name()).collect();
        assert_eq!(names, vec!["accurate", "comfort", "comments"]);
        assert_eq!(widget.state(), WidgetState::NotVoted);
        assert_eq!(widget.identity(), "docs//intro");
        assert_eq!(widget.key(), "feedback-docs//intro");
    }

    #[test]
    fn open_renders_prompt() {
        let mut widget = widget();
        assert!(!widget.is_open());
        assert_eq!(widget.open(), WidgetView::Prompt);
        assert!(widget.is_open());
    }

    #[test]
    fn down_vote_shows_apology_and_cleared_questions() {
        let mut widget = widget();
        widget.vote(false).unwrap();
        assert_eq!(widget.state(), WidgetState::PendingVote { vote: false });

        match widget.view() {
            WidgetView::Survey {
                apology,
                questions,
                submitting,
            } => {
                assert!(apology);
                assert!(!submitting);
                assert_eq!(questions.len(), 3);
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert!(widget.questions().iter().all(|q| q.answer().is_none()));
    }

    #[test]
    fn up_vote_has_no_apology() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        assert!(matches!(
            widget.view(),
            WidgetView::Survey { apology: false, .. }
        ));
    }

    #[test]
    fn view_is_stable_across_calls() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        widget.respond(1, Response::Level(2)).unwrap();
        assert_eq!(widget.view(), widget.view());
    }

    #[test]
    fn revoting_after_cancel_clears_every_answer() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        widget.respond(0, Response::Binary(true)).unwrap();
        widget.respond(1, Response::Level(4)).unwrap();
        widget.respond(2, Response::Text("stale".to_owned())).unwrap();
        widget.cancel().unwrap();

        widget.vote(false).unwrap();
        assert!(widget.questions().iter().all(|q| q.answer().is_none()));
    }

    #[test]
    fn untouched_questions_are_not_submitted() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        widget.respond(1, Response::Level(3)).unwrap();

        let submission = widget.begin_submit().unwrap();
        assert!(submission.vote());
        assert_eq!(submission.identity(), "docs//intro");
        assert_eq!(submission.fields().len(), 1);
        assert_eq!(
            submission.fields().get("comfort"),
            Some(&FieldValue::Number(0.6))
        );
        assert!(!submission.fields().contains("accurate"));
        assert!(!submission.fields().contains("comments"));
    }

    #[test]
    fn invalid_transitions_fail_fast() {
        let mut widget = widget();
        assert_eq!(
            widget.begin_submit().unwrap_err(),
            WidgetError::InvalidTransition {
                action: "submit",
                state: "not voted",
            }
        );
        assert!(widget.cancel().is_err());
        assert!(widget.respond(0, Response::Binary(true)).is_err());

        widget.vote(true).unwrap();
        assert_eq!(
            widget.vote(false).unwrap_err(),
            WidgetError::InvalidTransition {
                action: "vote",
                state: "pending vote",
            }
        );
        assert_eq!(widget.state(), WidgetState::PendingVote { vote: true });
    }

    #[test]
    fn unknown_question_index_is_rejected() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        assert_eq!(
            widget.respond(7, Response::Binary(true)).unwrap_err(),
            WidgetError::UnknownQuestion(7)
        );
    }

    #[test]
    fn in_flight_submission_blocks_interaction() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        let submission = widget.begin_submit().unwrap();

        assert!(widget.is_submitting());
        assert!(matches!(
            widget.view(),
            WidgetView::Survey {
                submitting: true,
                ..
            }
        ));
        assert_eq!(
            widget.begin_submit().unwrap_err(),
            WidgetError::SubmissionInFlight
        );
        assert_eq!(widget.cancel().unwrap_err(), WidgetError::SubmissionInFlight);
        assert_eq!(
            widget.respond(0, Response::Binary(false)).unwrap_err(),
            WidgetError::SubmissionInFlight
        );
        assert_eq!(widget.reset().unwrap_err(), WidgetError::SubmissionInFlight);

        assert_eq!(
            widget.complete_submit(submission, Ok(())).unwrap(),
            WidgetState::Voted
        );
        assert!(!widget.is_submitting());
    }

    #[test]
    fn completing_without_begin_is_rejected() {
        let mut first = widget();
        first.vote(true).unwrap();
        let submission = first.begin_submit().unwrap();

        let mut second = widget();
        assert!(second.complete_submit(submission, Ok(())).is_err());
        assert_eq!(second.state(), WidgetState::NotVoted);
    }

    #[test]
    fn submission_from_another_page_is_rejected() {
        let mut intro = widget();
        intro.vote(true).unwrap();
        let intro_submission = intro.begin_submit().unwrap();

        let mut install = FeedbackWidget::new(
            "docs",
            "/install",
            Arc::new(InMemoryVoteMemory::new()),
            Arc::new(ManualClock::new(now())),
        );
        install.vote(false).unwrap();
        let install_submission = install.begin_submit().unwrap();

        assert_eq!(
            install.complete_submit(intro_submission, Ok(())).unwrap_err(),
            WidgetError::InvalidTransition {
                action: "complete another page's submission",
                state: "pending vote",
            }
        );
        assert!(install.is_submitting());
        assert_eq!(install.state(), WidgetState::PendingVote { vote: false });

        assert_eq!(
            install.complete_submit(install_submission, Ok(())).unwrap(),
            WidgetState::Voted
        );
    }

    #[test]
    fn reset_returns_to_prompt() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        let submission = widget.begin_submit().unwrap();
        widget.complete_submit(submission, Ok(())).unwrap();
        assert_eq!(widget.view(), WidgetView::Thanks);

        widget.reset().unwrap();
        assert_eq!(widget.view(), WidgetView::Prompt);
    }

    #[test]
    fn survey_reflects_answers() {
        let mut widget = widget();
        widget.vote(true).unwrap();
        widget.respond(0, Response::Binary(true)).unwrap();

        let WidgetView::Survey { questions, .. } = widget.view() else {
            panic!("expected survey");
        };
        assert_eq!(
            questions[0],
            QuestionView::Binary {
                name: "accurate".to_owned(),
                prompt: "Was it accurate?".to_owned(),
                up_selected: true,
                down_selected: false,
            }
        );
    }
}
