use deluge::api::beacon::{Beacon, HttpBeacon};
use deluge::widget::{FeedbackWidget, Submission, SystemClock};
use deluge::{
    BeaconError, FileVoteMemory, InMemoryVoteMemory, Response, VoteMemory, WidgetConfig,
};
use log::{error, info, warn};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Whether a successful action leaves a line in the on-screen log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Logging {
    Record,
    /// Answers fire on every keystroke.
    Quiet,
}

/// Host page state: the settings form plus the one mounted widget.
pub struct AppState {
    pub config: WidgetConfig,
    pub project: String,
    pub page_path: String,
    pub status_message: String,
    pub logs: Vec<String>,
    pub widget: Option<FeedbackWidget>,
    memory: Arc<dyn VoteMemory>,
    pending: Option<Submission>,
    outcome_receiver: Option<Receiver<Result<(), BeaconError>>>,
}

impl AppState {
    pub fn new(config: WidgetConfig) -> Self {
        let memory: Arc<dyn VoteMemory> = match &config.storage_path {
            Some(path) => Arc::new(FileVoteMemory::new(path)),
            None => {
                warn!("No storage path configured; votes are remembered for this session only");
                Arc::new(InMemoryVoteMemory::new())
            }
        };

        Self {
            config,
            project: "docs".to_owned(),
            page_path: "/intro".to_owned(),
            status_message: "Idle".to_owned(),
            logs: Vec::new(),
            widget: None,
            memory,
            pending: None,
            outcome_receiver: None,
        }
    }

    pub fn mount_widget(&mut self) {
        let mut widget = FeedbackWidget::with_config(
            self.project.clone(),
            self.page_path.clone(),
            &self.config,
            self.memory.clone(),
            Arc::new(SystemClock),
        )
        .ask_question("accurate", "Was the content accurate?")
        .ask_range_question("comfort", "How comfortable are you with this topic now?")
        .ask_freeform_question("comments", "Anything else we should know?");

        widget.open();
        self.status_message = format!("Mounted {} ({})", widget.identity(), widget.state());
        self.widget = Some(widget);
        self.pending = None;
        self.outcome_receiver = None;
    }

    pub fn unmount_widget(&mut self) {
        if self.pending.is_some() {
            self.status_message = "Wait for the submission to finish".to_owned();
            return;
        }
        self.widget = None;
        self.logs.clear();
        self.status_message = "Unmounted".to_owned();
    }

    pub fn vote(&mut self, vote: bool) {
        self.apply("vote", Logging::Record, |widget| widget.vote(vote));
    }

    pub fn cancel(&mut self) {
        self.apply("cancel", Logging::Record, |widget| widget.cancel());
    }

    pub fn respond(&mut self, index: usize, response: Response) {
        self.apply("answer", Logging::Quiet, |widget| widget.respond(index, response));
    }

    pub fn reset(&mut self) {
        self.apply("reset", Logging::Record, |widget| widget.reset());
    }

    /// Starts the beacon on a background thread; the outcome arrives through
    /// [`AppState::poll_submission`].
    pub fn submit(&mut self) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        let submission = match widget.begin_submit() {
            Ok(submission) => submission,
            Err(e) => {
                error!("Submit rejected: {}", e);
                self.status_message = format!("Submit rejected: {}", e);
                return;
            }
        };

        let beacon = match HttpBeacon::new(
            self.config.collector_url.clone(),
            self.config.request_timeout,
        ) {
            Ok(beacon) => beacon,
            Err(e) => {
                let outcome = Err(BeaconError::Other(e.to_string()));
                if let Err(e) = widget.complete_submit(submission, outcome) {
                    error!("Failed to settle submission: {}", e);
                }
                self.status_message = "Could not reach the collector".to_owned();
                return;
            }
        };

        let vote = submission.vote();
        let fields = submission.fields().clone();
        let identity = submission.identity().to_owned();
        let (sender, receiver) = std::sync::mpsc::channel();
        self.pending = Some(submission);
        self.outcome_receiver = Some(receiver);
        self.status_message = "Sending feedback...".to_owned();

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(beacon.send(vote, fields, &identity)),
                Err(e) => Err(BeaconError::Other(e.to_string())),
            };
            if sender.send(outcome).is_err() {
                warn!("Submission outcome dropped; widget was unmounted");
            }
        });
    }

    /// Applies a finished beacon outcome, if one has arrived.
    pub fn poll_submission(&mut self) {
        let outcome = match &self.outcome_receiver {
            Some(receiver) => match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(std::sync::mpsc::TryRecvError::Empty) => return,
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    Err(BeaconError::Other("submission thread exited".to_owned()))
                }
            },
            None => return,
        };
        self.outcome_receiver = None;

        let (Some(widget), Some(submission)) = (self.widget.as_mut(), self.pending.take()) else {
            return;
        };
        let delivered = outcome.is_ok();
        match widget.complete_submit(submission, outcome) {
            Ok(state) => {
                info!("Submission settled: {}", state);
                self.status_message = if delivered {
                    "Feedback sent".to_owned()
                } else {
                    "Feedback could not be sent".to_owned()
                };
                self.logs.push(format!("{} -> {}", widget.identity(), state));
            }
            Err(e) => error!("Failed to settle submission: {}", e),
        }
    }

    fn apply<F>(&mut self, action: &str, logging: Logging, f: F)
    where
        F: FnOnce(&mut FeedbackWidget) -> Result<(), deluge::WidgetError>,
    {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        match f(widget) {
            Ok(()) => {
                if logging == Logging::Record {
                    self.logs.push(format!("{}: {}", action, widget.state()));
                }
            }
            Err(e) => {
                error!("{} rejected: {}", action, e);
                self.status_message = format!("{} rejected: {}", action, e);
            }
        }
    }
}
