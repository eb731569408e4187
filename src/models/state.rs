use std::fmt;

/// Where the widget is in the vote -> survey -> submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    NotVoted,
    PendingVote { vote: bool },
    Voted,
}

impl WidgetState {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetState::NotVoted => "not voted",
            WidgetState::PendingVote { .. } => "pending vote",
            WidgetState::Voted => "voted",
        }
    }
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetState::PendingVote { vote } => write!(f, "pending vote ({})", vote),
            other => f.write_str(other.name()),
        }
    }
}
