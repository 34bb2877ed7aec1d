use quiz_core::model::{SessionSummary, SubjectName};
use tracing::{debug, info};

/// Notable moments in a quiz session.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    Started {
        subject: &'a SubjectName,
        cards: usize,
    },
    QuestionShown {
        round: u32,
        question: &'a str,
    },
    Answered {
        question: &'a str,
        correct: bool,
    },
    RoundStarted {
        round: u32,
        cards: usize,
    },
    Ended {
        subject: &'a SubjectName,
        summary: &'a SessionSummary,
    },
}

/// Receives session events. Must not block.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent<'_>);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&self, _event: &SessionEvent<'_>) {}
}

/// Logs session events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_event(&self, event: &SessionEvent<'_>) {
        match *event {
            SessionEvent::Started { subject, cards } => {
                info!(%subject, cards, "session started");
            }
            SessionEvent::QuestionShown { round, question } => {
                debug!(round, question, "question shown");
            }
            SessionEvent::Answered { question, correct } => {
                debug!(question, correct, "answer recorded");
            }
            SessionEvent::RoundStarted { round, cards } => {
                info!(round, cards, "retry round started");
            }
            SessionEvent::Ended { subject, summary } => {
                info!(
                    %subject,
                    outcome = ?summary.outcome(),
                    mastered = summary.mastered_count(),
                    total = summary.total_count(),
                    secs = summary.time_this_session_secs(),
                    "session ended"
                );
            }
        }
    }
}
