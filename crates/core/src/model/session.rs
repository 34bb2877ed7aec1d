/// How a quiz session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every card was answered correctly at least once.
    Finished,
    /// The user quit at a card boundary; partial progress was still committed.
    Aborted,
}

/// Read-only report computed once when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    outcome: SessionOutcome,
    mastered_count: usize,
    total_count: usize,
    time_this_session_secs: u64,
    time_total_secs: u64,
}

impl SessionSummary {
    #[must_use]
    pub fn new(
        outcome: SessionOutcome,
        mastered_count: usize,
        total_count: usize,
        time_this_session_secs: u64,
        time_total_secs: u64,
    ) -> Self {
        Self {
            outcome,
            mastered_count,
            total_count,
            time_this_session_secs,
            time_total_secs,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    /// Questions mastered for the subject, which may include questions from
    /// other files of the same subject.
    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.mastered_count
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub fn time_this_session_secs(&self) -> u64 {
        self.time_this_session_secs
    }

    #[must_use]
    pub fn time_total_secs(&self) -> u64 {
        self.time_total_secs
    }

    /// Cards still to master, saturating at zero.
    #[must_use]
    pub fn cards_left(&self) -> usize {
        self.total_count.saturating_sub(self.mastered_count)
    }
}
