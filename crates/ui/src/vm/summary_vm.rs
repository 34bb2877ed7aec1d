use quiz_core::model::{SessionOutcome, SessionSummary};

use crate::vm::time_fmt::format_duration;

/// Display strings for the end-of-session screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub title: String,
    pub time_this_session: String,
    pub time_total: String,
    pub mastered: String,
    pub cards_left: String,
    pub terms_learned: String,
    pub save_warning: Option<String>,
}

impl SummaryVm {
    #[must_use]
    pub fn new(summary: &SessionSummary, save_error: Option<&str>) -> Self {
        let title = match summary.outcome() {
            SessionOutcome::Finished => "Study Session Summary",
            SessionOutcome::Aborted => "Study Session Summary (stopped early)",
        };

        Self {
            title: title.to_owned(),
            time_this_session: format!(
                "Time this session: {}",
                format_duration(summary.time_this_session_secs())
            ),
            time_total: format!(
                "Total time spent: {}",
                format_duration(summary.time_total_secs())
            ),
            mastered: format!(
                "Cards mastered: {}/{}",
                summary.mastered_count(),
                summary.total_count()
            ),
            cards_left: format!("Cards left to master: {}", summary.cards_left()),
            terms_learned: format!("Total terms learned: {}", summary.mastered_count()),
            save_warning: save_error.map(|err| format!("Progress was not saved: {err}")),
        }
    }
}
