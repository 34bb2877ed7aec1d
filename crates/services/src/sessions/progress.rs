/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub round: u32,
    pub round_size: usize,
    pub answered_in_round: usize,
    pub remaining_in_round: usize,
    pub correct_so_far: usize,
    pub mastered: usize,
    pub total: usize,
    pub is_complete: bool,
}
