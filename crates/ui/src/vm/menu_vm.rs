use crossterm::event::KeyCode;

/// What a key press did to a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Enter on the highlighted item, by index.
    Picked(usize),
    Back,
    None,
}

/// Vertical picker: arrows move, Enter picks, `q` backs out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuVm {
    pub title: String,
    pub items: Vec<String>,
    selected: usize,
}

impl MenuVm {
    #[must_use]
    pub fn new(title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: 0,
        }
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, code: KeyCode) -> MenuAction {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                MenuAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
                MenuAction::None
            }
            KeyCode::Enter if !self.items.is_empty() => MenuAction::Picked(self.selected),
            KeyCode::Char('q') | KeyCode::Esc => MenuAction::Back,
            _ => MenuAction::None,
        }
    }
}
