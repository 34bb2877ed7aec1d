use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::vm::MenuVm;

pub fn render_menu(frame: &mut Frame, menu: &MenuVm) {
    let [title, body, hint] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(Line::from(format!("  {}", menu.title))), title);

    let items: Vec<ListItem> = menu
        .items
        .iter()
        .map(|item| ListItem::new(format!("  {item}")))
        .collect();
    let list = List::new(items)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(menu.selected()));
    frame.render_stateful_widget(list, body, &mut state);

    frame.render_widget(
        Paragraph::new("  Up/Down to move, Enter to pick, q to go back"),
        hint,
    );
}
