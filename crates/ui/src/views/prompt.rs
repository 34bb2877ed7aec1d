use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

/// Yes/no question, e.g. whether to reset a subject.
pub fn render_prompt(frame: &mut Frame, question: &str) {
    let lines = vec![
        Line::default(),
        Line::from(vec![
            Span::raw(format!("  {question} ")),
            Span::styled("(y/n)", Style::default().fg(Color::Yellow)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), frame.area());
}
