use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::vm::SummaryVm;

pub fn render_summary(frame: &mut Frame, vm: &SummaryVm) {
    let mut lines = vec![
        Line::default(),
        Line::styled(
            format!("  {}", vm.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::from(format!("    {}", vm.time_this_session)),
        Line::from(format!("    {}", vm.time_total)),
        Line::default(),
        Line::styled(
            format!("    {}", vm.mastered),
            Style::default().fg(Color::Green),
        ),
        Line::styled(
            format!("    {}", vm.cards_left),
            Style::default().fg(Color::Red),
        ),
        Line::from(format!("    {}", vm.terms_learned)),
        Line::default(),
    ];
    if let Some(warning) = &vm.save_warning {
        lines.push(Line::styled(
            format!("  {warning}"),
            Style::default().fg(Color::Yellow),
        ));
        lines.push(Line::from("  Press r to retry saving, any other key to exit..."));
    } else {
        lines.push(Line::from("  Press any key to exit..."));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), frame.area());
}
