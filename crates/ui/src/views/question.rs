use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::vm::{ChoiceMark, SessionPhase, SessionVm};

pub fn render_question(frame: &mut Frame, vm: &SessionVm) {
    let Some(card) = vm.card() else {
        return;
    };

    let mut lines = vec![
        Line::styled(
            format!("  {}", vm.status_line()),
            Style::default().fg(Color::DarkGray),
        ),
        Line::default(),
        Line::styled(
            format!("  Q: {}", card.question()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::default(),
    ];

    for (i, (choice, mark)) in card.choices().iter().zip(vm.marks()).enumerate() {
        let style = match mark {
            ChoiceMark::Plain => Style::default(),
            ChoiceMark::Correct => Style::default().fg(Color::Green),
            ChoiceMark::Wrong => Style::default().fg(Color::Red),
        };
        lines.push(Line::styled(format!("    {}. {choice}", i + 1), style));
    }

    lines.push(Line::default());
    lines.push(match vm.phase() {
        SessionPhase::Prompt => Line::from(vec![
            Span::raw(format!("  Select (1-{}), q to quit: ", card.len())),
            Span::raw(vm.typed().to_owned()),
        ]),
        SessionPhase::Feedback { correct: true, .. } => {
            Line::styled("  Correct!", Style::default().fg(Color::Green))
        }
        SessionPhase::Feedback { correct: false, .. } => Line::styled(
            format!("  Wrong, the answer is: {}", card.answer()),
            Style::default().fg(Color::Red),
        ),
    });

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), frame.area());
}
