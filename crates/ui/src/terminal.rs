use std::io::{self, Stdout};

use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

/// Raw-mode alternate screen for the duration of a study run.
///
/// Restores the terminal on `restore`, on drop, and from the panic hook.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventStream,
    restored: bool,
}

impl TerminalSession {
    /// # Errors
    ///
    /// Returns `io::Error` if the terminal cannot be switched to raw mode.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(info);
        }));

        Ok(Self {
            terminal,
            events: EventStream::new(),
            restored: false,
        })
    }

    /// # Errors
    ///
    /// Returns `io::Error` if drawing fails.
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Wait for the next key press, skipping releases and non-key events.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the event stream fails or ends.
    pub async fn next_key(&mut self) -> io::Result<KeyEvent> {
        while let Some(event) = self.events.next().await {
            if let Event::Key(key) = event? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "terminal event stream closed",
        ))
    }

    /// # Errors
    ///
    /// Returns `io::Error` if the terminal cannot be restored.
    pub fn restore(mut self) -> io::Result<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore_inner();
    }
}
