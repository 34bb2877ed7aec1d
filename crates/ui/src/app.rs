use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quiz_core::model::{DeckFileName, DeckScope, SubjectName};
use services::{FileOption, QuizLoopService, SessionReport};
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::error::UiError;
use crate::terminal::TerminalSession;
use crate::views::{render_menu, render_prompt, render_question, render_summary};
use crate::vm::{MenuAction, MenuVm, SessionIntent, SessionVm, SummaryVm};

/// What to study; unset fields are asked for interactively.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyRequest {
    pub subject: Option<SubjectName>,
    pub file: Option<DeckFileName>,
}

/// How an interactive run ended.
#[derive(Debug)]
pub enum StudyOutcome {
    NoSubjects,
    NoFiles(SubjectName),
    NoCards,
    Cancelled,
    Completed(SessionReport),
}

impl StudyOutcome {
    /// Line to print once the terminal is restored, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            StudyOutcome::NoSubjects => Some("No subjects found.".to_owned()),
            StudyOutcome::NoFiles(subject) => {
                Some(format!("No JSON flashcard files found in {subject}."))
            }
            StudyOutcome::NoCards => Some("No cards found in the selected file(s).".to_owned()),
            StudyOutcome::Cancelled | StudyOutcome::Completed(_) => None,
        }
    }
}

/// Interactive study flow: subject menu, reset prompt, file menu, quiz,
/// summary.
pub struct TerminalApp {
    ctx: AppContext,
}

impl TerminalApp {
    #[must_use]
    pub fn from_context(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Run one study session in the terminal.
    ///
    /// # Errors
    ///
    /// Returns `UiError` if the terminal fails or the library or progress
    /// store cannot be read.
    pub async fn run(&self, request: StudyRequest) -> Result<StudyOutcome, UiError> {
        let subjects = self.ctx.catalog().list_subjects().await?;
        if subjects.is_empty() {
            return Ok(StudyOutcome::NoSubjects);
        }

        let mut term = TerminalSession::enter()?;
        let outcome = self.study(&mut term, &subjects, &request).await;
        term.restore()?;

        if let Ok(outcome) = &outcome {
            debug!(?outcome, "study run ended");
        }
        outcome
    }

    async fn study(
        &self,
        term: &mut TerminalSession,
        subjects: &[SubjectName],
        request: &StudyRequest,
    ) -> Result<StudyOutcome, UiError> {
        let catalog = self.ctx.catalog();

        loop {
            let subject = match &request.subject {
                Some(subject) => subject.clone(),
                None => match pick_subject(term, subjects).await? {
                    Some(subject) => subject,
                    None => return Ok(StudyOutcome::Cancelled),
                },
            };

            let files = catalog.list_files(&subject).await?;
            if files.is_empty() {
                return Ok(StudyOutcome::NoFiles(subject));
            }

            let question = format!("Do you want to reset progress for '{subject}'?");
            if confirm(term, &question).await? && catalog.reset_subject(&subject).await? {
                info!(%subject, "progress reset from the study menu");
            }

            let scope = match &request.file {
                Some(file) => DeckScope::File(file.clone()),
                None => {
                    let options = catalog.file_options(&subject).await?;
                    match pick_file(term, &subject, &options).await? {
                        Some(scope) => scope,
                        None if request.subject.is_some() => return Ok(StudyOutcome::Cancelled),
                        None => continue,
                    }
                }
            };

            return self.quiz(term, &subject, &scope).await;
        }
    }

    async fn quiz(
        &self,
        term: &mut TerminalSession,
        subject: &SubjectName,
        scope: &DeckScope,
    ) -> Result<StudyOutcome, UiError> {
        let service = self.ctx.session_loop();
        let active = service.start_session(subject, scope).await?;
        if active.session().total_cards() == 0 {
            return Ok(StudyOutcome::NoCards);
        }

        let mut vm = SessionVm::new(active);
        let mut report = self.ask_until_done(term, &service, &mut vm).await?;

        loop {
            let summary = SummaryVm::new(
                &report.summary,
                report.save_error.as_ref().map(ToString::to_string).as_deref(),
            );
            term.draw(|frame| render_summary(frame, &summary))?;
            let key = term.next_key().await?;
            if report.is_saved() || key.code != KeyCode::Char('r') {
                break;
            }
            report = vm.finish(&service).await?;
        }

        Ok(StudyOutcome::Completed(report))
    }

    async fn ask_until_done(
        &self,
        term: &mut TerminalSession,
        service: &QuizLoopService,
        vm: &mut SessionVm,
    ) -> Result<SessionReport, UiError> {
        match self.ask_cards(term, service, vm).await {
            Ok(AskEnd::Quit) => Ok(vm.quit(service).await?),
            Ok(AskEnd::Done) => Ok(vm.finish(service).await?),
            Err(err) => {
                save_interrupted(service, vm).await;
                Err(err)
            }
        }
    }

    async fn ask_cards(
        &self,
        term: &mut TerminalSession,
        service: &QuizLoopService,
        vm: &mut SessionVm,
    ) -> Result<AskEnd, UiError> {
        while vm.present(service) {
            loop {
                term.draw(|frame| render_question(frame, vm))?;
                let key = term.next_key().await?;
                let intent = if is_interrupt(&key) {
                    Some(SessionIntent::Quit)
                } else {
                    vm.handle_key(key.code)
                };

                match intent {
                    Some(SessionIntent::Quit) => return Ok(AskEnd::Quit),
                    Some(SessionIntent::Pick(number)) => {
                        if vm.pick(service, number)?.is_some() {
                            term.draw(|frame| render_question(frame, vm))?;
                            tokio::time::sleep(self.ctx.feedback_delay()).await;
                            break;
                        }
                    }
                    None => {}
                }
            }
        }

        Ok(AskEnd::Done)
    }
}

enum AskEnd {
    Done,
    Quit,
}

/// Save what was answered before the quiz loop failed. Best effort: failures
/// are logged and the loop's own error is what the caller sees.
async fn save_interrupted(service: &QuizLoopService, vm: &mut SessionVm) -> Option<SessionReport> {
    let result = if vm.active().session().is_running() {
        vm.quit(service).await
    } else {
        vm.finish(service).await
    };

    match result {
        Ok(report) => {
            if let Some(err) = &report.save_error {
                warn!(error = %err, "could not save progress after the quiz was interrupted");
            } else {
                info!("progress saved after the quiz was interrupted");
            }
            Some(report)
        }
        Err(err) => {
            warn!(error = %err, "could not end the interrupted session");
            None
        }
    }
}

async fn pick_subject(
    term: &mut TerminalSession,
    subjects: &[SubjectName],
) -> Result<Option<SubjectName>, UiError> {
    let items = subjects.iter().map(ToString::to_string).collect();
    let mut menu = MenuVm::new("Choose a subject:", items);
    Ok(run_menu(term, &mut menu)
        .await?
        .and_then(|index| subjects.get(index).cloned()))
}

async fn pick_file(
    term: &mut TerminalSession,
    subject: &SubjectName,
    options: &[FileOption],
) -> Result<Option<DeckScope>, UiError> {
    let items = options.iter().map(FileOption::label).collect();
    let mut menu = MenuVm::new(format!("Choose file in {subject}:"), items);
    Ok(run_menu(term, &mut menu)
        .await?
        .and_then(|index| options.get(index))
        .map(|option| option.scope.clone()))
}

async fn run_menu(term: &mut TerminalSession, menu: &mut MenuVm) -> Result<Option<usize>, UiError> {
    loop {
        term.draw(|frame| render_menu(frame, menu))?;
        let key = term.next_key().await?;
        if is_interrupt(&key) {
            return Ok(None);
        }
        match menu.handle_key(key.code) {
            MenuAction::Picked(index) => return Ok(Some(index)),
            MenuAction::Back => return Ok(None),
            MenuAction::None => {}
        }
    }
}

async fn confirm(term: &mut TerminalSession, question: &str) -> Result<bool, UiError> {
    loop {
        term.draw(|frame| render_prompt(frame, question))?;
        let key = term.next_key().await?;
        if is_interrupt(&key) {
            return Ok(false);
        }
        match key.code {
            KeyCode::Char('y' | 'Y') => return Ok(true),
            KeyCode::Char('n' | 'N') | KeyCode::Enter | KeyCode::Esc => return Ok(false),
            _ => {}
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
