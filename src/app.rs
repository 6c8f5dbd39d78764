use crate::events::terminal::{Action, Handler as TerminalEventHandler};
use crate::ui::{self, FieldView, FormView, StatusView};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use form_state::logger::LogBuffer;
use form_state::validity::InputKind;
use form_state::{
    bind, BoundField, ChangeEvent, ChangeInput, Config, FormDefinition, FormHandle, FormOptions,
    SubmitEvent, SubmitOutcome, Submission,
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::{json, Value};
use std::io::{self, stdout};
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the demo submission takes to settle.
///
const SUBMIT_DELAY_IN_MS: u64 = 2400;

/// Email address the demo submission rejects.
///
const REJECTED_EMAIL: &str = "error@example.com";

type FieldComponent = fn(&form_state::BoundProps) -> FieldView;
type StatusComponent = fn(&form_state::BoundProps) -> StatusView;

/// Oversees event processing, form state and terminal output.
///
pub struct App {
    form: FormHandle,
    definition: FormDefinition,
    fields: Vec<BoundField<FieldComponent>>,
    status: BoundField<StatusComponent>,
    focus: usize,
    spinner: usize,
    logs: LogBuffer,
    outcomes_tx: mpsc::UnboundedSender<SubmitOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<SubmitOutcome>,
}

/// Form options for the demo: a slow submission that fails for one address.
///
fn demo_options(definition: &FormDefinition) -> FormOptions {
    definition
        .options()
        .on_submit(|data, _| {
            Submission::pending(async move {
                info!("Sending registration...");
                tokio::time::sleep(Duration::from_millis(SUBMIT_DELAY_IN_MS)).await;
                if data.get("email") == Some(&json!(REJECTED_EMAIL)) {
                    Err(json!("Oops Something went wrong..."))
                } else {
                    Ok(data)
                }
            })
        })
        .on_submitted(|result| info!("Registration complete: {}", result))
}

impl App {
    /// Build the form described by the configuration and mount its surface.
    ///
    pub async fn new(config: &Config, logs: LogBuffer) -> Result<App> {
        let definition = config.definition.clone();
        let form = FormHandle::new(demo_options(&definition));
        form.mount(definition.surface()?).await?;

        let input = bind(ui::field_view as FieldComponent);
        let fields = definition
            .fields
            .iter()
            .map(|field| input.instantiate(&form, field.props()))
            .collect::<Result<Vec<_>, _>>()?;
        let status = bind(ui::status_view as StatusComponent)
            .instantiate(&form, form_state::FieldProps::new())?;

        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Ok(App {
            form,
            definition,
            fields,
            status,
            focus: 0,
            spinner: 0,
            logs,
            outcomes_tx,
            outcomes_rx,
        })
    }

    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config, logs: LogBuffer) -> Result<()> {
        info!("Starting application...");
        let mut app = App::new(&config, logs).await?;
        app.start_ui().await?;
        info!("Exiting application...");
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run(&mut terminal).await;

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            self.drain_outcomes();
            let view = self.view().await;
            terminal.draw(|frame| ui::render(frame, &view))?;
            let action = terminal_event_handler.next()?;
            if !self.handle(action).await? {
                debug!("Received application exit request.");
                return Ok(());
            }
        }
    }

    /// Collect everything the next frame draws.
    ///
    pub async fn view(&self) -> FormView {
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            fields.push(field.render().await);
        }
        FormView {
            title: self.definition.title.clone(),
            class_list: self.form.attributes().await.class_list(),
            fields,
            focus: self.focus,
            status: self.status.render().await,
            logs: self.logs.entries(),
            spinner: self.spinner,
        }
    }

    /// Apply one action. Returns false if exit was requested.
    ///
    pub async fn handle(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Quit => return Ok(false),
            Action::Tick => {
                self.spinner = (self.spinner + 1) % ui::SPINNER_FRAME_COUNT;
            }
            Action::NextField if !self.fields.is_empty() => {
                self.focus = (self.focus + 1) % self.fields.len();
            }
            Action::PreviousField if !self.fields.is_empty() => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            }
            Action::Input(c) => self.input(c).await?,
            Action::Backspace => {
                if let Some(field) = self.focused_field() {
                    field
                        .on_change()
                        .call(ChangeInput::transform(|previous| match previous.as_str() {
                            Some(text) => {
                                let mut text = text.to_string();
                                text.pop();
                                Value::String(text)
                            }
                            None => previous.clone(),
                        }))
                        .await?;
                }
            }
            Action::Submit => self.submit(),
            _ => (),
        }
        Ok(true)
    }

    fn focused_field(&self) -> Option<&BoundField<FieldComponent>> {
        self.fields.get(self.focus)
    }

    async fn input(&mut self, c: char) -> Result<()> {
        let field = match self.focused_field() {
            Some(field) => field,
            None => return Ok(()),
        };
        let view = field.render().await;
        let event = match view.kind {
            InputKind::Checkbox if c == ' ' => ChangeEvent::checkbox(!view.checked),
            InputKind::Checkbox => return Ok(()),
            _ => ChangeEvent::input(format!("{}{}", view.text, c)),
        };
        field.on_change().call(event).await?;
        Ok(())
    }

    /// Submit on a separate task so the render loop keeps running while the
    /// submission is in flight.
    ///
    fn submit(&self) {
        let form = self.form.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let mut event = SubmitEvent::new();
            match form.submit(&mut event).await {
                Ok(outcome) => {
                    debug!("Submission ended with {:?}", outcome);
                    let _ = outcomes.send(outcome);
                }
                Err(e) => error!("Failed to submit form: {}", e),
            }
        });
    }

    /// Move focus to the first invalid field after a rejected submit.
    ///
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            if let SubmitOutcome::Invalid {
                focused: Some(name),
            } = outcome
            {
                if let Some(index) = self.fields.iter().position(|f| f.name() == Some(name.as_str())) {
                    self.focus = index;
                }
            }
        }
    }
}
