//! Interactive arena session
//!
//! Runs the setup menu, streams each debate, offers exports and keeps a
//! [`SessionLog`] of everything run until the user exits.

use crate::config::SessionDefaults;
use crate::menu::SetupMenu;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use arena_application::ports::progress::ProgressNotifier;
use arena_application::{
    DebateControl, DebateExporter, LlmGateway, ModelSelector, RunDebateInput, RunDebateUseCase,
};
use arena_domain::{Debate, DebateConfig, DebateRecord, SessionLog};
use dialoguer::Confirm;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Menu-driven loop over debates
pub struct ArenaSession<G: LlmGateway + 'static> {
    use_case: RunDebateUseCase<G>,
    selector: ModelSelector,
    exporter: Arc<dyn DebateExporter>,
    defaults: SessionDefaults,
    log: SessionLog,
}

impl<G: LlmGateway + 'static> ArenaSession<G> {
    pub fn new(
        use_case: RunDebateUseCase<G>,
        selector: ModelSelector,
        exporter: Arc<dyn DebateExporter>,
    ) -> Self {
        Self {
            use_case,
            selector,
            exporter,
            defaults: SessionDefaults::default(),
            log: SessionLog::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: SessionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Debates run so far
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Run until the user exits. Ctrl+C at a prompt leaves the menu; other
    /// prompt failures end the session with an error.
    pub async fn run(&mut self) -> dialoguer::Result<()> {
        println!("{}", ConsoleFormatter::welcome(&self.selector.missing_credentials()));

        match self.menu_loop().await {
            Err(e) if is_interrupt(&e) => println!(),
            other => other?,
        }
        match self.finish() {
            Err(e) if is_interrupt(&e) => println!(),
            other => other?,
        }
        println!("Bye!");
        Ok(())
    }

    async fn menu_loop(&mut self) -> dialoguer::Result<()> {
        loop {
            let menu = SetupMenu::new(&self.selector, &self.defaults);
            let Some(kind) = menu.choose_kind()? else {
                return Ok(());
            };
            if let Some(config) = menu.configure(kind)? {
                self.run_debate(config).await?;
            }

            let again = Confirm::new()
                .with_prompt("Start another debate?")
                .default(true)
                .interact()?;
            if !again {
                return Ok(());
            }
        }
    }

    async fn run_debate(&mut self, config: DebateConfig) -> dialoguer::Result<()> {
        let control = DebateControl::new();
        let interrupt = spawn_interrupt_listener(control.clone());

        let progress: Box<dyn ProgressNotifier> = if self.defaults.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };
        let input = RunDebateInput::new(config).with_control(control);
        let result = self
            .use_case
            .execute_with_progress(input, progress.as_ref())
            .await;
        interrupt.abort();

        match result {
            Ok(debate) => {
                let record = self.offer_export(&debate)?;
                self.log.push(record);
            }
            Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
        }
        Ok(())
    }

    fn offer_export(&self, debate: &Debate) -> dialoguer::Result<DebateRecord> {
        let record = DebateRecord::from_debate(debate);
        if debate.transcript().is_empty() {
            return Ok(record);
        }
        let export = Confirm::new()
            .with_prompt("Export the transcript to markdown?")
            .default(true)
            .interact()?;
        if !export {
            return Ok(record);
        }
        Ok(match self.exporter.export_debate(debate) {
            Ok(path) => {
                println!("{}", ConsoleFormatter::notice(&format!("Saved {}", path.display())));
                record.with_export_path(path)
            }
            Err(e) => {
                println!("{}", ConsoleFormatter::error(&e.to_string()));
                record
            }
        })
    }

    /// Session summary on exit, with an optional export
    fn finish(&self) -> dialoguer::Result<()> {
        if self.log.is_empty() {
            return Ok(());
        }
        println!("{}", ConsoleFormatter::session_summary(&self.log));
        let export = Confirm::new()
            .with_prompt("Export a session summary?")
            .default(false)
            .interact()?;
        if export {
            match self.exporter.export_session_summary(&self.log) {
                Ok(path) => {
                    println!("{}", ConsoleFormatter::notice(&format!("Saved {}", path.display())))
                }
                Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
            }
        }
        Ok(())
    }
}

fn is_interrupt(error: &dialoguer::Error) -> bool {
    matches!(error, dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted)
}

/// Abort the debate on Ctrl+C; the returned task must be aborted once the
/// debate is over
fn spawn_interrupt_listener(control: DebateControl) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            control.abort();
        }
    })
}
