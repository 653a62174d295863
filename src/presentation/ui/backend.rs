use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::application::SaveOutcome;
use crate::application::use_cases::SaveSpiceUseCase;
use crate::domain::entities::SaveRequest;
use crate::domain::errors::StoreError;

/// Results reported back to the UI loop.
#[derive(Debug)]
pub enum Action {
    /// Write accepted by the store.
    SpiceSaved(SaveOutcome),
    /// Write failed; not retried.
    SaveFailed {
        /// Name of the spice being saved.
        name: String,
        /// Store failure.
        error: StoreError,
    },
}

/// Work requested by the UI loop.
pub enum BackendCommand {
    /// Perform one create or replace.
    Save(SaveRequest),
}

/// Worker that performs store writes off the UI loop.
pub struct Backend {
    save_use_case: SaveSpiceUseCase,
    command_rx: mpsc::UnboundedReceiver<BackendCommand>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Backend {
    /// Creates worker.
    pub const fn new(
        save_use_case: SaveSpiceUseCase,
        command_rx: mpsc::UnboundedReceiver<BackendCommand>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            save_use_case,
            command_rx,
            action_tx,
        }
    }

    /// Runs until the command channel closes.
    pub async fn run(mut self) {
        info!("Backend worker started");
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }
        info!("Backend worker stopped");
    }

    /// Each write runs in its own task, so saves never queue behind each other.
    fn handle_command(&self, command: BackendCommand) {
        match command {
            BackendCommand::Save(request) => {
                let use_case = self.save_use_case.clone();
                let action_tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let name = request.fields().name.clone();
                    let action = match use_case.execute(request).await {
                        Ok(outcome) => {
                            debug!(%outcome, "Save finished");
                            Action::SpiceSaved(outcome)
                        }
                        Err(error) => {
                            error!(name = %name, error = %error, "Save failed");
                            Action::SaveFailed { name, error }
                        }
                    };
                    let _ = action_tx.send(action);
                });
            }
        }
    }
}
