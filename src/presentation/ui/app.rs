//! Main application orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::application::SaveOutcome;
use crate::application::use_cases::{SaveSpiceUseCase, WatchSpicesUseCase};
use crate::domain::SyncStatus;
use crate::domain::entities::SaveRequest;
use crate::domain::errors::StoreError;
use crate::domain::ports::{DocumentStorePort, SnapshotEvent, Subscription};
use crate::infrastructure::config::AppConfig;
use crate::presentation::events::{EventResult, is_press};
use crate::presentation::theme::Theme;
use crate::presentation::ui::backend::{Action, Backend, BackendCommand};
use crate::presentation::ui::list_screen::{ListKeyResult, ListScreen, ListScreenState};
use crate::presentation::widgets::StatusLevel;

const STATUS_TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Running,
    Exiting,
}

/// Root of the terminal UI: owns the list screen, the subscription and the save worker.
pub struct App {
    state: AppState,
    screen: ListScreenState,
    watch_use_case: WatchSpicesUseCase,
    subscription: Option<Subscription>,
    backend: Option<Backend>,
    command_tx: mpsc::UnboundedSender<BackendCommand>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    status_duration: Duration,
}

impl App {
    /// Creates app over `store`. Nothing runs until `run`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>, config: &AppConfig) -> Self {
        let collection = config.store.collection.clone();
        let watch_use_case = WatchSpicesUseCase::new(store.clone(), collection.clone());
        let save_use_case = SaveSpiceUseCase::new(store, collection);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let backend = Backend::new(save_use_case, command_rx, action_tx);

        Self {
            state: AppState::Running,
            screen: ListScreenState::new(Theme::from_config(&config.theme), config.ui.show_emoji),
            watch_use_case,
            subscription: None,
            backend: Some(backend),
            command_tx,
            action_rx,
            status_duration: Duration::from_secs(config.ui.status_duration),
        }
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.mount();
        let result = self.run_event_loop(terminal).await;
        self.unmount();

        info!("Application exiting normally");
        result
    }

    /// Starts the save worker and opens the collection subscription.
    fn mount(&mut self) {
        if let Some(backend) = self.backend.take() {
            tokio::spawn(backend.run());
        }

        match self.watch_use_case.execute() {
            Ok(subscription) => {
                self.screen.set_sync_status(SyncStatus::Connecting);
                self.subscription = Some(subscription);
            }
            Err(e) => {
                error!(error = %e, "Failed to subscribe to spices");
                self.screen.set_sync_status(SyncStatus::Stopped);
                self.screen
                    .set_status(e.to_string(), StatusLevel::Error, self.status_duration);
            }
        }
    }

    fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            debug!("Cancelling spice subscription");
            subscription.cancel();
        }
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut status_interval = interval(STATUS_TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.state != AppState::Exiting {
            let snapshot_future = match &mut self.subscription {
                Some(subscription) => futures_util::future::Either::Left(subscription.recv()),
                None => futures_util::future::Either::Right(std::future::pending()),
            };
            let terminal_event = terminal_events.next();

            tokio::select! {
                biased;

                event = snapshot_future => {
                    self.handle_snapshot_event(event);
                    terminal.draw(|frame| self.render(frame))?;
                }

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                    terminal.draw(|frame| self.render(frame))?;
                }

                Some(Ok(event)) = terminal_event => {
                    if self.handle_terminal_event(event) == EventResult::Exit {
                        self.state = AppState::Exiting;
                    }
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = status_interval.tick() => {
                    if self.screen.expire_status(Instant::now()) {
                        terminal.draw(|frame| self.render(frame))?;
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) if is_press(&key) => self.handle_key(key),
            _ => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        match self.screen.handle_key(key) {
            ListKeyResult::Quit => EventResult::Exit,
            ListKeyResult::Save(request) => {
                self.save(request);
                EventResult::Continue
            }
            ListKeyResult::Consumed => EventResult::Continue,
        }
    }

    /// Hands the write to the worker. The modal is already closed; the list
    /// changes only when the subscription reports the write.
    fn save(&mut self, request: SaveRequest) {
        debug!(name = %request.fields().name, "Queueing save");
        if self.command_tx.send(BackendCommand::Save(request)).is_err() {
            warn!("Backend worker is gone, save dropped");
            self.screen.set_status(
                "Save failed: worker stopped",
                StatusLevel::Error,
                self.status_duration,
            );
        }
    }

    fn handle_snapshot_event(&mut self, event: Option<SnapshotEvent>) {
        match event {
            Some(SnapshotEvent::Snapshot(snapshot)) => {
                let spices = WatchSpicesUseCase::list_from_snapshot(snapshot);
                self.screen.apply_snapshot(spices);
            }
            Some(SnapshotEvent::Error(e)) => {
                warn!(error = %e, "Spice subscription stopped");
                self.stop_sync(&e);
            }
            None => {
                warn!("Spice subscription closed");
                self.stop_sync(&StoreError::SubscriptionClosed);
            }
        }
    }

    fn stop_sync(&mut self, error: &StoreError) {
        self.subscription = None;
        self.screen.set_sync_status(SyncStatus::Stopped);
        self.screen.set_status(
            format!("Sync stopped: {error}"),
            StatusLevel::Warning,
            self.status_duration,
        );
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::SpiceSaved(outcome) => {
                let text = match &outcome {
                    SaveOutcome::Created(_) => "Spice added",
                    SaveOutcome::Replaced(_) => "Spice saved",
                };
                self.screen
                    .set_status(text, StatusLevel::Success, self.status_duration);
            }
            Action::SaveFailed { name, error } => {
                self.screen.set_status(
                    format!("Could not save {name}: {error}"),
                    StatusLevel::Error,
                    self.status_duration,
                );
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        frame.render_stateful_widget(ListScreen, frame.area(), &mut self.screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    use crate::domain::entities::{SpiceFields, SpiceId, StatusFlag};
    use crate::domain::ports::mocks::MockDocumentStorePort;
    use crate::domain::ports::{Document, SubscriptionHandle};
    use crate::infrastructure::InMemoryDocumentStore;

    const WAIT: Duration = Duration::from_secs(2);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn cumin() -> Document {
        Document::new(
            SpiceId::new("a1").unwrap(),
            SpiceFields::named("Cumin").with_flag(StatusFlag::RunningLow, true),
        )
    }

    /// Subscription that stays open and never delivers.
    fn silent_subscription() -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let _tx = tx;
            std::future::pending::<()>().await;
        });
        Subscription::new(
            rx,
            SubscriptionHandle::new(Arc::new(std::sync::atomic::AtomicBool::new(true)), task),
        )
    }

    async fn next_snapshot(app: &mut App) {
        let subscription = app.subscription.as_mut().expect("not subscribed");
        let event = tokio::time::timeout(WAIT, subscription.recv())
            .await
            .expect("timed out waiting for snapshot");
        app.handle_snapshot_event(event);
    }

    async fn next_action(app: &mut App) {
        let action = tokio::time::timeout(WAIT, app.action_rx.recv())
            .await
            .expect("timed out waiting for action")
            .expect("action channel closed");
        app.handle_action(action);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_mount_shows_current_contents() {
        let store = Arc::new(InMemoryDocumentStore::with_documents("spices", vec![cumin()]));
        let mut app = App::new(store, &AppConfig::default());

        app.mount();
        next_snapshot(&mut app).await;

        assert_eq!(app.screen.spices().len(), 1);
        assert_eq!(app.screen.spices()[0].name(), "Cumin");
        assert_eq!(app.screen.sync_status(), SyncStatus::Live);
    }

    #[tokio::test]
    async fn test_add_paprika_creates_and_list_follows_store() {
        let store = Arc::new(InMemoryDocumentStore::new("spices"));
        let mut app = App::new(store.clone(), &AppConfig::default());
        app.mount();
        next_snapshot(&mut app).await;

        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Paprika");
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Tab));
        }
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(ctrl_s());

        assert!(!app.screen.is_editing());
        assert!(app.screen.spices().is_empty());

        next_action(&mut app).await;
        next_snapshot(&mut app).await;

        let stored = store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored.documents()[0].fields,
            SpiceFields::named("Paprika").with_flag(StatusFlag::HaveExtra, true)
        );
        assert_eq!(app.screen.spices()[0].name(), "Paprika");
        assert_eq!(app.screen.spices()[0].badges(), vec![StatusFlag::HaveExtra]);
        assert_eq!(app.screen.status_text(), Some("Spice added"));
    }

    #[tokio::test]
    async fn test_edit_cumin_replaces_document() {
        let store = Arc::new(InMemoryDocumentStore::with_documents("spices", vec![cumin()]));
        let mut app = App::new(store.clone(), &AppConfig::default());
        app.mount();
        next_snapshot(&mut app).await;

        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(ctrl_s());

        next_action(&mut app).await;
        next_snapshot(&mut app).await;

        let stored = store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.documents()[0].id.as_str(), "a1");
        assert_eq!(
            stored.documents()[0].fields,
            SpiceFields::named("Cumin").with_flag(StatusFlag::OutOfStock, true)
        );
        assert_eq!(app.screen.spices()[0].badges(), vec![StatusFlag::OutOfStock]);
    }

    #[tokio::test]
    async fn test_dismiss_writes_nothing() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_subscribe()
            .times(1)
            .returning(|_| Ok(silent_subscription()));
        store.expect_create_document().never();
        store.expect_replace_document().never();

        let mut app = App::new(Arc::new(store), &AppConfig::default());
        app.mount();

        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Mace");
        app.handle_key(key(KeyCode::Esc));

        assert!(!app.screen.is_editing());
        let pending = tokio::time::timeout(Duration::from_millis(50), app.action_rx.recv()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_failed_save_surfaces_in_status() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_subscribe()
            .returning(|_| Ok(silent_subscription()));
        store
            .expect_create_document()
            .times(1)
            .returning(|_, _| Err(StoreError::rejected("PERMISSION_DENIED")));

        let mut app = App::new(Arc::new(store), &AppConfig::default());
        app.mount();

        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Saffron");
        app.handle_key(ctrl_s());
        next_action(&mut app).await;

        assert!(app.screen.spices().is_empty());
        assert_eq!(
            app.screen.status_text(),
            Some("Could not save Saffron: request rejected by the document store: PERMISSION_DENIED")
        );
    }

    #[tokio::test]
    async fn test_subscription_error_stops_sync() {
        let store = Arc::new(InMemoryDocumentStore::new("spices"));
        let mut config = AppConfig::default();
        config.store.collection = "herbs".to_string();
        let mut app = App::new(store, &config);

        app.mount();

        assert!(app.subscription.is_none());
        assert_eq!(app.screen.sync_status(), SyncStatus::Stopped);
    }

    #[tokio::test]
    async fn test_closed_subscription_stops_sync() {
        let store = Arc::new(InMemoryDocumentStore::new("spices"));
        let mut app = App::new(store, &AppConfig::default());
        app.mount();
        next_snapshot(&mut app).await;

        app.handle_snapshot_event(Some(SnapshotEvent::Error(StoreError::network("offline"))));

        assert!(app.subscription.is_none());
        assert_eq!(app.screen.sync_status(), SyncStatus::Stopped);
    }

    #[tokio::test]
    async fn test_quit_key_exits() {
        let store = Arc::new(InMemoryDocumentStore::new("spices"));
        let mut app = App::new(store, &AppConfig::default());
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), EventResult::Exit);
    }
}
