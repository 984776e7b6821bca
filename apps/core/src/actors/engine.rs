use crate::actors::messages::{
    ActorError, CycleTrigger, EngineMessage, EngineStatus, SchedulerState,
};
use crate::actors::traits::SummarySink;
use crate::buffer::MessageBuffer;
use crate::digest::{RuleSet, SummaryRenderer};
use crate::error::AppError;
use crate::models::{ChatMessage, InboundMessage, SummaryResult};
use crate::settings::Settings;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, timeout, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, info_span, instrument, warn, Instrument};
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// A handle to a running summary engine.
///
/// This is the entry point for hosts: it ingests chat messages, forces or clears a
/// window, and pushes configuration changes. Ingestion appends directly to the shared
/// buffer; everything else is serialized through the engine runner.
#[derive(Clone)]
pub struct SummaryEngine {
    sender: mpsc::Sender<EngineMessage>,
    buffer: Arc<Mutex<MessageBuffer>>,
    state: watch::Receiver<SchedulerState>,
}

impl SummaryEngine {
    /// Spawns the engine runner, arms the interval timer and returns a handle.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `settings` - The clamped configuration snapshot.
    /// * `sink` - Where rendered summaries and structured buckets are published.
    pub fn start<S: SummarySink>(settings: Settings, sink: Arc<S>) -> Self {
        let (sender, receiver) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let buffer = Arc::new(Mutex::new(MessageBuffer::new(
            settings.max_buffered_messages,
        )));
        let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);

        let mut runner = EngineRunner::new(receiver, Arc::clone(&buffer), sink, settings, state_tx);
        runner.prime();
        tokio::spawn(async move { runner.run().await });

        Self {
            sender,
            buffer,
            state: state_rx,
        }
    }

    /// Buffers one chat message. Blank usernames or texts are dropped silently,
    /// as is anything ingested after the engine stopped.
    pub fn ingest(&self, username: &str, message: &str, platform: &str, user_id: &str) {
        lock_buffer(&self.buffer).append(InboundMessage::new(username, message, platform, user_id));
    }

    /// Drains the buffer and publishes a summary now, ignoring `min_messages`.
    ///
    /// # Returns
    ///
    /// The published result, or `None` when nothing was buffered.
    #[instrument(skip(self))]
    pub async fn force_summarize(&self) -> Result<Option<SummaryResult>, AppError> {
        self.request(|responder| EngineMessage::SummarizeNow { responder })
            .await
    }

    /// Drains the buffer without rendering, returning how many messages were discarded.
    #[instrument(skip(self))]
    pub async fn clear_buffer(&self) -> Result<usize, AppError> {
        self.request(|responder| EngineMessage::ClearBuffer { responder })
            .await
    }

    /// Applies a new configuration. Calling it with unchanged settings does nothing.
    #[instrument(skip(self, settings))]
    pub async fn configuration_changed(&self, settings: Settings) -> Result<(), AppError> {
        self.request(|responder| EngineMessage::Reconfigure {
            settings,
            responder,
        })
        .await
    }

    pub async fn status(&self) -> Result<EngineStatus, AppError> {
        self.request(|responder| EngineMessage::Status { responder })
            .await
    }

    /// Clears the buffer, disarms the timer and stops the runner.
    ///
    /// Stopping an already stopped engine is not an error.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), AppError> {
        match self
            .request(|responder| EngineMessage::Shutdown { responder })
            .await
        {
            Err(AppError::Actor(ActorError::Stopped)) => Ok(()),
            other => other,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// A receiver that observes every scheduler state change.
    pub fn watch_state(&self) -> watch::Receiver<SchedulerState> {
        self.state.clone()
    }

    /// Number of currently buffered messages, read without going through the runner.
    pub fn buffered(&self) -> usize {
        lock_buffer(&self.buffer).len()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> EngineMessage,
    ) -> Result<T, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|_| AppError::Actor(ActorError::Stopped))?;
        timeout(REQUEST_TIMEOUT, recv)
            .await?
            .map_err(|_| AppError::Actor(ActorError::Stopped))
    }
}

fn lock_buffer(buffer: &Mutex<MessageBuffer>) -> MutexGuard<'_, MessageBuffer> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Actor Runner ---
struct EngineRunner<S: SummarySink> {
    receiver: mpsc::Receiver<EngineMessage>,
    buffer: Arc<Mutex<MessageBuffer>>,
    sink: Arc<S>,
    settings: Settings,
    rules: RuleSet,
    renderer: SummaryRenderer,
    ticker: Option<Interval>,
    state: watch::Sender<SchedulerState>,
}

impl<S: SummarySink> EngineRunner<S> {
    fn new(
        receiver: mpsc::Receiver<EngineMessage>,
        buffer: Arc<Mutex<MessageBuffer>>,
        sink: Arc<S>,
        settings: Settings,
        state: watch::Sender<SchedulerState>,
    ) -> Self {
        Self {
            receiver,
            buffer,
            sink,
            rules: RuleSet::compile(&settings.categories, &settings.category_overrides),
            renderer: SummaryRenderer::new(&settings),
            settings,
            ticker: None,
            state,
        }
    }

    fn prime(&mut self) {
        self.arm();
    }

    /// Replaces any pending timer with a fresh one, first tick one interval from now.
    fn arm(&mut self) {
        let period = self.settings.interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.state.send_replace(SchedulerState::Armed);
        info!(interval_minutes = self.settings.interval_minutes, "Summary timer armed");
    }

    fn disarm(&mut self) {
        self.ticker = None;
        self.state.send_replace(SchedulerState::Idle);
    }

    async fn run(mut self) {
        info!("Summary engine started");
        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => {
                        if !self.handle_message(msg).await {
                            break;
                        }
                    }
                    None => {
                        self.shutdown();
                        break;
                    }
                },
                _ = next_tick(&mut self.ticker) => {
                    self.run_cycle(CycleTrigger::Tick).await;
                }
            }
        }
        info!("Summary engine stopped");
    }

    /// Returns `false` once the runner should stop.
    async fn handle_message(&mut self, msg: EngineMessage) -> bool {
        match msg {
            EngineMessage::SummarizeNow { responder } => {
                let result = self.run_cycle(CycleTrigger::Forced).await;
                let _ = responder.send(result);
            }
            EngineMessage::ClearBuffer { responder } => {
                let dropped = lock_buffer(&self.buffer).clear();
                debug!(dropped, "Buffer cleared");
                let _ = responder.send(dropped);
            }
            EngineMessage::Reconfigure { settings, responder } => {
                self.reconfigure(settings);
                let _ = responder.send(());
            }
            EngineMessage::Status { responder } => {
                let _ = responder.send(self.status());
            }
            EngineMessage::Shutdown { responder } => {
                self.shutdown();
                let _ = responder.send(());
                return false;
            }
        }
        true
    }

    fn reconfigure(&mut self, settings: Settings) {
        if settings == self.settings {
            debug!("Configuration unchanged");
            return;
        }
        let interval_changed = settings.interval_minutes != self.settings.interval_minutes;

        lock_buffer(&self.buffer).set_capacity(settings.max_buffered_messages);
        self.rules = RuleSet::compile(&settings.categories, &settings.category_overrides);
        self.renderer = SummaryRenderer::new(&settings);
        self.settings = settings;
        info!(categories = ?self.rules.names(), "Configuration applied");

        if interval_changed && self.ticker.is_some() {
            self.arm();
        }
    }

    fn status(&self) -> EngineStatus {
        EngineStatus {
            state: *self.state.borrow(),
            buffered: lock_buffer(&self.buffer).len(),
            interval_minutes: self.settings.interval_minutes,
            categories: self.rules.names(),
        }
    }

    fn shutdown(&mut self) {
        self.receiver.close();
        let dropped = lock_buffer(&self.buffer).close();
        self.disarm();
        info!(dropped, "Summary engine shutting down");
    }

    async fn run_cycle(&mut self, trigger: CycleTrigger) -> Option<SummaryResult> {
        let span = info_span!("cycle", cycle_id = %Uuid::new_v4(), %trigger, drained = tracing::field::Empty);
        async {
            self.state.send_replace(SchedulerState::Draining);
            let messages = lock_buffer(&self.buffer).drain_all();
            tracing::Span::current().record("drained", messages.len() as u64);

            let result = self.summarize(trigger, messages).await;

            let next = if self.ticker.is_some() {
                SchedulerState::Armed
            } else {
                SchedulerState::Idle
            };
            self.state.send_replace(next);
            result
        }
        .instrument(span)
        .await
    }

    async fn summarize(
        &self,
        trigger: CycleTrigger,
        messages: Vec<ChatMessage>,
    ) -> Option<SummaryResult> {
        if messages.is_empty() {
            debug!("Nothing buffered");
            return None;
        }
        if trigger == CycleTrigger::Tick && messages.len() < self.settings.min_messages {
            debug!(
                min_messages = self.settings.min_messages,
                "Below minimum, window dropped"
            );
            return None;
        }

        let result = self.renderer.render(&messages, &self.rules);
        self.publish(&result).await;
        info!(
            total_messages = result.total_messages,
            unique_users = result.unique_users,
            "Summary published"
        );
        Some(result)
    }

    async fn publish(&self, result: &SummaryResult) {
        let (text, buckets) = futures::join!(
            self.sink.publish_summary_text(result.rendered_text.clone()),
            self.sink.publish_structured_buckets(result.structured.clone()),
        );
        if let Err(e) = text {
            warn!(error = %e, "Failed to publish summary text");
        }
        if let Err(e) = buckets {
            warn!(error = %e, "Failed to publish structured buckets");
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
