use crate::models::SummaryResult;
use crate::settings::Settings;
use serde::Serialize;
use std::fmt;
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The engine runner has shut down and no longer accepts commands.
    #[error("Engine is stopped")]
    Stopped,
}

/// Lifecycle state of the windowed scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No timer armed.
    Idle,
    /// Timer running at the configured interval.
    Armed,
    /// A drain/render/publish sequence is in flight.
    Draining,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Armed => "armed",
            SchedulerState::Draining => "draining",
        };
        write!(f, "{}", label)
    }
}

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTrigger {
    /// The interval timer fired; the minimum-message gate applies.
    Tick,
    /// A host asked for a summary now; the gate is bypassed.
    Forced,
}

impl fmt::Display for CycleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleTrigger::Tick => write!(f, "tick"),
            CycleTrigger::Forced => write!(f, "forced"),
        }
    }
}

/// Point-in-time view of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub state: SchedulerState,
    pub buffered: usize,
    pub interval_minutes: u32,
    /// Categories that compiled to a rule.
    pub categories: Vec<String>,
}

/// Messages that can be sent to the engine runner.
#[derive(Debug)]
pub enum EngineMessage {
    /// Drain and summarize immediately, bypassing the minimum-message gate.
    SummarizeNow {
        responder: oneshot::Sender<Option<SummaryResult>>,
    },
    /// Drain and discard without rendering.
    ClearBuffer {
        responder: oneshot::Sender<usize>,
    },
    /// Apply a new configuration snapshot.
    Reconfigure {
        settings: Settings,
        responder: oneshot::Sender<()>,
    },
    /// Report the current status.
    Status {
        responder: oneshot::Sender<EngineStatus>,
    },
    /// Clear the buffer, disarm the timer and stop the runner.
    Shutdown {
        responder: oneshot::Sender<()>,
    },
}
