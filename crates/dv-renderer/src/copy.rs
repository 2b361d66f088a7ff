//! Copy-to-clipboard control with timed revert.
//!
//! A [`CopyController`] writes its snippet text to a [`Clipboard`] and flips
//! to [`CopyPhase::Copied`] on success. After the reset delay it reverts to
//! [`CopyPhase::Idle`]. A new successful copy restarts the delay, and dropping
//! the controller cancels any pending revert.
//!
//! The revert timer runs on the ambient tokio runtime, so [`CopyController::copy`]
//! must be awaited from within one.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

/// Delay before the copy control reverts to idle.
pub const DEFAULT_RESET_AFTER: Duration = Duration::from_millis(2000);

/// Clipboard write failure.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard exists in this environment.
    #[error("clipboard unavailable")]
    Unavailable,
    /// The environment refused clipboard access.
    #[error("clipboard permission denied")]
    PermissionDenied,
    /// The write itself failed.
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Asynchronous text clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    async fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard holding the last written text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written text, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_owned());
        Ok(())
    }
}

/// Clipboard for environments without one. Every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

#[async_trait]
impl Clipboard for NoClipboard {
    async fn write(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Visible state of a copy control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CopyPhase {
    #[default]
    Idle,
    Copied,
}

impl CopyPhase {
    /// Button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Copy",
            Self::Copied => "Copied",
        }
    }

    /// Button icon.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Idle => "copy",
            Self::Copied => "check",
        }
    }

    /// Value of the `data-state` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Copied => "copied",
        }
    }
}

#[derive(Debug, Default)]
struct CopyState {
    phase: CopyPhase,
    // Bumped on every successful copy; a revert only applies to its own copy.
    generation: u64,
    // Revert task of the latest generation.
    revert: Option<JoinHandle<()>>,
}

/// Copy control state machine for one snippet.
pub struct CopyController {
    text: Arc<str>,
    clipboard: Arc<dyn Clipboard>,
    reset_after: Duration,
    state: Arc<Mutex<CopyState>>,
}

impl CopyController {
    /// Create an idle controller copying `text` to `clipboard`.
    pub fn new(text: impl Into<Arc<str>>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            text: text.into(),
            clipboard,
            reset_after: DEFAULT_RESET_AFTER,
            state: Arc::new(Mutex::new(CopyState::default())),
        }
    }

    /// Override the revert delay.
    #[must_use]
    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> CopyPhase {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .phase
    }

    /// Whether a revert to idle is scheduled.
    pub fn is_revert_pending(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .revert
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Copy the snippet text and return the resulting phase.
    ///
    /// On failure the phase is left unchanged and the error is logged; it is
    /// never surfaced to the caller.
    pub async fn copy(&self) -> CopyPhase {
        if let Err(e) = self.clipboard.write(&self.text).await {
            tracing::warn!(error = %e, "Failed to copy snippet to clipboard");
            return self.phase();
        }

        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.phase = CopyPhase::Copied;
            state.generation += 1;

            let generation = state.generation;
            let weak = Arc::downgrade(&self.state);
            let reset_after = self.reset_after;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(reset_after).await;
                if let Some(state) = weak.upgrade() {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if state.generation == generation {
                        state.phase = CopyPhase::Idle;
                    }
                }
            });

            if let Some(previous) = state.revert.replace(handle) {
                previous.abort();
            }
        }

        tracing::debug!(bytes = self.text.len(), "Copied snippet to clipboard");
        CopyPhase::Copied
    }
}

impl Drop for CopyController {
    fn drop(&mut self) {
        let handle = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .revert
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for CopyController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyController")
            .field("text", &self.text)
            .field("reset_after", &self.reset_after)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
