//! Render command queue
//!
//! Bounded multi-producer, single-consumer channel in front of the render
//! consumer. Producers never block for long: when the queue stays full past
//! the enqueue timeout the new command is dropped.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_time::{with_timeout, Duration};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use inkchat_core::command::Command;

/// Queue depth
pub const QUEUE_CAPACITY: usize = 10;

/// How long a producer waits for space before dropping its command
pub const ENQUEUE_TIMEOUT: Duration = Duration::from_millis(100);

/// Queue errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnqueueError {
    /// Queue stayed full for the whole timeout; the command was dropped
    QueueFull,
}

/// Consumer-side state of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Nothing queued, nothing running
    Idle,
    /// Commands waiting for the consumer
    Dispatching,
    /// Consumer is executing a command
    Processing,
}

/// Bounded command queue feeding one render consumer
pub struct RenderQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, Command, N>,
    timeout: Duration,
    processing: AtomicBool,
    dropped: AtomicU32,
}

/// Clears the processing flag when the consumer finishes a command
pub(crate) struct ProcessingGuard<'q> {
    flag: &'q AtomicBool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl<M: RawMutex, const N: usize> RenderQueue<M, N> {
    /// Create a queue with the default enqueue timeout
    pub const fn new() -> Self {
        Self::with_enqueue_timeout(ENQUEUE_TIMEOUT)
    }

    pub const fn with_enqueue_timeout(timeout: Duration) -> Self {
        Self {
            channel: Channel::new(),
            timeout,
            processing: AtomicBool::new(false),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue a command, waiting at most the enqueue timeout for space
    pub async fn enqueue(&self, command: Command) -> Result<(), EnqueueError> {
        let command = match self.channel.try_send(command) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(command)) => command,
        };

        let kind = command.kind();
        match with_timeout(self.timeout, self.channel.send(command)).await {
            Ok(()) => Ok(()),
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Render queue busy, dropping {:?}", kind);
                Err(EnqueueError::QueueFull)
            }
        }
    }

    /// Take the next command without waiting
    pub fn try_dequeue(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Wait for the next command
    pub async fn dequeue(&self) -> Command {
        self.channel.receive().await
    }

    pub(crate) fn begin_processing(&self) -> ProcessingGuard<'_> {
        self.processing.store(true, Ordering::Release);
        ProcessingGuard {
            flag: &self.processing,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.processing.load(Ordering::Acquire) {
            Phase::Processing
        } else if self.channel.is_empty() {
            Phase::Idle
        } else {
            Phase::Dispatching
        }
    }

    /// Commands waiting
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Commands dropped because the queue stayed full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    // Ingress API

    pub async fn update_conversation(&self, is_user: bool, text: &str) -> Result<(), EnqueueError> {
        self.enqueue(Command::update_conversation(is_user, text)).await
    }

    pub async fn show_default_menu(&self) -> Result<(), EnqueueError> {
        self.enqueue(Command::ShowDefaultMenu).await
    }

    pub async fn show_menu<S: AsRef<str>>(&self, items: &[S], selected: usize) -> Result<(), EnqueueError> {
        self.enqueue(Command::show_menu(items, selected)).await
    }

    pub async fn show_card(&self, html: &str) -> Result<(), EnqueueError> {
        self.enqueue(Command::show_card(html)).await
    }

    pub async fn set_button_hints<S: AsRef<str>>(&self, labels: &[S]) -> Result<(), EnqueueError> {
        self.enqueue(Command::set_button_hints(labels)).await
    }

    pub async fn draw_button_hints(&self) -> Result<(), EnqueueError> {
        self.enqueue(Command::DrawButtonHints).await
    }

    pub async fn set_active_screen(&self, screen: u8) -> Result<(), EnqueueError> {
        self.enqueue(Command::SetActiveScreen(screen)).await
    }

    pub async fn set_refresh_interval(&self, interval_ms: u32) -> Result<(), EnqueueError> {
        self.enqueue(Command::SetRefreshInterval(interval_ms)).await
    }
}

impl<M: RawMutex, const N: usize> Default for RenderQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
