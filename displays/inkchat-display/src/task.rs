//! Render consumer loop
//!
//! Exactly one consumer drains a [`RenderQueue`] for the lifetime of the
//! program. It is the only caller of the renderer and the history.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;

use inkchat_core::command::Command;
use inkchat_hal::{AssetStorage, Renderer};

use crate::compositor::Compositor;
use crate::queue::RenderQueue;

/// Process commands forever
pub async fn run<M, R, S, const N: usize>(
    queue: &RenderQueue<M, N>,
    compositor: &mut Compositor<'_, R>,
    storage: &mut S,
) -> !
where
    M: RawMutex,
    R: Renderer,
    S: AssetStorage,
{
    info!("Render consumer started");

    loop {
        let command = queue.dequeue().await;
        process(queue, compositor, storage, command, Instant::now()).await;
    }
}

/// Process every queued command without waiting, returning how many ran
pub async fn drain<M, R, S, const N: usize>(
    queue: &RenderQueue<M, N>,
    compositor: &mut Compositor<'_, R>,
    storage: &mut S,
    now: Instant,
) -> usize
where
    M: RawMutex,
    R: Renderer,
    S: AssetStorage,
{
    let mut processed = 0;
    while let Some(command) = queue.try_dequeue() {
        process(queue, compositor, storage, command, now).await;
        processed += 1;
    }
    processed
}

async fn process<M, R, S, const N: usize>(
    queue: &RenderQueue<M, N>,
    compositor: &mut Compositor<'_, R>,
    storage: &mut S,
    command: Command,
    now: Instant,
) where
    M: RawMutex,
    R: Renderer,
    S: AssetStorage,
{
    let _processing = queue.begin_processing();
    let kind = command.kind();
    trace!("Processing {:?}", kind);

    match compositor.handle(command, storage, now).await {
        Ok(outcome) => trace!("{:?} done: {:?}", kind, outcome),
        // Nothing is fatal: report and move on to the next command
        Err(e) => warn!("{:?} failed: {:?}", kind, e),
    }
}
