//! Single-writer protocol actor
//!
//! One task owns the `Protocol` and applies requests in arrival order.
//! Readers never block the writer: every commit publishes a fresh
//! `Arc<Protocol>` on a watch channel.

use stakied_core::{BlockHeight, Command, Context, Protocol, Receipt, StakiedError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("block height {height} is below last committed height {last}")]
    ClockRegression {
        height: BlockHeight,
        last: BlockHeight,
    },
    #[error("rejected: {0}")]
    Rejected(#[from] StakiedError),
    #[error("sequencer has shut down")]
    ShutDown,
}

struct Request {
    ctx: Context,
    command: Command,
    reply: oneshot::Sender<Result<Receipt, SequencerError>>,
}

/// Cloneable handle to a running sequencer
#[derive(Clone)]
pub struct SequencerHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<Arc<Protocol>>,
}

impl SequencerHandle {
    /// Submit one command and wait for its outcome
    pub async fn submit(&self, ctx: Context, command: Command) -> Result<Receipt, SequencerError> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(Request {
                ctx,
                command,
                reply,
            })
            .await
            .map_err(|_| SequencerError::ShutDown)?;
        outcome.await.map_err(|_| SequencerError::ShutDown)?
    }

    /// Latest committed state; includes every command whose `submit` has returned
    pub fn snapshot(&self) -> Arc<Protocol> {
        self.snapshots.borrow().clone()
    }
}

/// Start the actor. It stops once every handle is dropped and returns the
/// final state through the join handle.
pub fn spawn(protocol: Protocol, capacity: usize) -> (SequencerHandle, JoinHandle<Protocol>) {
    let (requests, mut inbox) = mpsc::channel::<Request>(capacity.max(1));
    let (publish, snapshots) = watch::channel(Arc::new(protocol.clone()));

    let task = tokio::spawn(async move {
        let mut protocol = protocol;
        while let Some(Request {
            ctx,
            command,
            reply,
        }) = inbox.recv().await
        {
            let outcome = apply(&mut protocol, &ctx, &command);
            match &outcome {
                Ok(_) => {
                    publish.send_replace(Arc::new(protocol.clone()));
                }
                Err(e) => log::debug!("{} by {} rejected: {}", command.name(), ctx.caller, e),
            }
            // The submitter may have stopped waiting; the commit stands either way.
            let _ = reply.send(outcome);
        }
        log::debug!("Sequencer inbox closed at height {}", protocol.last_block());
        protocol
    });

    (
        SequencerHandle {
            requests,
            snapshots,
        },
        task,
    )
}

/// Apply one command, refusing to move the clock backwards
pub fn apply(
    protocol: &mut Protocol,
    ctx: &Context,
    command: &Command,
) -> Result<Receipt, SequencerError> {
    let last = protocol.last_block();
    if ctx.block_height < last {
        return Err(SequencerError::ClockRegression {
            height: ctx.block_height,
            last,
        });
    }
    Ok(protocol.execute(ctx, command)?)
}
