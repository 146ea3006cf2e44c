//! Block navigation state machine and fetch lifecycle.
//!
//! A [`BlockNavigator`] owns the selected block, its content and the single
//! live fetch. Navigation cancels the previous fetch before issuing a new one,
//! and settlements are committed only when they carry the live ticket, so a
//! slow response for an earlier block can never overwrite a newer selection.
//!
//! Fetches run on a tokio runtime; their outcomes come back over a channel and
//! are applied by [`BlockNavigator::pump`] on the caller's thread, which is the
//! only place state changes after a fetch is issued.

mod blocks;
mod projection;
mod state;

pub use blocks::{BlockList, ConfigurationError, MountConfig, parse_block_codes};
pub use projection::{RenderProjection, project};
pub use state::{NavigationState, ViewState};

use crate::fetch::{ContentFetcher, FetchError};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A request to change which block is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    Previous,
    Next,
    Select(usize),
    Reload,
}

/// Identity of one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// The live fetch: its ticket and the token that cancels it.
#[derive(Debug)]
struct FetchHandle {
    ticket: FetchTicket,
    block_code: String,
    cancel: CancellationToken,
}

/// Outcome of a fetch, delivered back to the navigator.
#[derive(Debug)]
pub struct FetchEvent {
    ticket: FetchTicket,
    outcome: Result<String, FetchError>,
}

pub struct BlockNavigator {
    proposal_code: String,
    blocks: BlockList,
    state: NavigationState,
    live: Option<FetchHandle>,
    next_ticket: u64,
    fetcher: Arc<dyn ContentFetcher>,
    runtime: Handle,
    events_tx: Sender<FetchEvent>,
    events_rx: Receiver<FetchEvent>,
}

impl BlockNavigator {
    /// Validates the configuration, enters `Loading` and issues the first fetch.
    pub fn mount(
        config: MountConfig,
        fetcher: Arc<dyn ContentFetcher>,
        runtime: Handle,
    ) -> Result<Self, ConfigurationError> {
        let blocks = BlockList::new(config.block_codes)?;
        let index = blocks.initial_index(config.initial_block.as_deref())?;
        let (events_tx, events_rx) = channel();

        let mut navigator = Self {
            proposal_code: config.proposal_code,
            blocks,
            state: NavigationState::mounted(index),
            live: None,
            next_ticket: 0,
            fetcher,
            runtime,
            events_tx,
            events_rx,
        };
        info!(
            proposal = %navigator.proposal_code,
            blocks = navigator.blocks.len(),
            index,
            "mounted block navigator"
        );
        navigator.load(index);
        Ok(navigator)
    }

    #[must_use]
    pub fn proposal_code(&self) -> &str {
        &self.proposal_code
    }

    #[must_use]
    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn current_block(&self) -> Option<&str> {
        self.blocks.get(self.state.current_index())
    }

    #[must_use]
    pub fn has_live_fetch(&self) -> bool {
        self.live.is_some()
    }

    #[must_use]
    pub fn projection(&self) -> RenderProjection {
        project(&self.proposal_code, &self.blocks, &self.state)
    }

    /// Applies an intent. Returns `false` when its precondition does not hold,
    /// in which case nothing changed.
    pub fn dispatch(&mut self, intent: NavigationIntent) -> bool {
        match intent {
            NavigationIntent::Previous => self.select_previous(),
            NavigationIntent::Next => self.select_next(),
            NavigationIntent::Select(index) => self.select_index(index),
            NavigationIntent::Reload => self.reload(),
        }
    }

    pub fn select_previous(&mut self) -> bool {
        let index = self.state.current_index();
        if index == 0 || self.state.is_loading() {
            debug!(index, "previous rejected");
            return false;
        }
        self.load(index - 1);
        true
    }

    pub fn select_next(&mut self) -> bool {
        let index = self.state.current_index();
        if index >= self.blocks.last_index() || self.state.is_loading() {
            debug!(index, "next rejected");
            return false;
        }
        self.load(index + 1);
        true
    }

    /// Direct selection is allowed while loading; it supersedes the live fetch.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.blocks.len() {
            debug!(index, "selection out of range");
            return false;
        }
        self.load(index);
        true
    }

    /// Fetches the current block again. This is the retry after an error, and
    /// the way out of a `Loading` state whose fetch reported cancellation.
    pub fn reload(&mut self) -> bool {
        if self.live.is_some() {
            debug!("reload rejected while loading");
            return false;
        }
        self.load(self.state.current_index());
        true
    }

    /// Cancels the live fetch, enters `Loading` for `index` and fetches it.
    fn load(&mut self, index: usize) {
        self.cancel_live();

        let Some(block_code) = self.blocks.get(index).map(String::from) else {
            return;
        };
        self.state.begin_loading(index);

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        let cancel = CancellationToken::new();

        let fetcher = Arc::clone(&self.fetcher);
        let proposal_code = self.proposal_code.clone();
        let task_block = block_code.clone();
        let task_cancel = cancel.clone();
        let events_tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = task_cancel.cancelled() => return,
                outcome = fetcher.fetch(&proposal_code, &task_block, task_cancel.clone()) => outcome,
            };
            if task_cancel.is_cancelled() {
                return;
            }
            let _ = events_tx.send(FetchEvent { ticket, outcome });
        });

        debug!(?ticket, block = %block_code, "issued block fetch");
        self.live = Some(FetchHandle {
            ticket,
            block_code,
            cancel,
        });
    }

    fn cancel_live(&mut self) {
        if let Some(handle) = self.live.take() {
            debug!(ticket = ?handle.ticket, block = %handle.block_code, "cancelling block fetch");
            handle.cancel.cancel();
        }
    }

    /// Applies every settled fetch waiting in the channel. Returns the number
    /// of state transitions committed.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.settle(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Blocks until the live fetch settles or `timeout` passes. Returns whether
    /// the navigator has no live fetch left.
    pub fn wait_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.live.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events_rx.recv_timeout(remaining) {
                Ok(event) => {
                    self.settle(event);
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        self.live.is_none()
    }

    /// Commits an outcome if it belongs to the live fetch.
    fn settle(&mut self, event: FetchEvent) -> bool {
        let is_live = self
            .live
            .as_ref()
            .is_some_and(|handle| handle.ticket == event.ticket);
        if !is_live {
            debug!(ticket = ?event.ticket, "ignoring stale block fetch");
            return false;
        }
        let Some(handle) = self.live.take() else {
            return false;
        };

        match event.outcome {
            Ok(html) => {
                info!(block = %handle.block_code, bytes = html.len(), "block loaded");
                self.state.finish(html);
                true
            }
            Err(error) if error.is_cancelled() => {
                debug!(block = %handle.block_code, "block fetch reported cancellation");
                false
            }
            Err(error) => {
                warn!(block = %handle.block_code, %error, "block fetch failed");
                self.state.fail(error.to_string());
                true
            }
        }
    }

    /// Tears the navigator down, cancelling any live fetch.
    pub fn detach(mut self) {
        info!(proposal = %self.proposal_code, "detaching block navigator");
        self.cancel_live();
    }
}

impl Drop for BlockNavigator {
    fn drop(&mut self) {
        self.cancel_live();
    }
}
