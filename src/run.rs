//! Run tracking: the per-run handle that records test outcomes.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::sync::watch;

use crate::TestItem;

/// Cancellation latch shared between a run and the work started for it.
///
/// Once cancelled it stays cancelled; clones observe the same state.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // The sender lives as long as any token, so the channel cannot close
        // underneath us.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// Outcome of a single test item within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestState {
    Enqueued,
    Started,
    Passed {
        duration: Option<Duration>,
    },
    Failed {
        message: String,
        duration: Option<Duration>,
    },
    Errored {
        message: String,
        duration: Option<Duration>,
    },
    Skipped,
}

/// Host-facing run handle.
///
/// Editors provide their own implementation; [`TestRun`] is the in-memory
/// one handed out by [`crate::TestController`].
pub trait RunTracker: Send + Sync + fmt::Debug {
    fn enqueued(&self, item: &TestItem);
    fn started(&self, item: &TestItem);
    fn passed(&self, item: &TestItem, duration: Option<Duration>);
    fn failed(&self, item: &TestItem, message: &str, duration: Option<Duration>);
    fn errored(&self, item: &TestItem, message: &str, duration: Option<Duration>);
    fn skipped(&self, item: &TestItem);
    fn append_output(&self, output: &str);

    /// Finish the run. Calling it more than once is a no-op.
    fn end(&self);
    fn is_ended(&self) -> bool;

    /// Token observed by work started on behalf of this run.
    fn cancellation(&self) -> CancellationToken;
}

#[derive(Debug, Default)]
struct RunState {
    states: HashMap<String, TestState>,
    output: String,
    ended: bool,
}

/// In-memory run handle. Clones share the same run.
#[derive(Debug, Clone)]
pub struct TestRun {
    name: String,
    state: Arc<Mutex<RunState>>,
    token: CancellationToken,
}

impl TestRun {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(RunState::default())),
            token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state_of(&self, item_id: &str) -> Option<TestState> {
        self.lock().states.get(item_id).cloned()
    }

    #[must_use]
    pub fn output(&self) -> String {
        self.lock().output.clone()
    }

    /// Request cancellation of everything started for this run.
    pub fn cancel(&self) {
        tracing::debug!("cancelling run {}", self.name);
        self.token.cancel();
    }

    /// Release the run. Safe after success, failure or a previous dispose.
    pub fn dispose(&self) {
        self.end();
    }

    /// Whether both handles refer to the same run.
    #[must_use]
    pub fn same_run(&self, other: &TestRun) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, item: &TestItem, state: TestState) {
        let mut run = self.lock();
        if run.ended {
            tracing::debug!("run {} already ended, ignoring {:?} for {}", self.name, state, item.id);
            return;
        }
        run.states.insert(item.id.clone(), state);
    }
}

impl RunTracker for TestRun {
    fn enqueued(&self, item: &TestItem) {
        self.set_state(item, TestState::Enqueued);
    }

    fn started(&self, item: &TestItem) {
        self.set_state(item, TestState::Started);
    }

    fn passed(&self, item: &TestItem, duration: Option<Duration>) {
        self.set_state(item, TestState::Passed { duration });
    }

    fn failed(&self, item: &TestItem, message: &str, duration: Option<Duration>) {
        self.set_state(
            item,
            TestState::Failed {
                message: message.to_string(),
                duration,
            },
        );
    }

    fn errored(&self, item: &TestItem, message: &str, duration: Option<Duration>) {
        self.set_state(
            item,
            TestState::Errored {
                message: message.to_string(),
                duration,
            },
        );
    }

    fn skipped(&self, item: &TestItem) {
        self.set_state(item, TestState::Skipped);
    }

    fn append_output(&self, output: &str) {
        let mut run = self.lock();
        if !run.ended {
            run.output.push_str(output);
        }
    }

    fn end(&self) {
        let mut run = self.lock();
        if !run.ended {
            tracing::debug!("run {} ended", self.name);
            run.ended = true;
        }
    }

    fn is_ended(&self) -> bool {
        self.lock().ended
    }

    fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }
}
