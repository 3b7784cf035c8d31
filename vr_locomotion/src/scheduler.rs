use std::time::Duration;

/// One-shot callback payload that fires after a delay
///
/// Arming while already armed replaces the pending payload and restarts the
/// delay. Time only moves when the owner calls [`DeferredTask::advance`], so it
/// follows whatever clock the caller uses.
#[derive(Clone, Debug)]
pub struct DeferredTask<T> {
    pending: Option<Pending<T>>,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    remaining: Duration,
    payload: T,
}

impl<T> Default for DeferredTask<T> {
    fn default() -> Self {
        DeferredTask { pending: None }
    }
}

impl<T> DeferredTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire after `delay`. Returns the payload this replaced, if any.
    pub fn arm(&mut self, delay: Duration, payload: T) -> Option<T> {
        self.pending
            .replace(Pending {
                remaining: delay,
                payload,
            })
            .map(|previous| previous.payload)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.remaining)
    }

    /// Move time forward; yields the payload exactly once when the delay runs out
    pub fn advance(&mut self, elapsed: Duration) -> Option<T> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(elapsed);

        if pending.remaining.is_zero() {
            self.pending.take().map(|pending| pending.payload)
        } else {
            None
        }
    }
}
