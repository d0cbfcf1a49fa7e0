//! The dispatch loop
//!
//! Single threaded: each iteration blocks until at least one event is available, then runs
//! every queued handler to completion. The loop ends when the state reports it is closed, when
//! a handler failed, or when dispatching itself fails.

use crate::{Error, Result};

/// Something that blocks until events arrive and dispatches them to a state
pub trait EventSource<D> {
    /// Dispatch the queued events, blocking if there are none
    fn dispatch_blocking(&mut self, state: &mut D) -> Result<usize>;
}

/// Termination conditions of a client state
pub trait Lifecycle {
    /// Whether a close request has been handled
    fn is_closed(&self) -> bool;
    /// The first failure of a handler since the last call, if any
    fn take_failure(&mut self) -> Option<Error>;
}

/// Run the dispatch loop until `state` is closed
///
/// Returns the number of dispatch passes on a clean shutdown. A pending failure of `state` is
/// returned before anything else, even if `state` is already closed.
pub fn run<D, S>(source: &mut S, state: &mut D) -> Result<usize>
where
    D: Lifecycle,
    S: EventSource<D>,
{
    let mut passes = 0;
    loop {
        // a failure recorded before the loop started counts too
        if let Some(err) = state.take_failure() {
            log::debug!("Handler failed after {passes} dispatch passes");
            return Err(err);
        }
        if state.is_closed() {
            log::debug!("Closed after {passes} dispatch passes");
            return Ok(passes);
        }
        source.dispatch_blocking(state)?;
        passes += 1;
    }
}
