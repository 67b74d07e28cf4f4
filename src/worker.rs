//! One-shot background jobs for the interactive front ends.
//!
//! Each user-initiated action dispatches exactly one job onto a dedicated
//! worker thread and receives the outcome over a completion channel, keeping
//! the prompt loop responsive while an engine runs. There is no cancellation:
//! once a conversion begins it runs to completion or failure, and no timeout
//! is enforced on the engines — `poll` only bounds how long the *front end*
//! waits between spinner updates.

use crate::error::ConvertError;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a dispatched job: poll it from a spinner loop or block on it.
pub struct JobHandle<T> {
    rx: Receiver<Result<T, ConvertError>>,
    thread: Option<JoinHandle<()>>,
}

/// Run `job` on a fresh worker thread and return a handle to its outcome.
pub fn dispatch<T, F>(job: F) -> JobHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ConvertError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let thread = thread::spawn(move || {
        // A dropped receiver means the front end went away; nothing to do.
        let _ = tx.send(job());
    });
    JobHandle {
        rx,
        thread: Some(thread),
    }
}

impl<T> JobHandle<T> {
    /// Wait up to `timeout` for completion. `None` means still running.
    pub fn poll(&self, timeout: Duration) -> Option<Result<T, ConvertError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(ConvertError::Internal(
                "worker thread terminated without reporting a result".to_string(),
            ))),
        }
    }

    /// Block until the job completes and return its outcome.
    pub fn wait(mut self) -> Result<T, ConvertError> {
        let outcome = self.rx.recv().map_err(|_| {
            ConvertError::Internal("worker thread terminated without reporting a result".to_string())
        })?;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        outcome
    }
}

impl<T> Drop for JobHandle<T> {
    fn drop(&mut self) {
        // Abandoned handle: let the worker finish on its own; joining here
        // would block the front end on an engine we cannot cancel.
        if let Some(thread) = self.thread.take() {
            drop(thread);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_returns_the_job_outcome() {
        let handle = dispatch(|| Ok::<_, ConvertError>(41 + 1));
        assert_eq!(handle.wait().unwrap(), 42);
    }

    #[test]
    fn errors_travel_through_the_channel() {
        let handle = dispatch(|| -> Result<(), ConvertError> {
            Err(ConvertError::Internal("boom".into()))
        });
        let err = handle.wait().unwrap_err();
        assert!(matches!(err, ConvertError::Internal(_)));
    }

    #[test]
    fn poll_reports_running_then_done() {
        let handle = dispatch(|| {
            thread::sleep(Duration::from_millis(50));
            Ok::<_, ConvertError>("done")
        });

        // Poll loop mirrors the spinner loop in the front ends.
        let mut outcome = None;
        for _ in 0..100 {
            if let Some(o) = handle.poll(Duration::from_millis(10)) {
                outcome = Some(o);
                break;
            }
        }
        assert_eq!(outcome.unwrap().unwrap(), "done");
    }

    #[test]
    fn panicking_job_surfaces_as_an_internal_error() {
        let handle = dispatch(|| -> Result<(), ConvertError> {
            panic!("worker blew up");
        });
        let err = handle.wait().unwrap_err();
        assert!(matches!(err, ConvertError::Internal(_)));
    }
}
