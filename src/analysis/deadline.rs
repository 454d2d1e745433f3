//! Race a future against a deadline.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;

/// Which side of the race settled first.
#[derive(Debug)]
pub enum Raced<T> {
    /// The operation finished (or its task died) before the deadline.
    Settled(Result<T, JoinError>),
    /// The deadline fired first. The operation was aborted and its result dropped.
    DeadlineElapsed,
}

/// Run `operation` on its own task and wait for it or `deadline`, whichever comes first.
///
/// On timeout the task is aborted, so a late result can never be observed.
pub async fn with_deadline<F>(operation: F, deadline: Duration) -> Raced<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let mut task = tokio::spawn(operation);

    tokio::select! {
        biased;
        joined = &mut task => Raced::Settled(joined),
        _ = tokio::time::sleep(deadline) => {
            task.abort();
            Raced::DeadlineElapsed
        }
    }
}
