//! Running long remote calls on a worker task with a spinner.

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tracing::error;

/// Error raised when the worker task itself dies
#[derive(Debug, thiserror::Error)]
#[error("worker task failed: {0}")]
pub struct WorkerError(#[from] pub tokio::task::JoinError);

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spawn `task` on the runtime and wait for it while a spinner animates.
///
/// The caller does not resume until the task finishes, so at most one remote
/// operation is in flight. The spinner ends with `done` on success and is
/// cleared on failure.
pub async fn run_with_progress<F, T, E>(
    message: &str,
    done: &str,
    task: F,
) -> Result<Result<T, E>, WorkerError>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let pb = spinner(message);
    let handle = tokio::spawn(task);

    match handle.await {
        Ok(Ok(value)) => {
            pb.finish_with_message(done.to_string());
            Ok(Ok(value))
        }
        Ok(Err(e)) => {
            pb.finish_and_clear();
            Ok(Err(e))
        }
        Err(join_error) => {
            pb.finish_and_clear();
            error!("{} aborted: {}", message, join_error);
            Err(WorkerError(join_error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_task_value() {
        let result = run_with_progress("Working", "Done", async { Ok::<_, String>(42) }).await;
        assert_eq!(result.unwrap(), Ok(42));
    }

    #[tokio::test]
    async fn test_returns_task_error() {
        let result = run_with_progress("Working", "Done", async {
            Err::<u32, _>("boom".to_string())
        })
        .await;
        assert_eq!(result.unwrap(), Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let result = run_with_progress("Working", "Done", async {
            if true {
                panic!("worker panicked");
            }
            Ok::<u32, String>(1)
        })
        .await;
        assert!(result.is_err());
    }
}
