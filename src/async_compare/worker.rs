use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::compare::ComparisonService;

use super::channel::{CompareRequest, CompareResponse};

/// Runs comparisons off the UI task. Requests run concurrently, so responses
/// can arrive out of order; callers drop stale generations.
pub struct CompareWorker {
    request_tx: mpsc::UnboundedSender<CompareRequest>,
    result_rx: mpsc::UnboundedReceiver<CompareResponse>,
}

impl CompareWorker {
    pub fn new(service: Arc<dyn ComparisonService>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<CompareRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<CompareResponse>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let service = Arc::clone(&service);
                let tx = result_tx.clone();

                tokio::spawn(async move {
                    debug!(
                        generation = request.generation,
                        from = %request.from,
                        to = %request.to,
                        "comparison started"
                    );
                    let result = service
                        .compare(&request.from, &request.to)
                        .await
                        .map_err(|e| {
                            warn!(generation = request.generation, error = %e, "comparison failed");
                            e.to_string()
                        });
                    let _ = tx.send(CompareResponse {
                        generation: request.generation,
                        result,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: CompareRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<CompareResponse> {
        self.result_rx.try_recv().ok()
    }

    /// Wait for the next response; `None` once the worker has shut down.
    pub async fn recv(&mut self) -> Option<CompareResponse> {
        self.result_rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CompareError, ComparisonResult};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers after a delay encoded in the `from` value, in milliseconds.
    struct DelayedService;

    #[async_trait]
    impl ComparisonService for DelayedService {
        async fn compare(&self, from: &str, to: &str) -> Result<ComparisonResult, CompareError> {
            let ms: u64 = from.parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(ComparisonResult {
                lhs_commit: from.to_string(),
                rhs_commit: to.to_string(),
                ..ComparisonResult::default()
            })
        }
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let mut worker = CompareWorker::new(Arc::new(DelayedService));
        worker.request(CompareRequest {
            generation: 1,
            from: "200".to_string(),
            to: "a".to_string(),
        });
        worker.request(CompareRequest {
            generation: 2,
            from: "0".to_string(),
            to: "b".to_string(),
        });

        let first = worker.recv().await.unwrap();
        let second = worker.recv().await.unwrap();
        assert_eq!(first.generation, 2);
        assert_eq!(second.generation, 1);
        assert_eq!(first.result.unwrap().rhs_commit, "b");
    }

    #[tokio::test]
    async fn test_failures_are_reported_as_text() {
        struct Failing;

        #[async_trait]
        impl ComparisonService for Failing {
            async fn compare(&self, _: &str, _: &str) -> Result<ComparisonResult, CompareError> {
                Err(CompareError::Join("boom".to_string()))
            }
        }

        let mut worker = CompareWorker::new(Arc::new(Failing));
        worker.request(CompareRequest {
            generation: 7,
            from: String::new(),
            to: String::new(),
        });
        let response = worker.recv().await.unwrap();
        assert_eq!(response.generation, 7);
        assert_eq!(response.result.unwrap_err(), "comparison task failed: boom");
    }
}
