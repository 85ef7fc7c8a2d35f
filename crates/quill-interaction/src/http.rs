//! Resilient HTTP client.
//!
//! The single source of resilience in the system: every outbound call —
//! backend tool execution, publishers, image generators — goes through this
//! wrapper. It adds a per-request deadline and a bounded retry loop with
//! `Retry-After`-aware exponential backoff.
//!
//! A deadline overrun is converted into [`QuillError::Timeout`] and is never
//! retried; the timeout already cost the caller the full window once.

use quill_core::error::{QuillError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Timeout + retry wrapper around [`reqwest::Client`].
#[derive(Clone, Default)]
pub struct ResilientClient {
    client: Client,
}

impl ResilientClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// The underlying client, for building requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Issues the request once, aborting it past `timeout`.
    ///
    /// # Errors
    ///
    /// [`QuillError::Timeout`] on deadline overrun, [`QuillError::Network`]
    /// on any other transport failure.
    pub async fn fetch_with_timeout(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<Response> {
        let request = request
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::network(e.to_string()))?;
        self.client.execute(request).await.map_err(map_transport_error)
    }

    /// Issues the request with up to `max_retries` retries.
    ///
    /// Retries on status >= 500 or 429, and on non-timeout transport errors.
    /// The delay honors a numeric `Retry-After` header (seconds) when the
    /// server supplies one, otherwise backs off `2^attempt` seconds.
    ///
    /// A timeout is raised immediately without retrying. After retries are
    /// exhausted the last retryable response is returned as-is and the last
    /// transport error is raised.
    pub async fn fetch_with_retry(
        &self,
        request: RequestBuilder,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<Response> {
        let request = request
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::network(e.to_string()))?;

        let mut attempt: u32 = 0;
        loop {
            let Some(this_attempt) = request.try_clone() else {
                return Err(QuillError::internal(
                    "request body is streaming and cannot be retried",
                ));
            };

            match self.client.execute(this_attempt).await {
                Ok(response) => {
                    if !is_retryable_status(response.status()) || attempt >= max_retries {
                        return Ok(response);
                    }
                    let delay = retry_delay(&response, attempt);
                    tracing::warn!(
                        target: "http",
                        status = %response.status(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retryable response; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_timeout() => {
                    return Err(QuillError::timeout(format!(
                        "request exceeded {}ms: {}",
                        timeout.as_millis(),
                        err
                    )));
                }
                Err(err) => {
                    if attempt >= max_retries {
                        return Err(QuillError::network(err.to_string()));
                    }
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        target: "http",
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transport error; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
            attempt += 1;
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> QuillError {
    if err.is_timeout() {
        QuillError::timeout(err.to_string())
    } else {
        QuillError::network(err.to_string())
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// `2^attempt` seconds, capped to keep the worst case bounded.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

fn retry_delay(response: &Response, attempt: u32) -> Duration {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| backoff_delay(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response per accepted connection, in order.
    async fn serve(responses: Vec<&'static str>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf).await;
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });
        addr
    }

    const SERVER_ERROR: &str = "HTTP/1.1 500 Internal Server Error\r\n\
        retry-after: 0\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";
    const TOO_MANY: &str = "HTTP/1.1 429 Too Many Requests\r\n\
        retry-after: 0\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";
    const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\n\
        content-length: 0\r\nconnection: close\r\n\r\n";
    const OK: &str = "HTTP/1.1 200 OK\r\n\
        content-length: 2\r\nconnection: close\r\n\r\nok";

    #[tokio::test]
    async fn retries_500_until_success() {
        let addr = serve(vec![SERVER_ERROR, OK]).await;
        let client = ResilientClient::new();

        let response = client
            .fetch_with_retry(
                client.client().get(format!("http://{}/", addr)),
                3,
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn retries_429_like_a_server_error() {
        let addr = serve(vec![TOO_MANY, OK]).await;
        let client = ResilientClient::new();

        let response = client
            .fetch_with_retry(
                client.client().get(format!("http://{}/", addr)),
                3,
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_retryable_status_is_returned_immediately() {
        let addr = serve(vec![NOT_FOUND]).await;
        let client = ResilientClient::new();

        let response = client
            .fetch_with_retry(
                client.client().get(format!("http://{}/", addr)),
                3,
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exhausted_retries_return_the_last_response() {
        let addr = serve(vec![SERVER_ERROR, SERVER_ERROR, SERVER_ERROR]).await;
        let client = ResilientClient::new();

        let response = client
            .fetch_with_retry(
                client.client().get(format!("http://{}/", addr)),
                2,
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn timeout_is_raised_immediately_without_retry() {
        // Accept the connection but never respond
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let client = ResilientClient::new();
        let started = std::time::Instant::now();
        let err = client
            .fetch_with_retry(
                client.client().get(format!("http://{}/", addr)),
                5,
                Duration::from_millis(200),
            )
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {:?}", err);
        // A retried timeout would take at least one full extra window
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn fetch_with_timeout_maps_deadline_to_timeout_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let client = ResilientClient::new();
        let err = client
            .fetch_with_timeout(
                client.client().get(format!("http://{}/", addr)),
                Duration::from_millis(200),
            )
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
