//! HTTP push of playback reports to the advisory service.
//!
//! The advisory side channel is best-effort. [`HttpReportSink::submit`]
//! spawns the POST and returns at once, so a slow or unreachable endpoint
//! never delays a tick. Failures are logged and dropped; nothing retries.

use std::time::Duration;

use tidewatch_core::config::AdvisoryConfig;
use tidewatch_core::runner::ReportSink;
use tidewatch_types::PlaybackReport;
use tracing::{debug, warn};

/// Why a report could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// The request never produced a response.
    #[error("advisory request failed: {source}")]
    Request {
        /// Underlying transport error.
        #[from]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("advisory returned {status}: {body}")]
    Status {
        /// HTTP status returned.
        status: reqwest::StatusCode,
        /// Response body, if it could be read.
        body: String,
    },
}

/// Posts each report as JSON to the configured URL.
#[derive(Debug, Clone)]
pub struct HttpReportSink {
    client: reqwest::Client,
    url: String,
}

impl HttpReportSink {
    /// Build a sink with the configured endpoint and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(config: &AdvisoryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl ReportSink for HttpReportSink {
    fn submit(&self, report: PlaybackReport) {
        let client = self.client.clone();
        let url = self.url.clone();
        tokio::spawn(async move {
            match deliver(&client, &url, &report).await {
                Ok(()) => debug!(url = %url, timestamp = %report.timestamp, "Report delivered"),
                Err(err) => warn!(url = %url, error = %err, "Report dropped"),
            }
        });
    }
}

/// POST one report.
async fn deliver(
    client: &reqwest::Client,
    url: &str,
    report: &PlaybackReport,
) -> Result<(), AdvisoryError> {
    let response = client.post(url).json(report).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(AdvisoryError::Status { status, body });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tidewatch_types::ReportMode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn report() -> PlaybackReport {
        PlaybackReport {
            timestamp: Utc.timestamp_opt(1_769_738_400, 0).unwrap(),
            ships: Vec::new(),
            tide_level_m: 2.4,
            mode: ReportMode::HistoricPlayback,
        }
    }

    /// Accept one connection, capture the request, answer with `status_line`.
    async fn one_shot_server(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/advisory", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(buf.get(..n).unwrap());
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8(request).unwrap()
        });
        (url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    #[tokio::test]
    async fn posts_report_as_json() {
        let (url, server) = one_shot_server("HTTP/1.1 204 No Content").await;
        let client = reqwest::Client::new();

        deliver(&client, &url, &report()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /advisory"));
        let body = request.split_once("\r\n\r\n").unwrap().1;
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["mode"], "HISTORIC_PLAYBACK");
        assert_eq!(json["tide_level_m"], 2.4);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = one_shot_server("HTTP/1.1 503 Service Unavailable").await;
        let client = reqwest::Client::new();

        let err = deliver(&client, &url, &report()).await.unwrap_err();
        assert!(
            matches!(&err, AdvisoryError::Status { status, .. } if status.as_u16() == 503),
            "{err}"
        );
        assert!(err.to_string().starts_with("advisory returned 503"));
        let _ = server.await;
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = AdvisoryConfig {
            enabled: true,
            url: format!("http://{addr}/advisory"),
            report_interval_ms: 5_000,
            request_timeout_ms: 500,
        };
        let sink = HttpReportSink::new(&config).unwrap();
        assert!(matches!(
            deliver(&sink.client, &sink.url, &report()).await,
            Err(AdvisoryError::Request { .. })
        ));

        // Fire-and-forget submission must not panic either.
        sink.submit(report());
        tokio::task::yield_now().await;
    }
}
