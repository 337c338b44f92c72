use log::debug;
use pcs_common::{MonitorError, Snapshot};
use reqwest::blocking::Client;
use std::time::Duration;

/// Source of listing snapshots.
///
/// Implementations perform exactly one request per call; retrying is up to
/// the caller.
pub trait SnapshotSource {
    /// Fetch the current listing.
    ///
    /// Transport failures surface as `MonitorError::Network`, non-2xx responses as
    /// `MonitorError::ServerStatus` and undecodable bodies as
    /// `MonitorError::MalformedSnapshot`.
    fn fetch_snapshot(&self) -> Result<Snapshot, MonitorError>;
}

/// Blocking HTTP client for the PancakeSwap token listing endpoint.
pub struct PancakeSwapApi {
    client: Client,
    url: String,
}

impl PancakeSwapApi {
    /// Build a client for `url` with the given request timeout.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    /// Use an already configured HTTP client.
    pub fn with_client(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl SnapshotSource for PancakeSwapApi {
    fn fetch_snapshot(&self) -> Result<Snapshot, MonitorError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(MonitorError::ServerStatus {
                code: status.as_u16(),
                body,
            });
        }
        debug!("PancakeSwap server responded with status code {}.", status.as_u16());
        Snapshot::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned HTTP response on a local port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/api/v2/tokens", addr)
    }

    fn api(url: &str) -> PancakeSwapApi {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        PancakeSwapApi::with_client(client, url)
    }

    #[test]
    fn parses_successful_response() {
        let url = serve_once("200 OK", r#"{"updated_at": 2000, "data": {"C": {"symbol": "C"}}}"#);
        let snapshot = api(&url).fetch_snapshot().unwrap();
        assert_eq!(snapshot.updated_at, 2000);
        assert!(snapshot.tokens.contains_key("C"));
    }

    #[test]
    fn non_success_status_keeps_code_and_body() {
        let url = serve_once("503 Service Unavailable", "maintenance");
        match api(&url).fetch_snapshot() {
            Err(MonitorError::ServerStatus { code, body }) => {
                assert_eq!(code, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let url = serve_once("200 OK", "<html>oops</html>");
        assert!(matches!(
            api(&url).fetch_snapshot(),
            Err(MonitorError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = api(&format!("http://{}/", addr)).fetch_snapshot();
        assert!(matches!(result, Err(MonitorError::Network(_))));
    }
}
