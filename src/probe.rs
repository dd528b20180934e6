use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, instrument, trace};

/// Upper bound for a single connection attempt when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(800);

/// Attempt one TCP connection to `host:port` within `limit`.
///
/// An empty host is reported unreachable without any connection attempt.
/// Every failure mode (timeout, refusal, resolution error) collapses to
/// `false`; a successful connection is closed immediately without sending
/// a byte. One attempt per call, no retries.
#[instrument]
pub async fn probe(host: &str, port: u16, limit: Duration) -> bool {
    if host.is_empty() {
        trace!("No printer host configured, skipping connection attempt");
        return false;
    }

    let target = format!("{}:{}", host, port);
    trace!("Probing printer at {}", target);

    match timeout(limit, TcpStream::connect(&target)).await {
        Ok(Ok(stream)) => {
            // Reachability is all we wanted; hang up straight away.
            drop(stream);
            debug!("Printer at {} is reachable", target);
            true
        }
        Ok(Err(e)) => {
            debug!("Printer at {} is unreachable: {}", target, e);
            false
        }
        Err(_) => {
            debug!("Printer at {} did not answer within {:?}", target, limit);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_empty_host_is_offline_without_connecting() {
        let started = Instant::now();
        assert!(!probe("", 9100, DEFAULT_PROBE_TIMEOUT).await);
        // No connection attempt means no measurable wait
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_open_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(probe("127.0.0.1", port, DEFAULT_PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_closed_port_is_offline() {
        // Bind then drop to obtain a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(!probe("127.0.0.1", port, DEFAULT_PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_unanswered_host_fails_within_the_limit() {
        // TEST-NET-1 (RFC 5737) never answers, so the attempt either times
        // out or is rejected by the local network stack
        let limit = Duration::from_millis(200);
        let started = Instant::now();
        assert!(!probe("192.0.2.1", 9100, limit).await);
        assert!(started.elapsed() < limit + Duration::from_millis(300));
    }
}
