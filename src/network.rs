//! TCP reachability probe

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::net::TcpStream;

/// Default probe host (Google public DNS)
pub const DEFAULT_PROBE_HOST: &str = "8.8.8.8";

/// Default probe port (53/tcp, DNS)
pub const DEFAULT_PROBE_PORT: u16 = 53;

/// Default connect timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// Probe reachability by opening a TCP connection to `host:port` within `timeout`.
///
/// Any failure (DNS, refused, unreachable, timeout) counts as unreachable.
/// The connection is dropped as soon as it is established.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    tracing::debug!("Connecting to {}:{} (timeout {:?})", host, port, timeout);
    let result = connects_within(timeout, TcpStream::connect((host, port))).await;
    if result {
        tracing::debug!("Probe: OK");
    } else {
        tracing::debug!("Probe: failed or timeout");
    }
    result
}

/// `true` if `connect` yields a connection before `timeout`; the connection is dropped.
async fn connects_within<C, T>(timeout: Duration, connect: C) -> bool
where
    C: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(conn)) => {
            drop(conn);
            true
        }
        Ok(Err(e)) => {
            tracing::debug!("Connect error: {}", e);
            false
        }
        Err(_) => {
            tracing::debug!("Connect timed out after {:?}", timeout);
            false
        }
    }
}
