//! # UnitXchange Network Utilities (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! Port discovery for the `serve` command. When the configured port is taken,
//! the server walks forward one port at a time until a bind succeeds or the
//! attempt budget runs out.
//!
//! ```rust
//! let addr = network::find_available_port(host, 8501, DEFAULT_PORT_ATTEMPTS).await?;
//! ```
//!
use crate::core::error::Result;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Number of consecutive ports tried before giving up.
pub const DEFAULT_PORT_ATTEMPTS: u8 = 10;

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then each following port, up to `max_attempts` ports.
/// The probe listener is dropped immediately so the caller can bind the address.
///
/// ## Errors
///
/// Returns an `Err` if no port in the range could be bound.
pub async fn find_available_port(
    req_host: IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}
