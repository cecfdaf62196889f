use std::net::{IpAddr, SocketAddr};

use tokio::net::lookup_host;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Where the client connects to.
///
/// The address is resolved the first time it is needed and kept from then on,
/// a later DNS change does not move an existing client.
#[derive(Debug, Clone)]
pub struct ServerEndpoint {
  host: String,
  port: u16,
  resolved: Option<IpAddr>,
}

impl ServerEndpoint {
  pub fn new(host: impl Into<String>, port: u16) -> Self {
    Self {
      host: host.into(),
      port,
      resolved: None,
    }
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn resolved_address(&self) -> Option<IpAddr> {
    self.resolved
  }

  /// Returns the socket address to connect to, resolving the host first if
  /// that has not succeeded yet.
  pub async fn socket_addr(&mut self) -> Result<SocketAddr> {
    if self.resolved.is_none() {
      self.resolved = resolve(&self.host).await;
    }

    match self.resolved {
      Some(ip) => Ok(SocketAddr::new(ip, self.port)),
      None => Err(Error::NoAddress {
        host: self.host.clone(),
      }),
    }
  }
}

/// Turns `host` into an address.
///
/// Literal addresses (v4 or v6) are used as they are. Anything else goes
/// through DNS and the first IPv4 answer wins. Lookup failures are not errors
/// here, they just mean there is no address.
pub async fn resolve(host: &str) -> Option<IpAddr> {
  if let Ok(ip) = host.parse::<IpAddr>() {
    return Some(ip);
  }

  match lookup_host((host, 0)).await {
    Ok(addrs) => {
      let ip = addrs.map(|addr| addr.ip()).find(IpAddr::is_ipv4);
      debug!(host, ?ip, "resolved");
      ip
    }
    Err(error) => {
      warn!(host, %error, "lookup failed");
      None
    }
  }
}
