use std::io;
use std::net::SocketAddr;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a call into the client can fail.
///
/// None of these are retried internally: whatever happens during a `send`
/// closes the connection and is handed back to the caller.
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
  #[error("no IPv4 address for server {host}")]
  #[diagnostic(
    code(resp_client::no_address),
    help("check that the host name resolves to an IPv4 address")
  )]
  NoAddress { host: String },

  #[error("connection refused by {addr}")]
  #[diagnostic(
    code(resp_client::connection_refused),
    help("is the server running and listening on this port?")
  )]
  ConnectionRefused {
    addr: SocketAddr,
    #[source]
    source: io::Error,
  },

  #[error("connection error")]
  #[diagnostic(code(resp_client::connection))]
  Connection(#[from] io::Error),

  #[error("connection closed before a full reply was read")]
  #[diagnostic(code(resp_client::connection_closed))]
  ConnectionClosed,

  /// The server answered with an error line, e.g. for an unknown command.
  #[error("{0}")]
  #[diagnostic(code(resp_client::server))]
  Server(String),

  #[error("malformed reply")]
  #[diagnostic(code(resp_client::protocol))]
  Protocol {
    #[source_code]
    src: String,
    #[label("{}", message)]
    span: SourceSpan,
    message: String,
  },
}

impl Error {
  /// Wraps a failed connect, singling out a refused handshake.
  pub(crate) fn connect(addr: SocketAddr, source: io::Error) -> Self {
    match source.kind() {
      io::ErrorKind::ConnectionRefused => Error::ConnectionRefused { addr, source },
      _ => Error::Connection(source),
    }
  }

  /// Returns true if the server itself rejected the command.
  pub fn is_server_error(&self) -> bool {
    matches!(self, Error::Server(_))
  }
}
