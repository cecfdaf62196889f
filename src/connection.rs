use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, trace};

use crate::address::ServerEndpoint;
use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::reply::Reply;

#[derive(Debug)]
enum State {
  Disconnected,
  /// Reads are buffered, writes go straight to the socket.
  Connected(BufReader<TcpStream>),
}

/// The single TCP stream to the server.
///
/// Any failed read or write drops the socket and leaves the connection
/// disconnected, it is never left half open.
#[derive(Debug)]
pub struct Connection {
  endpoint: ServerEndpoint,
  state: State,
}

impl Connection {
  pub fn new(endpoint: ServerEndpoint) -> Self {
    Self {
      endpoint,
      state: State::Disconnected,
    }
  }

  pub fn is_connected(&self) -> bool {
    matches!(self.state, State::Connected(_))
  }

  /// Opens a new stream to the server, replacing any existing one.
  ///
  /// Fails with `Error::NoAddress` before touching the network if the host
  /// does not resolve.
  pub async fn connect(&mut self) -> Result<()> {
    self.close();

    let addr = self.endpoint.socket_addr().await?;

    info!(%addr, "connecting");

    let stream = TcpStream::connect(addr)
      .await
      .map_err(|error| Error::connect(addr, error))?;

    info!(%addr, "connected");

    self.state = State::Connected(BufReader::new(stream));

    Ok(())
  }

  pub async fn write_bytes(&mut self, payload: &[u8]) -> Result<()> {
    let stream = self.stream()?;

    let result = async {
      stream.write_all(payload).await?;
      stream.flush().await
    }
    .await;

    if let Err(error) = result {
      self.close();
      return Err(error.into());
    }

    Ok(())
  }

  /// Returns the next byte from the server, or `None` once the server has
  /// closed the stream.
  pub async fn read_byte(&mut self) -> Result<Option<u8>> {
    let stream = self.stream()?;
    let result = stream.read_u8().await;

    match result {
      Ok(byte) => Ok(Some(byte)),
      Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
        debug!("server closed the stream");
        self.close();
        Ok(None)
      }
      Err(error) => {
        self.close();
        Err(error.into())
      }
    }
  }

  /// Reads exactly one reply from the stream.
  pub async fn read_reply(&mut self) -> Result<Reply> {
    let mut parser = Parser::new();

    loop {
      match self.read_byte().await? {
        Some(byte) => {
          if let Some(reply) = parser.feed(byte)? {
            trace!(?reply, "decoded reply");
            return Ok(reply);
          }
        }
        None => return Err(Error::ConnectionClosed),
      }
    }
  }

  /// Drops the socket. Does nothing when already disconnected.
  pub fn close(&mut self) {
    if let State::Connected(_) = std::mem::replace(&mut self.state, State::Disconnected) {
      debug!(host = self.endpoint.host(), port = self.endpoint.port(), "connection closed");
    }
  }

  fn stream(&mut self) -> Result<&mut BufReader<TcpStream>> {
    match &mut self.state {
      State::Connected(stream) => Ok(stream),
      State::Disconnected => Err(Error::Connection(io::Error::new(
        io::ErrorKind::NotConnected,
        "not connected",
      ))),
    }
  }
}
