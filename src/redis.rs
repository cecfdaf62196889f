/// Sending commands to a Redis Server
///
/// How the interaction between the client and the server works:
///
/// A client sends the Redis server a RESP Array consisting of just Bulk Strings.
/// The server replies with a single RESP value, and only then may the next
/// command be sent.
///
/// # Examples
///
/// The client sends the command INCR counter and the server replies with an
/// integer reply:
///
/// ```terminal
/// client: "*2\r\n$4\r\nINCR\r\n$7\r\ncounter\r\n" -- the request
/// server: ":11\r\n"                               -- the reply
/// ```
use std::iter;
use std::ops::{Deref, DerefMut};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::address::ServerEndpoint;
use crate::connection::Connection;
use crate::error::Result;
use crate::reply::Reply;
use crate::resp;

#[derive(Debug)]
pub struct Redis {
  /// Held for the whole of a request, so one command is in flight at a time.
  connection: Mutex<Connection>,
}

impl Redis {
  /// Creates a client for `host:port`. Nothing is resolved or connected yet.
  pub fn new(host: impl Into<String>, port: u16) -> Self {
    Self {
      connection: Mutex::new(Connection::new(ServerEndpoint::new(host, port))),
    }
  }

  /// Creates a client and connects it right away.
  pub async fn open(host: impl Into<String>, port: u16) -> Result<Self> {
    let redis = Self::new(host, port);
    redis.connect().await?;
    Ok(redis)
  }

  pub async fn connect(&self) -> Result<()> {
    self.connection.lock().await.connect().await
  }

  pub async fn is_connected(&self) -> bool {
    self.connection.lock().await.is_connected()
  }

  pub async fn close(&self) {
    self.connection.lock().await.close();
  }

  /// Sends a command and returns the text of the reply.
  ///
  /// ```no_run
  /// # async fn run() -> resp_client::Result<()> {
  /// let redis = resp_client::Redis::new("127.0.0.1", 6379);
  /// assert_eq!("OK", redis.send(&["SET", "k", "v"]).await?);
  /// assert_eq!("v", redis.send(&["GET", "k"]).await?);
  /// # Ok(())
  /// # }
  /// ```
  pub async fn send<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
    self.send_array(args.iter().map(|arg| Some(arg.as_ref()))).await
  }

  /// Sends a command that is just a verb, e.g. PING.
  pub async fn send_verb(&self, verb: &str) -> Result<String> {
    self.send_key(verb, None).await
  }

  /// Sends a command with a key, e.g. GET mykey.
  pub async fn send_key(&self, verb: &str, key: Option<&str>) -> Result<String> {
    self.send_values(verb, key, &[]).await
  }

  /// Sends a command with a key and any number of values, e.g.
  /// SETEX mykey 10 hello.
  pub async fn send_values(
    &self,
    verb: &str,
    key: Option<&str>,
    values: &[Option<&str>],
  ) -> Result<String> {
    let args = iter::once(Some(verb))
      .chain(iter::once(key))
      .chain(values.iter().copied());

    self.send_array(args).await
  }

  /// Sends any list of arguments. Absent ones are left out of the command.
  pub async fn send_array<'a, I>(&self, args: I) -> Result<String>
  where
    I: IntoIterator<Item = Option<&'a str>>,
  {
    self.request(args).await.map(Reply::into_text)
  }

  /// Like `send_array`, but keeps the kind of reply the server sent.
  ///
  /// Connects first if needed. If anything goes wrong, including the server
  /// rejecting the command, the connection is closed before the error is
  /// returned.
  pub async fn request<'a, I>(&self, args: I) -> Result<Reply>
  where
    I: IntoIterator<Item = Option<&'a str>>,
  {
    let payload = resp::encode(args);

    info!(command = %resp::escape(&payload), "sending command");

    let mut connection = self.connection.lock().await;
    let mut exchange = Exchange::new(&mut connection);

    if !exchange.is_connected() {
      exchange.connect().await?;
    }

    exchange.write_bytes(payload.as_bytes()).await?;

    let reply = exchange.read_reply().await?;

    info!(?reply, "reply");

    exchange.complete();

    Ok(reply)
  }
}

/// Closes the connection when dropped, unless the request completed.
///
/// This covers early returns through `?` as well as the request future being
/// dropped halfway.
struct Exchange<'a> {
  connection: &'a mut Connection,
  completed: bool,
}

impl<'a> Exchange<'a> {
  fn new(connection: &'a mut Connection) -> Self {
    Self {
      connection,
      completed: false,
    }
  }

  fn complete(&mut self) {
    self.completed = true;
  }
}

impl Deref for Exchange<'_> {
  type Target = Connection;

  fn deref(&self) -> &Connection {
    &*self.connection
  }
}

impl DerefMut for Exchange<'_> {
  fn deref_mut(&mut self) -> &mut Connection {
    &mut *self.connection
  }
}

impl Drop for Exchange<'_> {
  fn drop(&mut self) {
    if !self.completed {
      warn!("request failed, closing connection");
      self.connection.close();
    }
  }
}
