/// A single decoded server reply.
///
/// In RESP, the type of a reply depends on its first byte:
///
/// For Simple Strings the first byte of the reply is "+"
/// For Errors the first byte of the reply is "-"
/// For Integers the first byte of the reply is ":"
/// For Bulk Strings the first byte of the reply is "$"
///
/// Errors never show up here, they are turned into `Error::Server` by the
/// parser. Arrays ("*") are not decoded at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
  /// When the first byte of the reply is "+"
  ///
  /// Also used for a line that starts without any marker.
  ///
  /// # Examples
  ///
  /// ```terminal
  /// "+OK\r\n"
  /// "+PONG\r\n"
  /// ```
  Simple(String),
  /// When the first byte of the reply is ":"
  ///
  /// The digits are kept as text, nothing is parsed.
  ///
  /// # Examples
  ///
  /// ```terminal
  /// ":0\r\n"
  /// ":1000\r\n"
  /// ```
  Integer(String),
  /// When the first byte of the reply is "$"
  ///
  /// The length line is skipped and the line after it is the payload. A null
  /// bulk string ("$-1\r\n") decodes to an empty payload, just like "$0".
  ///
  /// # Examples
  ///
  /// ```terminal
  /// "$6\r\nfoobar\r\n"
  /// "$0\r\n\r\n"
  /// "$-1\r\n"
  /// ```
  BulkString(String),
}

impl Reply {
  pub fn as_str(&self) -> &str {
    match self {
      Reply::Simple(text) | Reply::Integer(text) | Reply::BulkString(text) => text,
    }
  }

  pub fn into_text(self) -> String {
    match self {
      Reply::Simple(text) | Reply::Integer(text) | Reply::BulkString(text) => text,
    }
  }
}
