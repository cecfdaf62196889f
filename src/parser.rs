/// Decodes exactly one reply, one byte at a time.
///
/// The parser never looks ahead and never backtracks, so it can be fed
/// straight from a socket without knowing how much of the reply has arrived.
/// "\r" is dropped wherever it appears and "\n" ends a line.
///
/// A "*" array header is not understood: it is read as ordinary text and the
/// elements that follow are left unread.
use crate::error::{Error, Result};
use crate::reply::Reply;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
  Simple,
  Integer,
  Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  /// Nothing read yet, the next byte may be a type marker.
  Start,
  ReadingLine(LineKind),
  /// Inside the "$<len>" header. The length is only checked for -1.
  ReadingBulkLength,
  ReadingBulkBody,
  /// A reply has been produced.
  Done,
  /// The server sent an error line, or the reply could not be decoded.
  Error,
}

#[derive(Debug)]
pub struct Parser {
  state: State,
  /// Bytes of the value read so far.
  buffer: Vec<u8>,
  length: Vec<u8>,
}

impl Default for Parser {
  fn default() -> Self {
    Self::new()
  }
}

impl Parser {
  pub fn new() -> Self {
    Self {
      state: State::Start,
      buffer: Vec::new(),
      length: Vec::new(),
    }
  }

  /// Returns true once the parser has produced a reply or an error.
  pub fn is_finished(&self) -> bool {
    matches!(self.state, State::Done | State::Error)
  }

  /// Advances the parser by one byte.
  ///
  /// Returns `Ok(None)` while the reply is incomplete and the reply itself
  /// once its line terminator has been read.
  pub fn feed(&mut self, byte: u8) -> Result<Option<Reply>> {
    match self.state {
      State::Start => match byte {
        b'+' => self.state = State::ReadingLine(LineKind::Simple),
        b':' => self.state = State::ReadingLine(LineKind::Integer),
        b'-' => self.state = State::ReadingLine(LineKind::Error),
        b'$' => self.state = State::ReadingBulkLength,
        b'\r' => {}
        b'\n' => return self.finish_line(LineKind::Simple),
        _ => {
          self.buffer.push(byte);
          self.state = State::ReadingLine(LineKind::Simple);
        }
      },
      State::ReadingLine(kind) => match byte {
        b'\r' => {}
        b'\n' => return self.finish_line(kind),
        _ => self.buffer.push(byte),
      },
      State::ReadingBulkLength => match byte {
        b'\r' => {}
        // A null bulk string has no payload line to wait for.
        b'\n' if self.length == b"-1" => return self.finish_bulk(),
        b'\n' => self.state = State::ReadingBulkBody,
        _ => self.length.push(byte),
      },
      State::ReadingBulkBody => match byte {
        b'\r' => {}
        b'\n' => return self.finish_bulk(),
        _ => self.buffer.push(byte),
      },
      State::Done | State::Error => {
        self.state = State::Error;
        return Err(Error::Protocol {
          src: String::from_utf8_lossy(&[byte]).to_string(),
          span: (0, 1).into(),
          message: String::from("reply already complete"),
        });
      }
    }

    Ok(None)
  }

  fn finish_line(&mut self, kind: LineKind) -> Result<Option<Reply>> {
    let text = self.take_text()?;

    match kind {
      LineKind::Simple => self.done(Reply::Simple(text)),
      LineKind::Integer => self.done(Reply::Integer(text)),
      LineKind::Error => {
        self.state = State::Error;
        Err(Error::Server(text))
      }
    }
  }

  fn finish_bulk(&mut self) -> Result<Option<Reply>> {
    let text = self.take_text()?;
    self.done(Reply::BulkString(text))
  }

  fn done(&mut self, reply: Reply) -> Result<Option<Reply>> {
    self.state = State::Done;
    Ok(Some(reply))
  }

  fn take_text(&mut self) -> Result<String> {
    let bytes = std::mem::take(&mut self.buffer);

    String::from_utf8(bytes).map_err(|error| {
      self.state = State::Error;

      let valid_up_to = error.utf8_error().valid_up_to();

      Error::Protocol {
        src: String::from_utf8_lossy(error.as_bytes()).to_string(),
        span: (valid_up_to, char::REPLACEMENT_CHARACTER.len_utf8()).into(),
        message: String::from("invalid UTF-8"),
      }
    })
  }
}

/// Decodes the first reply found in `input`.
///
/// Running out of input before the reply is complete is reported the same way
/// a socket closing mid-reply is.
pub fn parse<I>(input: I) -> Result<Reply>
where
  I: IntoIterator<Item = u8>,
{
  let mut parser = Parser::new();

  for byte in input {
    if let Some(reply) = parser.feed(byte)? {
      return Ok(reply);
    }
  }

  Err(Error::ConnectionClosed)
}
