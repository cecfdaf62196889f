/// Clients send commands to the server as a RESP Array of Bulk Strings.
///
/// RESP uses prefixed lengths to transfer bulk data, so the payload never
/// has to be quoted or escaped:
///
/// ```terminal
/// SET mykey hello  ->  "*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$5\r\nhello\r\n"
/// ```
///
/// Every argument is sent as a bulk string, numbers included.
const CRLF: &str = "\r\n";

/// Encodes `args` as a RESP array of bulk strings.
///
/// Absent arguments are dropped: they are neither counted in the array header
/// nor written to the body. Lengths are byte lengths of the UTF-8 text.
pub fn encode<'a, I>(args: I) -> String
where
  I: IntoIterator<Item = Option<&'a str>>,
{
  let pieces: Vec<&str> = args.into_iter().flatten().collect();

  let mut buffer = String::with_capacity(16 + pieces.iter().map(|piece| piece.len() + 16).sum::<usize>());

  buffer.push('*');
  buffer.push_str(&pieces.len().to_string());
  buffer.push_str(CRLF);

  for piece in pieces {
    buffer.push('$');
    buffer.push_str(&piece.len().to_string());
    buffer.push_str(CRLF);
    buffer.push_str(piece);
    buffer.push_str(CRLF);
  }

  buffer
}

/// Makes a RESP payload readable on a single log line.
pub(crate) fn escape(payload: &str) -> String {
  payload.replace('\r', "\\r").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_encode() {
    let tests = vec![
      (vec!["LLEN", "mylist"], "*2\r\n$4\r\nLLEN\r\n$6\r\nmylist\r\n"),
      (vec!["PING"], "*1\r\n$4\r\nPING\r\n"),
      (
        vec!["SETEX", "mykey", "10", "Hello"],
        "*4\r\n$5\r\nSETEX\r\n$5\r\nmykey\r\n$2\r\n10\r\n$5\r\nHello\r\n",
      ),
      (
        vec!["SET", "test:mykey", "The Quick Brown Fox"],
        "*3\r\n$3\r\nSET\r\n$10\r\ntest:mykey\r\n$19\r\nThe Quick Brown Fox\r\n",
      ),
    ];

    for (input, expected) in tests {
      assert_eq!(String::from(expected), encode(input.into_iter().map(Some)));
    }
  }

  #[test]
  fn empty_command_is_an_empty_array() {
    assert_eq!("*0\r\n", encode(Vec::<Option<&str>>::new()));
    assert_eq!("*0\r\n", encode(vec![None, None]));
  }

  #[test]
  fn absent_arguments_are_skipped() {
    let tests = vec![
      (vec![Some("SET"), None, Some("v")], "*2\r\n$3\r\nSET\r\n$1\r\nv\r\n"),
      (vec![Some("PING"), None, None], "*1\r\n$4\r\nPING\r\n"),
      (
        vec![None, Some("GET"), None, Some("k")],
        "*2\r\n$3\r\nGET\r\n$1\r\nk\r\n",
      ),
    ];

    for (input, expected) in tests {
      assert_eq!(String::from(expected), encode(input));
    }
  }

  #[test]
  fn lengths_count_bytes_not_characters() {
    assert_eq!("*1\r\n$6\r\nnaïve\r\n", encode(vec![Some("naïve")]));
    assert_eq!("*1\r\n$0\r\n\r\n", encode(vec![Some("")]));
  }

  #[test]
  fn escape_makes_terminators_visible() {
    assert_eq!("*1\\r\\n$4\\r\\nPING\\r\\n", escape("*1\r\n$4\r\nPING\r\n"));
  }
}
