use clap::Parser;
use miette::{IntoDiagnostic, Report, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info_span, warn};
use tracing_futures::Instrument;

use resp_client::Redis;

/// A simple interactive client for RESP servers.
///
/// Type a command such as `SET mykey hello` and press enter.
#[derive(Parser, Debug)]
#[command(name = "resp-client")]
struct Args {
  /// Server host name or address
  #[arg(default_value = "127.0.0.1")]
  host: String,

  /// Server port
  #[arg(default_value_t = 6379)]
  port: u16,
}

/// Lines with more words than this are not sent.
const MAX_WORDS: usize = 3;

/// Splits a console line on spaces, dropping the empty pieces that repeated
/// or surrounding spaces leave behind.
fn split_words(line: &str) -> Vec<&str> {
  line.split(' ').filter(|word| !word.is_empty()).collect()
}

#[tokio::main]
async fn main() -> Result<()> {
  std::env::set_var(
    "RUST_LOG",
    std::env::var("RUST_LOG").unwrap_or(String::from("resp_client=warn")),
  );

  tracing_subscriber::fmt::init();

  let args = Args::parse();

  println!("A simple RESP client.");
  println!("Using {}:{}", args.host, args.port);
  println!("Enter a command and press enter");

  let redis = Redis::new(args.host, args.port);

  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  while let Some(line) = lines.next_line().await.into_diagnostic()? {
    let words = split_words(&line);

    if words.is_empty() {
      continue;
    }

    if words.len() > MAX_WORDS {
      warn!(words = words.len(), "too many words, command not sent");
      continue;
    }

    let values: Vec<Option<&str>> = words.iter().skip(2).map(|word| Some(*word)).collect();

    let result = redis
      .send_values(words[0], words.get(1).copied(), &values)
      .instrument(info_span!("command", verb = words[0]))
      .await;

    match result {
      Ok(text) => println!("{}", text),
      Err(error) => println!("{:?}", Report::new(error)),
    }
  }

  Ok(())
}
