//! A small client for the Redis Serialization Protocol (RESP).
//!
//! RESP is a serialization protocol that supports the following data types:
//! Simple Strings, Errors, Integers, Bulk Strings and Arrays.
//!
//! The way RESP is used as a request-response protocol is the following:
//!
//! - Clients send commands to a Redis server as a RESP Array of Bulk Strings.
//! - The server replies with one of the RESP types according to the command implementation.
//!
//! In RESP different parts of the protocol are always terminated with "\r\n" (CRLF).
//!
//! This client decodes simple strings, errors, integers and bulk strings.
//! Array replies are not supported.
mod address;
mod connection;
mod error;
mod parser;
mod redis;
mod reply;
mod resp;

pub use address::{resolve, ServerEndpoint};
pub use connection::Connection;
pub use error::{Error, Result};
pub use parser::{parse, Parser};
pub use redis::Redis;
pub use reply::Reply;
pub use resp::encode;
