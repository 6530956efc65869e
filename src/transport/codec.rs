//! Engine.IO v4 / Socket.IO v5 text framing over a raw websocket.
//!
//! Only the default namespace and plain (non-binary) events are spoken.

use serde::Serialize;
use serde_json::Value;

use super::error::TransportError;

/// Client answer to a server ping.
pub const PONG: &str = "3";
/// Connect to the default namespace.
pub const CONNECT: &str = "40";

/// A decoded text frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
	/// Engine.IO handshake; carries the session JSON.
	Open(Value),
	/// Engine.IO close.
	Close,
	/// Server heartbeat; must be answered with [`PONG`].
	Ping,
	/// Heartbeat answer.
	Pong,
	/// Namespace connected.
	Connect,
	/// Namespace disconnected by the server.
	Disconnect,
	/// Namespace connection refused.
	ConnectError(Value),
	/// A named event with its first argument.
	Event {
		/// Event name.
		name: String,
		/// First argument, `null` when absent.
		payload: Value,
	},
	/// Frames the client has no use for (acks, upgrades, noop).
	Noop,
}

/// Decode one websocket text message.
pub fn decode(text: &str) -> Result<Frame, TransportError> {
	let mut chars = text.chars();
	let engine = chars
		.next()
		.ok_or_else(|| TransportError::Frame("empty frame".into()))?;
	let rest = chars.as_str();
	match engine {
		'0' => Ok(Frame::Open(serde_json::from_str(rest)?)),
		'1' => Ok(Frame::Close),
		'2' => Ok(Frame::Ping),
		'3' => Ok(Frame::Pong),
		'4' => decode_packet(rest),
		'5' | '6' => Ok(Frame::Noop),
		other => Err(TransportError::Frame(format!("unknown engine packet type {other:?}"))),
	}
}

fn decode_packet(packet: &str) -> Result<Frame, TransportError> {
	let mut chars = packet.chars();
	let kind = chars
		.next()
		.ok_or_else(|| TransportError::Frame("empty socket packet".into()))?;
	let body = skip_namespace(chars.as_str());
	match kind {
		'0' => Ok(Frame::Connect),
		'1' => Ok(Frame::Disconnect),
		'2' => decode_event(body),
		'3' => Ok(Frame::Noop),
		'4' => Ok(Frame::ConnectError(if body.is_empty() {
			Value::Null
		} else {
			serde_json::from_str(body)?
		})),
		other => Err(TransportError::Frame(format!("unsupported socket packet type {other:?}"))),
	}
}

/// Drop an optional `/namespace,` prefix and an optional ack id.
fn skip_namespace(body: &str) -> &str {
	let body = match body.strip_prefix('/') {
		Some(rest) => rest.split_once(',').map_or("", |(_, tail)| tail),
		None => body,
	};
	body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn decode_event(body: &str) -> Result<Frame, TransportError> {
	let Value::Array(mut args) = serde_json::from_str(body)? else {
		return Err(TransportError::Frame("event body is not an array".into()));
	};
	if args.is_empty() {
		return Err(TransportError::Frame("event without a name".into()));
	}
	let name = match args.remove(0) {
		Value::String(name) => name,
		other => return Err(TransportError::Frame(format!("event name is not a string: {other}"))),
	};
	let payload = if args.is_empty() {
		Value::Null
	} else {
		args.remove(0)
	};
	Ok(Frame::Event { name, payload })
}

/// Encode an event for the default namespace.
pub fn encode_event<T: Serialize>(name: &str, payload: &T) -> Result<String, TransportError> {
	let body = serde_json::to_string(&(name, payload))?;
	Ok(format!("42{body}"))
}
