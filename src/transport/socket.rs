use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use super::codec::{self, CONNECT, Frame, PONG};
use super::error::TransportError;
use super::events::{ServerEvent, UPLOAD_EVENT, UploadRequest};
use crate::influence::Generation;

/// Receives decoded backend events together with the load they belong to.
pub type EventSink = Rc<dyn Fn(Generation, ServerEvent)>;

/// Connection to the compute backend, scoped to one dataset load.
pub trait Transport {
	/// The load this connection was opened for.
	fn generation(&self) -> Generation;
	/// Send the dataset; queued until the namespace is connected.
	fn send_upload(&self, request: &UploadRequest) -> Result<(), TransportError>;
	/// Stop delivering events and close the connection.
	fn disconnect(&self);
}

#[derive(Default)]
struct Outbox {
	connected: bool,
	pending: Vec<String>,
}

/// Socket.IO client over a browser `WebSocket`.
pub struct SocketTransport {
	generation: Generation,
	socket: WebSocket,
	outbox: Rc<RefCell<Outbox>>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
	_on_error: Closure<dyn FnMut(ErrorEvent)>,
}

impl SocketTransport {
	/// Open `url` and forward its events to `sink`, tagged with `generation`.
	pub fn connect(url: &str, generation: Generation, sink: EventSink) -> Result<Self, TransportError> {
		let socket = WebSocket::new(url)?;
		let outbox = Rc::new(RefCell::new(Outbox::default()));

		let (socket_msg, outbox_msg) = (socket.clone(), outbox.clone());
		let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
			let Some(text) = ev.data().as_string() else {
				debug!("ignoring binary frame");
				return;
			};
			match codec::decode(&text) {
				Ok(Frame::Open(_)) => send_raw(&socket_msg, CONNECT),
				Ok(Frame::Ping) => send_raw(&socket_msg, PONG),
				Ok(Frame::Connect) => {
					info!("backend connected (load {})", generation.0);
					let pending = {
						let mut outbox = outbox_msg.borrow_mut();
						outbox.connected = true;
						std::mem::take(&mut outbox.pending)
					};
					for frame in pending {
						send_raw(&socket_msg, &frame);
					}
				}
				Ok(Frame::Disconnect | Frame::Close) => {
					outbox_msg.borrow_mut().connected = false;
					info!("backend disconnected (load {})", generation.0);
				}
				Ok(Frame::ConnectError(reason)) => warn!("backend refused connection: {reason}"),
				Ok(Frame::Event { name, payload }) => match ServerEvent::decode(&name, payload) {
					Ok(Some(event)) => sink(generation, event),
					Ok(None) => debug!("ignoring event {name}"),
					Err(e) => warn!("bad payload for {name}: {e}"),
				},
				Ok(Frame::Pong | Frame::Noop) => {}
				Err(e) => warn!("{e}"),
			}
		});
		socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

		let outbox_close = outbox.clone();
		let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
			outbox_close.borrow_mut().connected = false;
			info!("socket closed: code {} {}", ev.code(), ev.reason());
		});
		socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		let on_error = Closure::<dyn FnMut(ErrorEvent)>::new(move |ev: ErrorEvent| {
			warn!("socket error: {}", ev.message());
		});
		socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		Ok(Self {
			generation,
			socket,
			outbox,
			_on_message: on_message,
			_on_close: on_close,
			_on_error: on_error,
		})
	}
}

fn send_raw(socket: &WebSocket, frame: &str) {
	if let Err(e) = socket.send_with_str(frame) {
		warn!("send failed: {e:?}");
	}
}

impl Transport for SocketTransport {
	fn generation(&self) -> Generation {
		self.generation
	}

	fn send_upload(&self, request: &UploadRequest) -> Result<(), TransportError> {
		let frame = codec::encode_event(UPLOAD_EVENT, request)?;
		let mut outbox = self.outbox.borrow_mut();
		if outbox.connected {
			self.socket.send_with_str(&frame)?;
		} else {
			outbox.pending.push(frame);
		}
		Ok(())
	}

	fn disconnect(&self) {
		self.socket.set_onmessage(None);
		self.socket.set_onclose(None);
		self.socket.set_onerror(None);
		self.outbox.borrow_mut().connected = false;
		if let Err(e) = self.socket.close() {
			warn!("close failed: {e:?}");
		}
	}
}

impl Drop for SocketTransport {
	fn drop(&mut self) {
		self.disconnect();
	}
}
