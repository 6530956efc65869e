//! Talking to the compute backend: Socket.IO framing, event payloads, files.

pub mod codec;
mod error;
mod events;
mod files;
mod socket;

pub use error::{TransportError, UploadError};
pub use events::{ServerEvent, TopicInfo, UPLOAD_EVENT, UploadRequest};
pub use files::{read_file_base64, save_archive};
pub use socket::{EventSink, SocketTransport, Transport};
