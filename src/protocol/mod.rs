//! Multipart envelope protocol
//!
//! - `multipart` - the `multipart/form-data` wire codec
//! - `envelope` - request building and response parsing on top of it
//! - `download` - attachments extracted from responses

mod download;
pub mod envelope;
pub mod multipart;

pub use download::Download;
pub use envelope::{Envelope, Meta, build_request, parse_response};
