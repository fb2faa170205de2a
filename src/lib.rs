//! jutge-api-client - Client library for the Jutge.org API
//!
//! Remote operations are invoked by name through [`JutgeApiClient::execute`].
//! Each call travels as one multipart HTTP exchange: a JSON envelope
//! (function, input, session metadata) plus optional input files out, and a
//! JSON answer plus optional attachments back.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod misc;
pub mod models;
pub mod output;
pub mod protocol;
pub mod transport;
pub mod util;

pub use client::{JutgeApiClient, Session};
pub use codec::Built;
pub use config::ClientConfig;
pub use error::{ClientError, ErrorDescriptor, ErrorKind};
pub use protocol::{Download, Meta};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
