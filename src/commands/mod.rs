//! Command implementations

mod call;
mod convert;
mod misc;

pub use call::call;
pub use convert::convert;
pub use misc::{fortune, logo, stats, time};

use std::ffi::OsString;
use std::path::Path;

/// Base name of a server-supplied file name, so writes stay in the target directory
pub(crate) fn attachment_name(name: &str) -> OsString {
    Path::new(name)
        .file_name()
        .map_or_else(|| "attachment".into(), ToOwned::to_owned)
}
