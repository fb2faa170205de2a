//! `misc` namespace: public endpoints that need no login

use serde_json::Value;

use crate::client::JutgeApiClient;
use crate::codec::Built;
use crate::error::{ClientError, Result};
use crate::models::{HomepageStats, Time};
use crate::protocol::Download;
use crate::transport::Transport;

/// Endpoints under `misc.*`
#[derive(Debug)]
pub struct Misc<'a, T> {
    root: &'a mut JutgeApiClient<T>,
}

impl<'a, T: Transport> Misc<'a, T> {
    pub(crate) const fn new(root: &'a mut JutgeApiClient<T>) -> Self {
        Self { root }
    }

    /// A random fortune cookie
    pub fn get_fortune(self) -> Result<Built<String>> {
        self.root
            .call::<Value, String>("misc.get_fortune", &Value::Null)
            .map(|(out, _)| out)
    }

    /// Current server time
    pub fn get_time(self) -> Result<Built<Time>> {
        self.root
            .call::<Value, Time>("misc.get_time", &Value::Null)
            .map(|(out, _)| out)
    }

    /// Counters shown on the homepage
    pub fn get_homepage_stats(self) -> Result<Built<HomepageStats>> {
        self.root
            .call::<Value, HomepageStats>("misc.get_homepage_stats", &Value::Null)
            .map(|(out, _)| out)
    }

    /// The Jutge logo as a PNG attachment
    pub fn get_logo(self) -> Result<Download> {
        let (_, ofiles) = self.root.execute("misc.get_logo", Value::Null, &mut [])?;
        single_file(ofiles)
    }
}

fn single_file(ofiles: Vec<Download>) -> Result<Download> {
    let count = ofiles.len();
    let mut files = ofiles.into_iter();
    match (files.next(), files.next()) {
        (Some(file), None) => Ok(file),
        _ => Err(ClientError::protocol(format!("expected one attachment, got {count}"))),
    }
}
