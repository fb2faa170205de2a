//! Typed payloads used by the client itself and the `misc` namespace

use serde::{Deserialize, Serialize};

/// Input of `auth.login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsIn {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Output of `auth.login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsOut {
    /// Session token
    pub token: String,
    /// Token expiration, as sent by the server
    #[serde(default)]
    pub expiration: Option<String>,
    /// User identifier
    #[serde(default)]
    pub user_uid: String,
    /// Legacy error string; non-empty means the login failed
    #[serde(default)]
    pub error: String,
}

/// Output of `misc.get_time`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Time {
    /// Full timestamp text
    pub full_time: String,
    /// Seconds since the epoch
    pub int_timestamp: i64,
    /// Seconds since the epoch, fractional
    pub float_timestamp: f64,
    /// Time of day
    pub time: String,
    /// Date
    pub date: String,
}

/// Output of `misc.get_homepage_stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomepageStats {
    /// Registered users
    pub users: u64,
    /// Problems
    pub problems: u64,
    /// Submissions
    pub submissions: u64,
    /// Exams
    #[serde(default)]
    pub exams: u64,
    /// Contests
    #[serde(default)]
    pub contests: u64,
}
