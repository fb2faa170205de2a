//! Session client
//!
//! [`JutgeApiClient`] owns the session state and exposes [`JutgeApiClient::execute`],
//! the single entry point every endpoint wrapper goes through.
//!
//! The client is synchronous: a call sends one request and blocks until the
//! whole response is parsed. Session metadata is read when a request is built
//! and written only by `login`, `logout` and `restore_session`, all of which
//! take `&mut self`.

use std::io::Read;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::codec::{self, Built};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::misc::Misc;
use crate::models::{CredentialsIn, CredentialsOut};
use crate::protocol::{self, Download, Meta};
use crate::transport::{HttpTransport, Transport};

/// Authentication state of a client
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No session; requests carry `meta: null`
    #[default]
    Anonymous,
    /// Logged in; requests carry this metadata
    Authenticated(Meta),
}

impl Session {
    /// Metadata to attach to requests
    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(meta) => Some(meta),
        }
    }
}

/// Client for the Jutge API
#[derive(Debug)]
pub struct JutgeApiClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
    session: Session,
    cache: ResponseCache,
}

impl JutgeApiClient<HttpTransport> {
    /// Client using the user configuration and the HTTP transport
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::load())
    }

    /// Client using `config` and the HTTP transport
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> JutgeApiClient<T> {
    /// Client using `config` and a custom transport
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            config,
            session: Session::Anonymous,
            cache: ResponseCache::default(),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mutable configuration (URL, cache switch, TTLs)
    pub const fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// The underlying transport
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Current session state
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current session metadata, if logged in
    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.session.meta()
    }

    /// Whether a login has succeeded and no logout happened since
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.session, Session::Authenticated(_))
    }

    /// Reuse a session obtained elsewhere (e.g. a token saved by a previous run)
    pub fn restore_session(&mut self, meta: Meta) {
        self.session = Session::Authenticated(meta);
    }

    /// Invoke the remote function `func`
    ///
    /// `ifiles` are sent as `file_0`, `file_1`, ... in order; they are read
    /// but not closed. Returns the output and any attachments.
    pub fn execute(
        &mut self,
        func: &str,
        input: Value,
        ifiles: &mut [&mut dyn Read],
    ) -> Result<(Value, Vec<Download>)> {
        let cached = match self.config.ttl(func) {
            Some(ttl) if ifiles.is_empty() => Some((ResponseCache::key(func, &input), ttl)),
            _ => None,
        };
        if let Some((key, ttl)) = &cached
            && let Some(hit) = self.cache.lookup(key, *ttl, ResponseCache::now())
        {
            log::debug!("{func}: served from cache");
            return Ok(hit);
        }

        log::debug!("{func}: sending request with {} input file(s)", ifiles.len());
        let request = protocol::build_request(func, input, self.session.meta(), ifiles)?;
        let response = self.transport.post(&self.config.api_url, request)?;
        let (output, ofiles) = protocol::parse_response(&response)?;

        if let Some((key, _)) = cached {
            self.cache
                .store(key, output.clone(), ofiles.clone(), ResponseCache::now());
        }
        Ok((output, ofiles))
    }

    /// Typed wrapper over [`JutgeApiClient::execute`] without input files
    pub fn call<I, O>(&mut self, func: &str, input: &I) -> Result<(Built<O>, Vec<Download>)>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = codec::to_jsonable(input)?;
        let (output, ofiles) = self.execute(func, input, &mut [])?;
        Ok((codec::build(output), ofiles))
    }

    /// Log in and keep the session for the following requests
    ///
    /// The login request itself is sent anonymously. Invalid credentials
    /// fail with [`ClientError::Unauthorized`] and leave the client anonymous.
    pub fn login(&mut self, email: &str, password: &str) -> Result<CredentialsOut> {
        self.session = Session::Anonymous;
        let input = codec::to_jsonable(&CredentialsIn {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let (output, _) = self.execute("auth.login", input, &mut [])?;

        // older servers signal failure through an `error` string in the output
        if let Some(error) = output.get("error").and_then(Value::as_str)
            && !error.is_empty()
        {
            return Err(ClientError::Unauthorized(error.to_string()));
        }

        let credentials: CredentialsOut = codec::build(output).require()?;
        self.session = Session::Authenticated(Meta::new(credentials.token.clone()));
        log::debug!("logged in as {}", credentials.user_uid);
        Ok(credentials)
    }

    /// Log out and forget the session
    ///
    /// Being already logged out is not an error. Other failures are returned
    /// unless `silent` is set, in which case they are dropped. The session is
    /// cleared in every case.
    pub fn logout(&mut self, silent: bool) -> Result<()> {
        let result = self.execute("auth.logout", Value::Null, &mut []);
        self.session = Session::Anonymous;

        match result {
            Ok(_) => {},
            Err(e) if e.is_unauthorized() => log::debug!("logout: session was not active"),
            Err(e) if silent => log::debug!("logout failed: {e}"),
            Err(e) => {
                log::warn!("error at log out: {e}");
                return Err(e);
            },
        }
        if !silent {
            log::info!("logged out");
        }
        Ok(())
    }

    /// Drop all cached responses
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Live cache entries as JSON, for persisting between runs
    pub fn get_cache(&mut self) -> Result<String> {
        self.cache
            .remove_expired(&self.config.client_ttls, ResponseCache::now());
        self.cache.to_json()
    }

    /// Replace the cache with entries previously returned by `get_cache`
    pub fn set_cache(&mut self, cache: &str) -> Result<()> {
        self.cache.replace_from_json(cache)?;
        self.cache
            .remove_expired(&self.config.client_ttls, ResponseCache::now());
        Ok(())
    }

    /// The `misc` endpoint namespace
    pub const fn misc(&mut self) -> Misc<'_, T> {
        Misc::new(self)
    }
}
