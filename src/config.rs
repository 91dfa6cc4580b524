//! # Node configuration
//!
//! Runtime settings for a telemetry node, read from a small JSON document kept
//! on local storage. Strings are borrowed from the document buffer, so the
//! buffer must outlive the [`NodeConfig`].
//!
//! ```rust
//! use telenode::config::NodeConfig;
//!
//! let json = r#"{"host":"api.thingspeak.com","api_key":"ABC123","deadline_ticks":500}"#;
//! let config = NodeConfig::from_json(json).unwrap();
//!
//! assert_eq!(config.host, "api.thingspeak.com");
//! assert_eq!(config.path, "/update");
//! assert_eq!(config.port, 80);
//! assert_eq!(config.client_config().deadline_ticks, Some(500));
//! ```

use serde::Deserialize;

use crate::network::application::http::client::{
    ClientConfig, DEFAULT_RECV_CHUNK, DEFAULT_SEND_CHUNK,
};
use crate::network::link::{Credentials, LinkAttach};
use crate::network::transport::HTTP_PORT;
use crate::storage::LocalStorage;

/// Errors raised while loading a configuration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The document is not valid JSON or does not match the expected shape.
    Parse,
    /// A required setting is present but unusable, e.g. an empty host.
    Invalid,
    /// The settings file could not be read.
    Storage(crate::storage::error::Error),
}

impl From<crate::storage::error::Error> for Error {
    fn from(e: crate::storage::error::Error) -> Self {
        Error::Storage(e)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Parse => defmt::write!(f, "Parse"),
            Error::Invalid => defmt::write!(f, "Invalid"),
            Error::Storage(e) => defmt::write!(f, "Storage({})", e),
        }
    }
}

/// Path the update request is sent to when none is configured.
pub const DEFAULT_PATH: &str = "/update";

/// Milliseconds between uploads when none is configured.
pub const DEFAULT_UPLOAD_INTERVAL_MS: u32 = 60_000;

/// Milliseconds between local log records when none is configured.
pub const DEFAULT_LOG_INTERVAL_MS: u32 = 60_000;

fn default_path() -> &'static str {
    DEFAULT_PATH
}

fn default_upload_interval() -> u32 {
    DEFAULT_UPLOAD_INTERVAL_MS
}

fn default_log_interval() -> u32 {
    DEFAULT_LOG_INTERVAL_MS
}

fn default_send_chunk() -> usize {
    DEFAULT_SEND_CHUNK
}

fn default_recv_chunk() -> usize {
    DEFAULT_RECV_CHUNK
}

fn default_port() -> u16 {
    HTTP_PORT
}

/// Settings for one telemetry node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeConfig<'a> {
    /// Server host name, also sent as the `Host` header.
    pub host: &'a str,
    /// Request path of the update endpoint.
    #[serde(default = "default_path")]
    pub path: &'a str,
    /// Write key added to every update.
    #[serde(default, borrow)]
    pub api_key: Option<&'a str>,
    /// Period between uploads.
    #[serde(default = "default_upload_interval")]
    pub upload_interval_ms: u32,
    /// Period between local CSV records.
    #[serde(default = "default_log_interval")]
    pub log_interval_ms: u32,
    /// Bytes written to the transport per tick.
    #[serde(default = "default_send_chunk")]
    pub send_chunk: usize,
    /// Bytes read from the transport per tick.
    #[serde(default = "default_recv_chunk")]
    pub recv_chunk: usize,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Ticks a transfer may take before it is abandoned.
    #[serde(default)]
    pub deadline_ticks: Option<u32>,
    /// Cellular access point name.
    #[serde(default, borrow)]
    pub apn: Option<&'a str>,
    /// Cellular user name.
    #[serde(default, borrow)]
    pub username: Option<&'a str>,
    /// Cellular password.
    #[serde(default, borrow)]
    pub password: Option<&'a str>,
    /// Attach attempts allowed before giving up on the cellular bearer.
    #[serde(default)]
    pub attach_ticks: Option<u32>,
}

impl<'a> NodeConfig<'a> {
    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &'a str) -> Result<Self, Error> {
        let (config, _) =
            serde_json_core::from_str::<NodeConfig<'a>>(json).map_err(|_| Error::Parse)?;
        if config.host.is_empty() {
            return Err(Error::Invalid);
        }
        Ok(config)
    }

    /// Read the settings file at `path` into `buf` and parse it.
    pub fn load<S: LocalStorage>(
        storage: &mut S,
        path: &str,
        buf: &'a mut [u8],
    ) -> Result<Self, Error> {
        if !storage.file_exists(path) {
            warn!("settings file not found");
            return Err(Error::Storage(crate::storage::error::Error::NotFound));
        }
        let len = storage.read_to_buffer(path, buf)?;
        let json = core::str::from_utf8(&buf[..len]).map_err(|_| Error::Parse)?;
        let config = Self::from_json(json)?;
        info!("settings loaded");
        Ok(config)
    }

    /// Transfer settings for a [`NetworkClient`](crate::network::application::http::NetworkClient).
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            send_chunk: self.send_chunk.max(1),
            recv_chunk: self.recv_chunk.max(1),
            port: self.port,
            deadline_ticks: self.deadline_ticks,
        }
    }

    /// Whether credentials for a cellular link are present.
    pub fn has_cellular_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    /// Bearer credentials, if an access point name is configured. A missing
    /// user name or password is sent as an empty string.
    pub fn credentials(&self) -> Option<Credentials<'a>> {
        let apn = self.apn.filter(|apn| !apn.is_empty())?;
        Some(Credentials::new(
            apn,
            self.username.unwrap_or(""),
            self.password.unwrap_or(""),
        ))
    }

    /// A bearer attach for the configured credentials, bounded by
    /// `attach_ticks`. `None` when the node has no cellular settings.
    pub fn link_attach(&self) -> Option<LinkAttach<'a>> {
        self.credentials()
            .map(|credentials| LinkAttach::new(credentials, self.attach_ticks))
    }
}
