//! # Telemetry updates
//!
//! Turns a set of averaged readings into an update request of the form
//!
//! ```text
//! GET /update?api_key=KEY&field1=21.5000&field2=1013.2500 HTTP/1.1
//! Host: api.thingspeak.com
//! Connection: close
//!
//! ```
//!
//! The [`RequestBuilder`] only borrows strings, so [`UpdateComposer`] owns the
//! formatted values and field names and lends them to the builder.
//!
//! ```rust
//! use telenode::config::NodeConfig;
//! use telenode::network::application::http::RequestBuilder;
//! use telenode::telemetry::UpdateComposer;
//!
//! let config = NodeConfig::from_json(r#"{"host":"api.thingspeak.com","api_key":"KEY"}"#).unwrap();
//!
//! let mut composer: UpdateComposer<4> = UpdateComposer::new();
//! composer.set_readings(&[21.5, 1013.25]).unwrap();
//!
//! let mut builder = RequestBuilder::new();
//! composer.compose(&config, &mut builder).unwrap();
//!
//! let mut buf = [0u8; 256];
//! let len = builder.write_to_buffer(&mut buf, false);
//! assert!(buf[..len].starts_with(b"GET /update?api_key=KEY&field1=21.5000&field2=1013.2500 HTTP/1.1\r\n"));
//! ```

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::config::NodeConfig;
use crate::network::application::http::RequestBuilder;

/// Longest formatted reading.
pub const MAX_VALUE_LEN: usize = 24;

const MAX_NAME_LEN: usize = 8;

/// Errors raised while composing an update.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// More readings than the composer has fields for.
    TooManyReadings,
    /// A reading is NaN or infinite.
    InvalidReading,
    /// A formatted reading did not fit [`MAX_VALUE_LEN`].
    ValueTooLong,
    /// The request builder ran out of URL parameter or header slots.
    BuilderFull,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::TooManyReadings => defmt::write!(f, "TooManyReadings"),
            Error::InvalidReading => defmt::write!(f, "InvalidReading"),
            Error::ValueTooLong => defmt::write!(f, "ValueTooLong"),
            Error::BuilderFull => defmt::write!(f, "BuilderFull"),
        }
    }
}

/// Formats up to `N` readings as `field1..fieldN` update parameters.
#[derive(Debug, Clone)]
pub struct UpdateComposer<const N: usize> {
    names: Vec<String<MAX_NAME_LEN>, N>,
    values: Vec<String<MAX_VALUE_LEN>, N>,
}

impl<const N: usize> Default for UpdateComposer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> UpdateComposer<N> {
    /// Create a composer with no readings.
    pub fn new() -> Self {
        let mut names = Vec::new();
        for i in 1..=N {
            let mut name = String::new();
            // "field" plus at most three digits always fits.
            let _ = write!(name, "field{}", i);
            let _ = names.push(name);
        }
        Self {
            names,
            values: Vec::new(),
        }
    }

    /// Replace the readings, formatting each with four decimal places.
    ///
    /// On error the previous readings are discarded.
    pub fn set_readings(&mut self, readings: &[f32]) -> Result<(), Error> {
        self.values.clear();
        if readings.len() > N {
            return Err(Error::TooManyReadings);
        }
        for reading in readings {
            if !reading.is_finite() {
                self.values.clear();
                return Err(Error::InvalidReading);
            }
            let mut value = String::new();
            if write!(value, "{:.4}", reading).is_err() {
                self.values.clear();
                return Err(Error::ValueTooLong);
            }
            self.values.push(value).map_err(|_| Error::TooManyReadings)?;
        }
        Ok(())
    }

    /// Number of readings currently held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no readings are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The formatted value of reading `index`.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|v| v.as_str())
    }

    /// Fill `builder` with an update request for the held readings.
    ///
    /// The builder is reset first. The request goes to `config.path` with the
    /// write key, when one is configured, as the first parameter.
    pub fn compose<'a>(
        &'a self,
        config: &NodeConfig<'a>,
        builder: &mut RequestBuilder<'a>,
    ) -> Result<(), Error> {
        builder.reset();
        builder.set_method_and_url("GET", config.path);

        if let Some(key) = config.api_key {
            if !builder.set_url_param("api_key", key) {
                return Err(Error::BuilderFull);
            }
        }
        for (name, value) in self.names.iter().zip(self.values.iter()) {
            if !builder.set_url_param(name, value) {
                return Err(Error::BuilderFull);
            }
        }

        if !builder.put_header("Host", config.host) || !builder.put_header("Connection", "close") {
            return Err(Error::BuilderFull);
        }
        builder.set_end_headers(true);
        debug!("composed update with {} fields", self.values.len());
        Ok(())
    }
}
