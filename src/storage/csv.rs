//! Daily CSV data log.
//!
//! Each calendar day gets its own file, `<directory>/YYYYMMDD.csv`. A freshly
//! created file starts with a header line naming the columns, and every record
//! after it carries a timestamp, a running entry ID and the field values:
//!
//! ```text
//! Timestamp, Entry ID, Temperature, Pressure
//! 2015-04-06 12:00:00, 1, 21.5000, 1013.2500
//! 2015-04-06 12:01:00, 2, 21.4375, 1013.0000
//! ```

use core::fmt::Write as _;

use heapless::String;

use super::error::Error;
use super::{LocalStorage, OpenMode};

/// Directory the log is kept in when none is given.
pub const DEFAULT_DIRECTORY: &str = "Datalogger";

/// Longest `<directory>/YYYYMMDD.csv` path the log can build.
pub const MAX_PATH_LEN: usize = 100;

const SEPARATOR: &str = ", ";
const LINE_END: &str = "\r\n";

/// Calendar date and wall-clock time of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Full year, e.g. 2015.
    pub year: u16,
    /// Month, 1 to 12.
    pub month: u8,
    /// Day of month, 1 to 31.
    pub day: u8,
    /// Hour, 0 to 23.
    pub hour: u8,
    /// Minute, 0 to 59.
    pub minute: u8,
    /// Second, 0 to 59.
    pub second: u8,
}

impl Timestamp {
    /// Create a timestamp from its parts.
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Whether `other` falls on the same calendar day.
    pub fn same_day(&self, other: &Timestamp) -> bool {
        self.year == other.year && self.month == other.month && self.day == other.day
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Timestamp {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=u16}-{=u8}-{=u8} {=u8}:{=u8}:{=u8}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Appends readings to one CSV file per day.
///
/// The log owns its storage so the application can keep a single value for
/// the lifetime of the node. Field names are borrowed and give both the header
/// columns and the number of values each record is expected to carry.
pub struct DailyCsvLog<'n, S: LocalStorage> {
    storage: S,
    directory: &'n str,
    field_names: &'n [&'n str],
    entry_id: u32,
}

impl<'n, S: LocalStorage> DailyCsvLog<'n, S> {
    /// Create a log in [`DEFAULT_DIRECTORY`].
    pub fn new(storage: S, field_names: &'n [&'n str]) -> Self {
        Self::with_directory(storage, DEFAULT_DIRECTORY, field_names)
    }

    /// Create a log in `directory`.
    pub fn with_directory(storage: S, directory: &'n str, field_names: &'n [&'n str]) -> Self {
        Self {
            storage,
            directory,
            field_names,
            entry_id: 0,
        }
    }

    /// Make sure the log directory exists.
    pub fn setup(&mut self) -> Result<(), Error> {
        if self.storage.directory_exists(self.directory) {
            return Ok(());
        }
        info!("creating log directory");
        self.storage.mkdir(self.directory)
    }

    /// Path of the file holding records for the day of `ts`.
    pub fn path_for(&self, ts: &Timestamp) -> Result<String<MAX_PATH_LEN>, Error> {
        let mut path = String::new();
        write!(
            path,
            "{}/{:04}{:02}{:02}.csv",
            self.directory, ts.year, ts.month, ts.day
        )
        .map_err(|_| Error::TooLong)?;
        Ok(path)
    }

    /// Append one record, returning its entry ID.
    ///
    /// The day's file is created with a header line if it does not exist yet,
    /// which also restarts entry IDs at 1. Values beyond the number of field
    /// names are ignored; missing values are left empty.
    pub fn append(&mut self, ts: &Timestamp, values: &[f32]) -> Result<u32, Error> {
        let path = self.path_for(ts)?;

        if !self.storage.file_exists(&path) {
            debug!("creating new daily file");
            self.create_file(&path)?;
        }

        let handle = self.storage.open(&path, OpenMode::Append)?;
        let id = self.entry_id.wrapping_add(1);
        let result = self.write_record(handle, ts, id, values);
        let closed = self.storage.close(handle);
        result?;
        closed?;

        self.entry_id = id;
        trace!("logged entry {}", id);
        Ok(id)
    }

    /// Entry ID of the most recent record, 0 if none since the file was created.
    pub fn entry_id(&self) -> u32 {
        self.entry_id
    }

    /// Field names the log was created with.
    pub fn field_names(&self) -> &[&'n str] {
        self.field_names
    }

    /// Borrow the underlying storage.
    pub fn storage(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give back the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn create_file(&mut self, path: &str) -> Result<(), Error> {
        let handle = self.storage.open(path, OpenMode::Create).inspect_err(|_| {
            warn!("failed to create daily file");
        })?;
        let result = self.write_header(handle);
        let closed = self.storage.close(handle);
        result?;
        closed?;
        self.entry_id = 0;
        Ok(())
    }

    fn write_header(&mut self, handle: S::Handle) -> Result<(), Error> {
        self.storage.write(handle, "Timestamp")?;
        self.storage.write(handle, SEPARATOR)?;
        self.storage.write(handle, "Entry ID")?;
        for name in self.field_names {
            self.storage.write(handle, SEPARATOR)?;
            self.storage.write(handle, name)?;
        }
        self.storage.write(handle, LINE_END)
    }

    fn write_record(
        &mut self,
        handle: S::Handle,
        ts: &Timestamp,
        id: u32,
        values: &[f32],
    ) -> Result<(), Error> {
        let mut cell: String<64> = String::new();

        write!(cell, "{}", ts).map_err(|_| Error::TooLong)?;
        self.storage.write(handle, &cell)?;

        cell.clear();
        write!(cell, "{}{}", SEPARATOR, id).map_err(|_| Error::TooLong)?;
        self.storage.write(handle, &cell)?;

        for i in 0..self.field_names.len() {
            cell.clear();
            cell.push_str(SEPARATOR).map_err(|_| Error::TooLong)?;
            if let Some(value) = values.get(i) {
                write!(cell, "{:.4}", value).map_err(|_| Error::TooLong)?;
            }
            self.storage.write(handle, &cell)?;
        }

        self.storage.write(handle, LINE_END)
    }
}

impl<S: LocalStorage + core::fmt::Debug> core::fmt::Debug for DailyCsvLog<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DailyCsvLog")
            .field("storage", &self.storage)
            .field("directory", &self.directory)
            .field("field_names", &self.field_names)
            .field("entry_id", &self.entry_id)
            .finish()
    }
}
