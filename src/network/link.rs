//! Bearer attach for links that need one before any connection can open.
//!
//! A cellular modem has to attach to the packet network with an access point
//! name and optional credentials before [`Transport::connect`] can succeed.
//! [`Link`] is the modem-side capability; [`LinkAttach`] drives it from the
//! scheduler one attempt per [`poll`](LinkAttach::poll), retrying until the
//! bearer is up or a tick deadline passes. Nothing here blocks.
//!
//! ```rust
//! use telenode::network::link::{AttachStatus, Credentials, Link, LinkAttach};
//!
//! /// Attaches on the third attempt.
//! struct Modem { attempts: u8 }
//!
//! impl Link for Modem {
//!     type Error = ();
//!     fn try_attach(&mut self, _credentials: &Credentials<'_>) -> Result<(), ()> {
//!         self.attempts += 1;
//!         if self.attempts >= 3 { Ok(()) } else { Err(()) }
//!     }
//!     fn is_attached(&self) -> bool { self.attempts >= 3 }
//! }
//!
//! let mut modem = Modem { attempts: 0 };
//! let mut attach = LinkAttach::new(Credentials::new("internet", "", ""), Some(10));
//!
//! assert_eq!(attach.poll(&mut modem), AttachStatus::Pending);
//! assert_eq!(attach.poll(&mut modem), AttachStatus::Pending);
//! assert_eq!(attach.poll(&mut modem), AttachStatus::Attached);
//! ```
//!
//! [`Transport::connect`]: crate::network::transport::Transport::connect

use super::error::Error;

/// Access point name and login for a cellular bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    /// Access point name.
    pub apn: &'a str,
    /// User name; empty when the network needs none.
    pub username: &'a str,
    /// Password; empty when the network needs none.
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    /// Bundles an access point name with its login.
    pub const fn new(apn: &'a str, username: &'a str, password: &'a str) -> Self {
        Self {
            apn,
            username,
            password,
        }
    }
}

/// A data link that must be attached before connections can be opened.
pub trait Link {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Make one attach attempt and return promptly.
    ///
    /// `Ok(())` means the bearer is up. An error means this attempt did not
    /// attach; the caller may try again later.
    fn try_attach(&mut self, credentials: &Credentials<'_>) -> Result<(), Self::Error>;

    /// Whether the bearer is currently up.
    fn is_attached(&self) -> bool;
}

/// Progress of a [`LinkAttach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachStatus {
    /// Not attached yet; keep polling.
    Pending,
    /// The bearer is up.
    Attached,
    /// The deadline passed without an attach.
    Failed(Error),
}

#[cfg(feature = "defmt")]
impl defmt::Format for AttachStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            AttachStatus::Pending => defmt::write!(f, "Pending"),
            AttachStatus::Attached => defmt::write!(f, "Attached"),
            AttachStatus::Failed(e) => defmt::write!(f, "Failed({})", e),
        }
    }
}

/// Retries [`Link::try_attach`] once per poll until it succeeds or the deadline
/// passes.
///
/// A failure is sticky until [`reset`](Self::reset). If an attached link later
/// drops, the next poll starts attaching again with a fresh deadline.
#[derive(Debug, Clone)]
pub struct LinkAttach<'a> {
    credentials: Credentials<'a>,
    deadline_ticks: Option<u32>,
    ticks: u32,
    status: AttachStatus,
}

impl<'a> LinkAttach<'a> {
    /// Creates a pending attach. `deadline_ticks` of `None` retries forever.
    pub fn new(credentials: Credentials<'a>, deadline_ticks: Option<u32>) -> Self {
        Self {
            credentials,
            deadline_ticks,
            ticks: 0,
            status: AttachStatus::Pending,
        }
    }

    /// Advance by at most one attach attempt.
    pub fn poll<L: Link>(&mut self, link: &mut L) -> AttachStatus {
        match self.status {
            AttachStatus::Failed(_) => return self.status,
            AttachStatus::Attached if link.is_attached() => return self.status,
            AttachStatus::Attached => {
                warn!("link dropped, attaching again");
                self.ticks = 0;
                self.status = AttachStatus::Pending;
            }
            AttachStatus::Pending => {}
        }

        if let Some(limit) = self.deadline_ticks {
            if self.ticks >= limit {
                warn!("attach to {} timed out after {} attempts", self.credentials.apn, self.ticks);
                self.status = AttachStatus::Failed(Error::Timeout);
                return self.status;
            }
        }
        self.ticks = self.ticks.saturating_add(1);

        match link.try_attach(&self.credentials) {
            Ok(()) => {
                info!("attached to {}", self.credentials.apn);
                self.status = AttachStatus::Attached;
            }
            Err(_) => trace!("attach attempt {} failed", self.ticks),
        }
        self.status
    }

    /// Start over with a fresh deadline.
    pub fn reset(&mut self) {
        self.ticks = 0;
        self.status = AttachStatus::Pending;
    }

    /// The status after the last poll.
    pub fn status(&self) -> AttachStatus {
        self.status
    }

    /// Attempts made since the last reset or re-attach.
    pub fn attempts(&self) -> u32 {
        self.ticks
    }

    /// The credentials handed to the link.
    pub fn credentials(&self) -> &Credentials<'a> {
        &self.credentials
    }
}
