//! Error type returned by reader and control operations.

/// Errors surfaced to callers of [`TactSwitch`](crate::TactSwitch) and
/// [`Reader`](crate::Reader).
///
/// Buffer overflow and notifications without a registered consumer are not
/// errors; both are dropped silently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A read was requested with an empty destination buffer.
    InvalidArgument,
    /// A blocked read was cancelled before any symbol arrived.
    Interrupted,
    /// A reader handle is already open.
    Busy,
    /// The device was closed while the caller was waiting.
    Closed,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "Read length must be at least 1"),
            Error::Interrupted => write!(f, "Read interrupted while waiting for events"),
            Error::Busy => write!(f, "Device already has an open reader"),
            Error::Closed => write!(f, "Device closed"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;
    use std::string::ToString;

    #[test]
    fn interrupted_is_distinct_from_invalid_argument() {
        assert_ne!(Error::Interrupted, Error::InvalidArgument);
        assert_ne!(Error::Interrupted.to_string(), Error::InvalidArgument.to_string());
    }
}
