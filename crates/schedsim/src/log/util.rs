//! Helpers for printing log entries.

/// Prints a formatted entry at trace level.
macro_rules! t {
    ($arg:expr) => {
        ::log::trace!("{}", $arg)
    };
}

pub(crate) use t;
