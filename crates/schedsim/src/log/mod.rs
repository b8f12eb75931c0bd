//! Logging of simulation events.

pub mod init;
pub mod log_entry;
pub mod logger;
mod util;

#[cfg(test)]
mod play;
