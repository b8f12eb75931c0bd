//! Simulated processes and their control blocks.

pub mod io;
pub mod job;
pub mod pcb;
pub mod state;
pub mod table;

#[cfg(test)]
mod tests;
