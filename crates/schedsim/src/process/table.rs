//! Storage of process control blocks.

use std::collections::BTreeMap;

use crate::result::{SimError, SimResult};

use super::pcb::{Pcb, Pid};

/// Owns every process control block of a run, indexed by pid.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: BTreeMap<Pid, Pcb>,
}

impl ProcessTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a process. Pids must be unique.
    pub fn insert(&mut self, pcb: Pcb) -> SimResult<()> {
        if self.processes.contains_key(&pcb.pid()) {
            return Err(SimError::DuplicatePid(pcb.pid()));
        }
        self.processes.insert(pcb.pid(), pcb);
        Ok(())
    }

    /// Returns a process by its pid.
    pub fn get(&self, pid: Pid) -> Option<&Pcb> {
        self.processes.get(&pid)
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut Pcb> {
        self.processes.get_mut(&pid)
    }

    pub(crate) fn expect(&self, pid: Pid) -> SimResult<&Pcb> {
        self.get(pid).ok_or(SimError::UnknownProcess(pid))
    }

    pub(crate) fn expect_mut(&mut self, pid: Pid) -> SimResult<&mut Pcb> {
        self.get_mut(pid).ok_or(SimError::UnknownProcess(pid))
    }

    /// Returns the number of registered processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Returns true if no process is registered.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Iterates over processes in pid order.
    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.processes.values()
    }

    /// Removes all processes.
    pub fn clear(&mut self) {
        self.processes.clear();
    }
}
