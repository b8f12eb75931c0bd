//! Queues holding processes which do not occupy the CPU.

use std::collections::VecDeque;

use crate::process::pcb::Pid;


/// FIFO queue of process identifiers.
///
/// A pid is never stored twice in the same queue.
#[derive(Debug, Clone)]
pub struct ProcessQueue {
    name: &'static str,
    items: VecDeque<Pid>,
}

impl ProcessQueue {
    /// Creates an empty queue with the given name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            items: VecDeque::new(),
        }
    }

    /// Creates the queue which feeds the CPU.
    pub fn ready() -> Self {
        Self::new("ready")
    }

    /// Creates the queue of processes waiting for I/O.
    pub fn blocked() -> Self {
        Self::new("blocked")
    }

    /// Returns the queue name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Appends a process to the tail.
    ///
    /// # Panics
    /// If the process is already in the queue.
    pub fn enqueue(&mut self, pid: Pid) {
        assert!(
            !self.items.contains(&pid),
            "process {} is already in the {} queue",
            pid,
            self.name
        );
        self.items.push_back(pid);
    }

    /// Removes and returns the head.
    pub fn dequeue(&mut self) -> Option<Pid> {
        self.items.pop_front()
    }

    /// Returns the head without removing it.
    pub fn peek(&self) -> Option<Pid> {
        self.items.front().copied()
    }

    /// Removes the given process preserving the order of the rest.
    /// Returns false if the process is not in the queue.
    pub fn remove(&mut self, pid: Pid) -> bool {
        match self.items.iter().position(|&queued| queued == pid) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns true if the pid is queued.
    pub fn contains(&self, pid: Pid) -> bool {
        self.items.contains(&pid)
    }

    /// Returns the number of queued processes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.items.iter().copied()
    }

    /// Bulk enqueue, in iteration order.
    pub fn extend(&mut self, pids: impl IntoIterator<Item = Pid>) {
        for pid in pids {
            self.enqueue(pid);
        }
    }

    /// Removes all pids.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
