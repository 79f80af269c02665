//! Per-operation progress and error tracking.

use std::fmt;

/// The store operations whose progress is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Load,
        Operation::Add,
        Operation::Update,
        Operation::Delete,
    ];

    fn index(self) -> usize {
        match self {
            Operation::Load => 0,
            Operation::Add => 1,
            Operation::Update => 2,
            Operation::Delete => 3,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Operation::Load => "load",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        write!(f, "{label}")
    }
}

/// Snapshot of one operation's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Slot {
    in_flight: usize,
    /// (sequence number, message) of the last failure
    error: Option<(u64, String)>,
}

#[derive(Debug, Default)]
pub(crate) struct StatusBoard {
    slots: [Slot; 4],
    seq: u64,
    degraded: bool,
}

impl StatusBoard {
    /// Mark `op` as started and clear its previous error.
    pub fn begin(&mut self, op: Operation) {
        let slot = &mut self.slots[op.index()];
        slot.in_flight += 1;
        slot.error = None;
    }

    pub fn end(&mut self, op: Operation) {
        let slot = &mut self.slots[op.index()];
        slot.in_flight = slot.in_flight.saturating_sub(1);
    }

    pub fn fail(&mut self, op: Operation, message: String) {
        self.seq += 1;
        self.slots[op.index()].error = Some((self.seq, message));
    }

    pub fn set_degraded(&mut self, degraded: bool) {
        self.degraded = degraded;
    }

    pub fn degraded(&self) -> bool {
        self.degraded
    }

    pub fn status(&self, op: Operation) -> OpStatus {
        let slot = &self.slots[op.index()];
        OpStatus {
            loading: slot.in_flight > 0,
            error: slot.error.as_ref().map(|(_, message)| message.clone()),
        }
    }

    pub fn loading(&self) -> bool {
        self.slots.iter().any(|slot| slot.in_flight > 0)
    }

    /// Most recent error across all operations.
    pub fn error(&self) -> Option<String> {
        self.slots
            .iter()
            .filter_map(|slot| slot.error.as_ref())
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, message)| message.clone())
    }
}
