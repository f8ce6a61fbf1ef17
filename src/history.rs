use crate::runtime::Runtime;

/// A stack of runtime snapshots for undo.
///
/// Runtimes are never mutated in place, so undo is just remembering the
/// snapshot a transition started from and popping it back off.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Runtime>,
}

impl History {
    pub fn new() -> History {
        History {
            snapshots: Vec::new(),
        }
    }

    /// Remembers `rt` as the most recent state to undo to.
    pub fn push(&mut self, rt: Runtime) {
        self.snapshots.push(rt);
    }

    /// The most recently pushed snapshot, or `None` when there is nothing
    /// left to undo.
    pub fn pop(&mut self) -> Option<Runtime> {
        self.snapshots.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
