/// Linear undo log over content snapshots for a single chapter.
///
/// The log knows nothing about chapters; the session resets it
/// whenever the selected chapter identity changes. Invariant:
/// `index < snapshots.len()` at all times.
#[derive(Debug)]
pub struct EditHistory {
    snapshots: Vec<String>,
    index: usize,
}

impl EditHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        EditHistory {
            snapshots: vec![initial.into()],
            index: 0,
        }
    }

    /// Drop everything and start over from a single snapshot.
    pub fn reset(&mut self, initial: impl Into<String>) {
        self.snapshots = vec![initial.into()];
        self.index = 0;
    }

    /// Record a new snapshot. Recording the current snapshot again is a
    /// no-op; recording after an undo discards the redone-over future.
    pub fn record(&mut self, content: &str) {
        if self.snapshots[self.index] == content {
            return;
        }
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(content.to_string());
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, returning the content to restore.
    /// Returns `None` when already at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_on_fresh_history_is_noop() {
        let mut history = EditHistory::new("start");
        assert_eq!(history.undo(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn record_then_undo_restores_previous() {
        let mut history = EditHistory::new("one");
        history.record("two");
        history.record("three");
        assert_eq!(history.undo(), Some("two"));
        assert_eq!(history.undo(), Some("one"));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn recording_identical_content_leaves_length_unchanged() {
        let mut history = EditHistory::new("same");
        history.record("same");
        history.record("same");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn record_after_undo_discards_future() {
        let mut history = EditHistory::new("a");
        history.record("b");
        history.record("c");
        history.undo();
        history.record("d");
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some("b"));
        assert_eq!(history.undo(), Some("a"));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn reset_replaces_everything() {
        let mut history = EditHistory::new("a");
        history.record("b");
        history.reset("fresh");
        assert_eq!(history.len(), 1);
        assert_eq!(history.undo(), None);
    }
}
