use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LABEL: AtomicU64 = AtomicU64::new(0);

/// Unique handle identifying a variable or parameter binding.
///
/// Labels are handed out from a process-wide counter, so two references never
/// collide, within one tree or across independently built trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u64);

impl Label {
    pub(crate) fn fresh() -> Self {
        Label(NEXT_LABEL.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
