//! Change classification between the persisted baseline and the current
//! widget snapshot. Pure, no I/O.

use crate::snapshot::WidgetSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// No baseline yet, or nothing changed.
    None,
    /// Widget went from empty to listing opportunities.
    Appeared,
    /// Widget went from listing opportunities to empty.
    Removed,
    /// Listings present before and after, but different.
    Updated,
}

/// Outcome of one comparison. Never persisted.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub previous: Option<WidgetSnapshot>,
    pub current: WidgetSnapshot,
}

/// Classify the transition from `previous` to `current`.
///
/// A missing baseline classifies as `None`: the first run only establishes
/// the baseline. Empty-to-empty is also `None`, so repeated "No Data" runs
/// never flap.
pub fn detect(previous: Option<&WidgetSnapshot>, current: &WidgetSnapshot) -> ChangeEvent {
    let kind = match previous {
        None => ChangeKind::None,
        Some(prev) => match (prev.is_empty(), current.is_empty()) {
            (true, false) => ChangeKind::Appeared,
            (false, true) => ChangeKind::Removed,
            (false, false) if prev.text() != current.text() => ChangeKind::Updated,
            _ => ChangeKind::None,
        },
    };

    ChangeEvent {
        kind,
        previous: previous.cloned(),
        current: current.clone(),
    }
}
