/// Identity source for store entities.
///
/// Ids combine a kind prefix, the creation time in milliseconds and a
/// process-wide sequence number, so two ids handed out in the same process
/// never collide, even within one millisecond.
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Workspace,
    Board,
    List,
    Card,
    ChecklistItem,
    Comment,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Workspace => "ws",
            IdKind::Board => "board",
            IdKind::List => "list",
            IdKind::Card => "card",
            IdKind::ChecklistItem => "item",
            IdKind::Comment => "comment",
        }
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh id, e.g. `card-18f3a2b9c10-002a`.
pub fn next_id(kind: IdKind) -> String {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{}-{:x}-{:04x}", kind.prefix(), millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..5_000).map(|_| next_id(IdKind::Card)).collect();
        assert_eq!(ids.len(), 5_000);
    }

    #[test]
    fn test_id_prefix() {
        assert!(next_id(IdKind::List).starts_with("list-"));
        assert!(next_id(IdKind::ChecklistItem).starts_with("item-"));
        assert_eq!(next_id(IdKind::Workspace).split('-').count(), 3);
    }
}
