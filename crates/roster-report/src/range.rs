use roster_core::{DateRange, RosterEntry};

/// Entries whose date falls inside `range`, in their original order.
pub fn filter_entries<'a>(entries: &'a [RosterEntry], range: &DateRange) -> Vec<&'a RosterEntry> {
    entries.iter().filter(|e| range.contains(e.date)).collect()
}
