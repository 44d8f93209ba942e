use std::collections::{HashMap, HashSet};

use crate::timetable::{split_label, GRID};

/// Which atomic slots collide with which: two slots conflict exactly when
/// they share at least one grid cell. Built once from the static grid and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ConflictMap {
    conflicts: HashMap<String, HashSet<String>>,
}

impl ConflictMap {
    /// Builds the map from the weekly grid: every cell label is split into
    /// its atomic slots, and each slot unions the co-occurring slots minus
    /// itself. Every slot appearing anywhere in the grid gets an entry; a
    /// slot that never shares a cell maps to an empty set.
    pub fn from_grid() -> Self {
        let mut conflicts: HashMap<String, HashSet<String>> = HashMap::new();
        for (_day, cells) in GRID {
            for cell in cells {
                let parts: Vec<&str> = split_label(cell).collect();
                for part in &parts {
                    let entry = conflicts.entry((*part).to_string()).or_default();
                    for other in &parts {
                        if other != part {
                            entry.insert((*other).to_string());
                        }
                    }
                }
            }
        }
        ConflictMap { conflicts }
    }

    /// The slots colliding with `slot`. `None` for slots the grid never
    /// mentions.
    pub fn conflicts_with(&self, slot: &str) -> Option<&HashSet<String>> {
        self.conflicts.get(slot)
    }

    /// All atomic slots known to the grid.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.conflicts.keys().map(String::as_str)
    }

    /// Checks `candidates` in order against the already-claimed slots and
    /// returns the first candidate that clashes: either the candidate itself
    /// is already claimed, or one of its conflicting slots is. `None` means
    /// the whole candidate set is safe to commit.
    ///
    /// Callers must pass the claimed map as it stands before the operation,
    /// so that committing a multi-slot label stays all-or-nothing.
    pub fn find_clash<'a, I>(&self, candidates: I, claimed: &HashMap<String, String>) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for slot in candidates {
            if claimed.contains_key(slot) {
                return Some(slot.to_string());
            }
            if let Some(overlapping) = self.conflicts.get(slot) {
                if overlapping.iter().any(|other| claimed.contains_key(other)) {
                    return Some(slot.to_string());
                }
            }
        }
        None
    }
}
