use crate::multipath::candidate::{MultiPathChild, MultiPathParent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parent and the ghosts confirmed for it in the parent's own scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentGroup {
    pub parent: MultiPathParent,
    pub children: Vec<MultiPathChild>,
}

/// Every parent group recorded for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub timestamp: f64,
    pub groups: Vec<ParentGroup>,
}

/// Parent/child associations accumulated across a recording, ordered by the
/// timestamp at which each entry was first recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPathAggregate {
    entries: Vec<ScenarioEntry>,
}

impl MultiPathAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one candidate with the children it shadows. Every call makes
    /// its own group, even when an identical parent is already listed at
    /// that timestamp. A candidate without children is not recorded.
    pub fn add_group(&mut self, parent: MultiPathParent, children: Vec<MultiPathChild>) {
        if children.is_empty() {
            return;
        }
        let idx = match self
            .entries
            .iter()
            .position(|entry| entry.timestamp == parent.timestamp)
        {
            Some(idx) => idx,
            None => {
                self.entries.push(ScenarioEntry {
                    timestamp: parent.timestamp,
                    groups: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        self.entries[idx].groups.push(ParentGroup { parent, children });
    }

    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn number_of_timestamps(&self) -> usize {
        self.entries.len()
    }

    pub fn number_of_parents(&self) -> usize {
        self.entries.iter().map(|entry| entry.groups.len()).sum()
    }

    pub fn number_of_children(&self) -> usize {
        self.groups().map(|group| group.children.len()).sum()
    }

    /// The phenomenon counts as real only when it persists over more than
    /// `min_persistence_scans` distinct scans.
    pub fn is_valid(&self, min_persistence_scans: usize) -> bool {
        self.number_of_timestamps() > min_persistence_scans
    }

    pub fn groups(&self) -> impl Iterator<Item = &ParentGroup> {
        self.entries.iter().flat_map(|entry| entry.groups.iter())
    }
}

impl fmt::Display for MultiPathAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "Timestamp: {:.2}", entry.timestamp)?;
            for group in &entry.groups {
                writeln!(f, "{}", group.parent)?;
                for child in &group.children {
                    writeln!(f, "{}", child)?;
                }
            }
        }
        Ok(())
    }
}
