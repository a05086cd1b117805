//! Cluster identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a topic cluster produced by one clustering run.
///
/// Labels are only meaningful within the run that produced them. Two runs
/// over the same input may assign the same partition different labels, so
/// callers must never persist a label and expect it to match a later run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(String);

impl ClusterId {
    /// Create a cluster id from an arbitrary label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Sequential label for the `index`-th cluster discovered in a run.
    ///
    /// The index is zero-padded so labels sort in discovery order.
    ///
    /// # Examples
    ///
    /// ```
    /// use veracity_domain::ClusterId;
    ///
    /// assert_eq!(ClusterId::from_index(3).as_str(), "cluster_0003");
    /// ```
    pub fn from_index(index: usize) -> Self {
        Self(format!("cluster_{:04}", index))
    }

    /// Borrow the label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClusterId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_labels() {
        assert_eq!(ClusterId::from_index(0).to_string(), "cluster_0000");
        assert!(ClusterId::from_index(1) < ClusterId::from_index(2));
    }

    #[test]
    fn test_labels_sort_in_discovery_order() {
        let mut labels: Vec<ClusterId> = (0..25).rev().map(ClusterId::from_index).collect();
        labels.sort();
        let expected: Vec<ClusterId> = (0..25).map(ClusterId::from_index).collect();
        assert_eq!(labels, expected);
        assert!(ClusterId::from_index(2) < ClusterId::from_index(10));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ClusterId::from_index(7)).unwrap();
        assert_eq!(json, "\"cluster_0007\"");
    }
}
