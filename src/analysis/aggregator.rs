//! Trial aggregation.
//!
//! Folds repeated trials of the same (image, option, intensity)
//! configuration into a single accumulator.

use crate::models::{GroupAccumulator, GroupKey, Record};
use std::collections::BTreeMap;

/// Final accumulator state for every group, in key order.
pub type GroupMap = BTreeMap<GroupKey, GroupAccumulator>;

/// Group records by key and sum their metrics.
pub fn aggregate(records: &[Record]) -> GroupMap {
    let mut groups = GroupMap::new();

    for record in records {
        groups
            .entry(record.key())
            .or_insert_with(GroupAccumulator::new)
            .add(record);
    }

    groups
}

/// Number of trials folded into all groups.
pub fn total_trials(groups: &GroupMap) -> u64 {
    groups.values().map(|g| g.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(image: &str, option: &str, intensity: &str, freed_ws: i64) -> Record {
        Record {
            image: image.to_string(),
            option: option.to_string(),
            intensity: intensity.to_string(),
            freed_root: 0,
            freed_ws,
            duration_seconds: 1,
            after_root: None,
            after_ws: None,
        }
    }

    fn key(image: &str, option: &str, intensity: &str) -> GroupKey {
        GroupKey {
            image: image.to_string(),
            option: option.to_string(),
            intensity: intensity.to_string(),
        }
    }

    #[test]
    fn test_aggregate_groups_by_triple() {
        let records = vec![
            record("imgA", "zap", "low", 1),
            record("imgA", "zap", "high", 2),
            record("imgA", "zap", "low", 3),
            record("imgB", "zap", "low", 4),
        ];

        let groups = aggregate(&records);

        assert_eq!(groups.len(), 3);
        assert_eq!(total_trials(&groups), 4);

        let low = &groups[&key("imgA", "zap", "low")];
        assert_eq!(low.count, 2);
        assert_eq!(low.sum_freed_ws, 4);
        assert_eq!(low.sum_duration, 2);
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let records = vec![
            record("imgA", "zap", "low", 1),
            record("imgA", "Zap", "low", 1),
            record("imgA", "zap", "low ", 1),
        ];

        assert_eq!(aggregate(&records).len(), 3);
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut records = vec![
            record("imgB", "zap", "low", 10),
            record("imgA", "zap", "low", 20),
            record("imgB", "zap", "low", 30),
        ];
        let forward = aggregate(&records);
        records.reverse();
        let backward = aggregate(&records);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_keys_iterate_sorted() {
        let records = vec![
            record("imgB", "a", "a", 1),
            record("imgA", "b", "a", 1),
            record("imgA", "a", "b", 1),
            record("imgA", "a", "a", 1),
        ];

        let keys: Vec<_> = aggregate(&records).into_keys().collect();
        assert_eq!(
            keys,
            vec![
                key("imgA", "a", "a"),
                key("imgA", "a", "b"),
                key("imgA", "b", "a"),
                key("imgB", "a", "a"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let groups = aggregate(&[]);
        assert!(groups.is_empty());
        assert_eq!(total_trials(&groups), 0);
    }
}
