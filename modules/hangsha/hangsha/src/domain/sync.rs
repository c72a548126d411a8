//! Replace-all synchronisation of owned child collections.
//!
//! A submitted collection becomes the complete new state of the parent's
//! children. [`CollectionSynchronizer::plan`] works out which current items
//! go away and which target items are new; items present on both sides are
//! retained as-is. Callers apply deletions before insertions inside the
//! parent's transaction.

use std::collections::HashSet;
use std::hash::Hash;

use hangsha_sdk::InterestCategoryAssignment;

use super::error::DomainError;

/// Outcome of diffing current children against a target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan<C, T> {
    pub to_delete: Vec<C>,
    pub to_insert: Vec<T>,
    pub retained: Vec<C>,
}

impl<C, T> SyncPlan<C, T> {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty()
    }
}

pub struct CollectionSynchronizer;

impl CollectionSynchronizer {
    /// Diff `current` against `target` by key.
    ///
    /// Duplicate keys in `target` are collapsed to their first occurrence.
    pub fn plan<C, T, K>(
        current: Vec<C>,
        current_key: impl Fn(&C) -> K,
        target: Vec<T>,
        target_key: impl Fn(&T) -> K,
    ) -> SyncPlan<C, T>
    where
        K: Eq + Hash,
    {
        let target = Self::dedup_by_key(target, &target_key);
        let target_keys: HashSet<K> = target.iter().map(&target_key).collect();

        let mut current_keys = HashSet::with_capacity(current.len());
        let mut to_delete = Vec::new();
        let mut retained = Vec::new();
        for item in current {
            let key = current_key(&item);
            if target_keys.contains(&key) {
                current_keys.insert(key);
                retained.push(item);
            } else {
                to_delete.push(item);
            }
        }

        let to_insert = target
            .into_iter()
            .filter(|item| !current_keys.contains(&target_key(item)))
            .collect();

        SyncPlan {
            to_delete,
            to_insert,
            retained,
        }
    }

    pub fn dedup_by_key<T, K: Eq + Hash>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
        let mut seen = HashSet::with_capacity(items.len());
        items.into_iter().filter(|item| seen.insert(key(item))).collect()
    }

    /// Trim tag names, reject blank or over-long ones, and drop duplicates.
    pub fn normalize_tag_names(
        field: &str,
        names: Vec<String>,
        max_len: usize,
    ) -> Result<Vec<String>, DomainError> {
        let mut normalized = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::invalid(field, "tag names must not be blank"));
            }
            if name.chars().count() > max_len {
                return Err(DomainError::invalid(
                    field,
                    format!("tag '{name}' exceeds maximum length of {max_len}"),
                ));
            }
            normalized.push(name.to_owned());
        }
        Ok(Self::dedup_by_key(normalized, Clone::clone))
    }

    /// Interest category targets need unique ids, unique priorities and
    /// priorities forming exactly `1..=N`.
    pub fn validate_interest_categories(
        field: &str,
        items: &[InterestCategoryAssignment],
    ) -> Result<(), DomainError> {
        let mut ids = HashSet::with_capacity(items.len());
        let mut priorities = HashSet::with_capacity(items.len());
        for item in items {
            if !ids.insert(item.category_id) {
                return Err(DomainError::collection(
                    field,
                    format!("duplicate categoryId {}", item.category_id),
                ));
            }
            if !priorities.insert(item.priority) {
                return Err(DomainError::collection(
                    field,
                    format!("duplicate priority {}", item.priority),
                ));
            }
        }

        let n = i32::try_from(items.len())
            .map_err(|_| DomainError::collection(field, "too many items"))?;
        if let Some(p) = priorities.iter().find(|p| !(1..=n).contains(*p)) {
            return Err(DomainError::collection(
                field,
                format!("priorities must be contiguous from 1 to {n}, got {p}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(category_id: i64, priority: i32) -> InterestCategoryAssignment {
        InterestCategoryAssignment {
            category_id,
            priority,
        }
    }

    #[test]
    fn plan_splits_delete_insert_and_retain() {
        let current = vec![(1, "a"), (2, "b"), (3, "c")];
        let target = vec!["b", "d", "d", "c"];
        let plan = CollectionSynchronizer::plan(current, |c| c.1, target, |t| *t);
        assert_eq!(plan.to_delete, vec![(1, "a")]);
        assert_eq!(plan.retained, vec![(2, "b"), (3, "c")]);
        assert_eq!(plan.to_insert, vec!["d"]);
        assert!(!plan.is_noop());
    }

    #[test]
    fn empty_target_deletes_everything() {
        let plan = CollectionSynchronizer::plan(vec![1, 2], |c| *c, Vec::<i32>::new(), |t| *t);
        assert_eq!(plan.to_delete, vec![1, 2]);
        assert!(plan.to_insert.is_empty());
    }

    #[test]
    fn identical_sets_are_noop() {
        let plan = CollectionSynchronizer::plan(vec![1, 2], |c| *c, vec![2, 1], |t| *t);
        assert!(plan.is_noop());
        assert_eq!(plan.retained.len(), 2);
    }

    #[test]
    fn tag_names_are_trimmed_and_deduplicated() {
        let names = vec![" work ".to_owned(), "work".to_owned(), "study".to_owned()];
        let out = CollectionSynchronizer::normalize_tag_names("tagNames", names, 50).unwrap();
        assert_eq!(out, vec!["work".to_owned(), "study".to_owned()]);
    }

    #[test]
    fn blank_tag_name_is_rejected() {
        let err = CollectionSynchronizer::normalize_tag_names("tagNames", vec!["  ".to_owned()], 50)
            .unwrap_err();
        assert!(matches!(err, DomainError::FieldInvalid { .. }));
    }

    #[test]
    fn duplicate_priority_is_rejected() {
        let err = CollectionSynchronizer::validate_interest_categories(
            "items",
            &[assignment(1, 1), assignment(2, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::CollectionInvariantViolated { .. }));
    }

    #[test]
    fn non_contiguous_priorities_are_rejected() {
        let err = CollectionSynchronizer::validate_interest_categories(
            "items",
            &[assignment(1, 1), assignment(2, 3)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::CollectionInvariantViolated { .. }));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let err = CollectionSynchronizer::validate_interest_categories(
            "items",
            &[assignment(4, 1), assignment(4, 2)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::CollectionInvariantViolated { .. }));
    }

    #[test]
    fn contiguous_unordered_priorities_are_accepted() {
        assert!(
            CollectionSynchronizer::validate_interest_categories(
                "items",
                &[assignment(1, 2), assignment(2, 1)],
            )
            .is_ok()
        );
        assert!(CollectionSynchronizer::validate_interest_categories("items", &[]).is_ok());
    }
}
