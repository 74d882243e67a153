// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for one collection, using
//! [`DocumentStorage`](super::DocumentStorage) for all file operations.

use chrono::{DateTime, Utc};

pub mod pets;
pub mod users;

pub use pets::{AdopterSnapshot, OwnerSnapshot, PetRepository, StoredPet};
pub use users::{StoredUser, UserProfile, UserRepository};

/// Documents that can be ordered by creation time.
pub(crate) trait Timestamped {
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Newest first. Documents created in the same instant are ordered by id so
/// listings do not depend on directory order.
pub(crate) fn sort_newest_first<T: Timestamped>(docs: &mut [T]) {
    docs.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// Document IDs are UUIDs; anything else never names a file.
pub fn is_document_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Doc(&'static str, i64);

    impl Timestamped for Doc {
        fn id(&self) -> &str {
            self.0
        }

        fn created_at(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(self.1, 0).unwrap()
        }
    }

    #[test]
    fn newest_first_breaks_ties_by_id() {
        let mut docs = vec![Doc("c", 10), Doc("b", 20), Doc("a", 10), Doc("d", 20)];
        sort_newest_first(&mut docs);

        let order: Vec<_> = docs.iter().map(|d| d.0).collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
    }

    #[test]
    fn document_ids_must_be_uuids() {
        assert!(is_document_id("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(!is_document_id(""));
        assert!(!is_document_id("123"));
        assert!(!is_document_id("../users/x"));
    }
}
