// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pet repository.
//!
//! Each pet is stored as `pets/{pet_id}.json` with denormalized snapshots of
//! its owner and, once a visit is scheduled, its prospective adopter. The
//! snapshots are copies taken at write time; later profile edits do not
//! reach them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{DocumentStorage, OwnedResource, StorageError, StorageResult};
use super::users::StoredUser;
use super::{is_document_id, sort_newest_first, Timestamped};

/// Owner fields copied into a pet at creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OwnerSnapshot {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&StoredUser> for OwnerSnapshot {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            image: user.image.clone(),
        }
    }
}

/// Prospective adopter fields copied into a pet when a visit is scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AdopterSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&StoredUser> for AdopterSnapshot {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// Pet listing stored on disk and returned to clients as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredPet {
    /// Unique pet identifier (UUID)
    pub id: String,
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Weight in kilograms
    pub weight: f64,
    pub sex: String,
    pub color: String,
    /// False once the owner concludes the adoption
    pub available: bool,
    /// Image file names under `images/pets`, in upload order
    pub images: Vec<String>,
    pub owner: OwnerSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopter: Option<AdopterSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredPet {
    /// Whether `user_id` is the recorded prospective adopter.
    pub fn is_adopter(&self, user_id: &str) -> bool {
        self.adopter.as_ref().is_some_and(|adopter| adopter.id == user_id)
    }
}

impl OwnedResource for StoredPet {
    fn owner_user_id(&self) -> &str {
        &self.owner.id
    }

    fn resource_name(&self) -> String {
        format!("pet {}", self.id)
    }
}

impl Timestamped for StoredPet {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Repository for pet documents.
pub struct PetRepository<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> PetRepository<'a> {
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    pub fn exists(&self, pet_id: &str) -> bool {
        is_document_id(pet_id) && self.storage.exists(self.storage.paths().pet(pet_id))
    }

    pub fn get(&self, pet_id: &str) -> StorageResult<StoredPet> {
        if !self.exists(pet_id) {
            return Err(StorageError::NotFound(format!("Pet {pet_id}")));
        }
        self.storage.read_json(self.storage.paths().pet(pet_id))
    }

    pub fn create(&self, pet: &StoredPet) -> StorageResult<()> {
        if !is_document_id(&pet.id) {
            return Err(StorageError::NotFound(format!("Pet {}", pet.id)));
        }
        if self.exists(&pet.id) {
            return Err(StorageError::AlreadyExists(format!("Pet {}", pet.id)));
        }
        self.storage.write_json(self.storage.paths().pet(&pet.id), pet)
    }

    /// Replace an existing pet document.
    pub fn update(&self, pet: &StoredPet) -> StorageResult<()> {
        if !self.exists(&pet.id) {
            return Err(StorageError::NotFound(format!("Pet {}", pet.id)));
        }
        self.storage.write_json(self.storage.paths().pet(&pet.id), pet)
    }

    pub fn delete(&self, pet_id: &str) -> StorageResult<()> {
        if !self.exists(pet_id) {
            return Err(StorageError::NotFound(format!("Pet {pet_id}")));
        }
        self.storage.delete(self.storage.paths().pet(pet_id))
    }

    /// All pets, newest first.
    pub fn list_all(&self) -> StorageResult<Vec<StoredPet>> {
        self.list_where(|_| true)
    }

    /// Pets listed by `owner_id`, newest first.
    pub fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<StoredPet>> {
        self.list_where(|pet| pet.owner.id == owner_id)
    }

    /// Pets where `adopter_id` has scheduled a visit, newest first.
    pub fn list_by_adopter(&self, adopter_id: &str) -> StorageResult<Vec<StoredPet>> {
        self.list_where(|pet| pet.is_adopter(adopter_id))
    }

    fn list_where(&self, keep: impl Fn(&StoredPet) -> bool) -> StorageResult<Vec<StoredPet>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().pets_dir(), "json")?;

        let mut pets = Vec::new();
        for id in ids {
            match self.get(&id) {
                Ok(pet) if keep(&pet) => pets.push(pet),
                Ok(_) => {}
                Err(e) => tracing::warn!(pet_id = %id, error = %e, "Skipping unreadable pet document"),
            }
        }
        sort_newest_first(&mut pets);
        Ok(pets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_storage() -> (DocumentStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = DocumentStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize");
        (storage, temp_dir)
    }

    fn owner(id: &str) -> OwnerSnapshot {
        OwnerSnapshot {
            id: id.to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5511999990000".to_string(),
            image: None,
        }
    }

    fn test_pet(name: &str, owner_id: &str, age_minutes: i64) -> StoredPet {
        let created = Utc::now() - Duration::minutes(age_minutes);
        StoredPet {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            age: 3,
            weight: 7.5,
            sex: "female".to_string(),
            color: "caramel".to_string(),
            available: true,
            images: vec!["1-a.png".to_string()],
            owner: owner(owner_id),
            adopter: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn create_get_update_delete() {
        let (storage, _dir) = test_storage();
        let repo = PetRepository::new(&storage);

        let mut pet = test_pet("Rex", "owner-1", 0);
        repo.create(&pet).unwrap();
        assert_eq!(repo.get(&pet.id).unwrap(), pet);

        pet.available = false;
        repo.update(&pet).unwrap();
        assert!(!repo.get(&pet.id).unwrap().available);

        repo.delete(&pet.id).unwrap();
        assert!(matches!(repo.get(&pet.id), Err(StorageError::NotFound(_))));
        assert!(matches!(repo.delete(&pet.id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn listings_are_filtered_and_newest_first() {
        let (storage, _dir) = test_storage();
        let repo = PetRepository::new(&storage);

        let oldest = test_pet("Oldest", "owner-1", 30);
        let middle = test_pet("Middle", "owner-2", 20);
        let mut newest = test_pet("Newest", "owner-1", 10);
        newest.adopter = Some(AdopterSnapshot {
            id: "owner-2".to_string(),
            name: "Bia".to_string(),
            image: None,
        });
        for pet in [&middle, &oldest, &newest] {
            repo.create(pet).unwrap();
        }

        let names = |pets: Vec<StoredPet>| pets.into_iter().map(|p| p.name).collect::<Vec<_>>();

        assert_eq!(names(repo.list_all().unwrap()), vec!["Newest", "Middle", "Oldest"]);
        assert_eq!(names(repo.list_by_owner("owner-1").unwrap()), vec!["Newest", "Oldest"]);
        assert_eq!(names(repo.list_by_adopter("owner-2").unwrap()), vec!["Newest"]);
        assert!(repo.list_by_adopter("owner-1").unwrap().is_empty());
    }

    #[test]
    fn ownership_uses_owner_snapshot() {
        use crate::auth::AuthenticatedUser;
        use crate::storage::OwnershipEnforcer;

        let pet = test_pet("Rex", "owner-1", 0);
        assert!(pet.is_owned_by(&AuthenticatedUser::new("owner-1")));
        assert!(!pet.is_owned_by(&AuthenticatedUser::new("owner-2")));
    }

    #[test]
    fn adopter_is_omitted_from_json_until_set() {
        let pet = test_pet("Rex", "owner-1", 0);
        let json = serde_json::to_value(&pet).unwrap();
        assert!(json.get("adopter").is_none());
        assert_eq!(json["owner"]["phone"], "5511999990000");
    }
}
