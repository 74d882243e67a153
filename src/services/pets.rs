// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pet listings, visits and adoptions.
//!
//! A pet moves from listed, to visit scheduled (an adopter is recorded), to
//! concluded (`available == false`). There is no way back.

use chrono::Utc;

use super::{acting_user, required, ServiceError, ServiceResult};
use crate::auth::AuthenticatedUser;
use crate::models::PetForm;
use crate::storage::repository::is_document_id;
use crate::storage::{
    AdopterSnapshot, DocumentStorage, ImageKind, ImageRepository, ImageUpload, OwnerSnapshot,
    OwnershipEnforcer, PetRepository, StorageError, StoredPet, UserRepository,
};

/// Owner contact details handed to a user after scheduling a visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitScheduled {
    pub pet_id: String,
    pub owner_name: String,
    pub owner_phone: String,
}

/// Validated pet fields, ready to be written.
struct PetFields {
    name: String,
    age: u32,
    weight: f64,
    sex: String,
    color: String,
}

impl PetFields {
    fn parse(form: &PetForm) -> ServiceResult<Self> {
        let name = required(&form.name, "Name is required!")?;
        let age = required(&form.age, "Age is required!")?;
        let weight = required(&form.weight, "Weight is required!")?;
        let sex = required(&form.sex, "Sex is required!")?;
        let color = required(&form.color, "Color is required!")?;

        let age = age.parse::<u32>().map_err(|_| {
            ServiceError::Validation("Age must be a whole number of years!".to_string())
        })?;
        let weight = weight
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w > 0.0)
            .ok_or_else(|| ServiceError::Validation("Weight must be a positive number!".to_string()))?;

        Ok(Self {
            name: name.to_string(),
            age,
            weight,
            sex: sex.to_string(),
            color: color.to_string(),
        })
    }
}

pub struct PetService<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> PetService<'a> {
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    fn repo(&self) -> PetRepository<'a> {
        PetRepository::new(self.storage)
    }

    fn images(&self) -> ImageRepository<'a> {
        ImageRepository::new(self.storage)
    }

    /// Load a pet by a client-supplied ID.
    fn load(&self, pet_id: &str) -> ServiceResult<StoredPet> {
        if !is_document_id(pet_id) {
            return Err(ServiceError::InvalidId("The id is invalid!".to_string()));
        }
        self.repo().get(pet_id).map_err(|e| match e {
            StorageError::NotFound(_) => ServiceError::PetNotFound("Pet not found!".to_string()),
            other => other.into(),
        })
    }

    /// Load a pet the acting user owns.
    fn load_owned(&self, auth: &AuthenticatedUser, pet_id: &str) -> ServiceResult<StoredPet> {
        let pet = self.load(pet_id)?;
        if let Err(e) = pet.verify_ownership(auth) {
            tracing::info!(pet_id = %pet.id, user_id = %auth.user_id, "Rejected change by non-owner");
            return Err(e.into());
        }
        Ok(pet)
    }

    /// List a new pet for adoption on behalf of the acting user.
    pub fn create(
        &self,
        auth: &AuthenticatedUser,
        form: PetForm,
        images: Vec<ImageUpload>,
    ) -> ServiceResult<StoredPet> {
        let owner = acting_user(&UserRepository::new(self.storage), auth)?;

        let fields = PetFields::parse(&form)?;
        if images.is_empty() {
            return Err(ServiceError::Validation("Pet images are required!".to_string()));
        }
        ImageRepository::validate(&images)?;

        let images = self.images().save_all(ImageKind::Pet, &images)?;
        let now = Utc::now();
        let pet = StoredPet {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            age: fields.age,
            weight: fields.weight,
            sex: fields.sex,
            color: fields.color,
            available: true,
            images,
            owner: OwnerSnapshot::from(&owner),
            adopter: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.repo().create(&pet) {
            self.images().remove_all(ImageKind::Pet, &pet.images);
            return Err(e.into());
        }
        tracing::info!(pet_id = %pet.id, user_id = %owner.id, "Pet listed");

        Ok(pet)
    }

    /// Every pet, newest first.
    pub fn list_all(&self) -> ServiceResult<Vec<StoredPet>> {
        Ok(self.repo().list_all()?)
    }

    /// Pets the acting user listed, newest first.
    pub fn list_owned_by(&self, auth: &AuthenticatedUser) -> ServiceResult<Vec<StoredPet>> {
        let user = acting_user(&UserRepository::new(self.storage), auth)?;
        Ok(self.repo().list_by_owner(&user.id)?)
    }

    /// Pets the acting user scheduled a visit to, newest first.
    pub fn list_adopted_by(&self, auth: &AuthenticatedUser) -> ServiceResult<Vec<StoredPet>> {
        let user = acting_user(&UserRepository::new(self.storage), auth)?;
        Ok(self.repo().list_by_adopter(&user.id)?)
    }

    pub fn get_by_id(&self, pet_id: &str) -> ServiceResult<StoredPet> {
        self.load(pet_id)
    }

    pub fn delete_by_id(&self, auth: &AuthenticatedUser, pet_id: &str) -> ServiceResult<()> {
        acting_user(&UserRepository::new(self.storage), auth)?;
        let pet = self.load_owned(auth, pet_id)?;

        self.repo().delete(&pet.id)?;
        self.images().remove_all(ImageKind::Pet, &pet.images);
        tracing::info!(pet_id = %pet.id, user_id = %auth.user_id, "Pet removed");
        Ok(())
    }

    /// Replace a pet's fields. Supplied images replace the stored ones; with
    /// none supplied the stored images are kept.
    pub fn update(
        &self,
        auth: &AuthenticatedUser,
        pet_id: &str,
        form: PetForm,
        images: Vec<ImageUpload>,
    ) -> ServiceResult<StoredPet> {
        acting_user(&UserRepository::new(self.storage), auth)?;
        let mut pet = self.load_owned(auth, pet_id)?;

        let fields = PetFields::parse(&form)?;
        ImageRepository::validate(&images)?;

        let replaced = if images.is_empty() {
            Vec::new()
        } else {
            let saved = self.images().save_all(ImageKind::Pet, &images)?;
            std::mem::replace(&mut pet.images, saved)
        };
        pet.name = fields.name;
        pet.age = fields.age;
        pet.weight = fields.weight;
        pet.sex = fields.sex;
        pet.color = fields.color;
        pet.updated_at = Utc::now();

        if let Err(e) = self.repo().update(&pet) {
            if !replaced.is_empty() {
                self.images().remove_all(ImageKind::Pet, &pet.images);
            }
            return Err(e.into());
        }
        self.images().remove_all(ImageKind::Pet, &replaced);
        tracing::info!(pet_id = %pet.id, user_id = %auth.user_id, "Pet updated");

        Ok(pet)
    }

    /// Record the acting user as the pet's prospective adopter.
    ///
    /// A different user's earlier visit is overwritten.
    pub fn schedule_visit(
        &self,
        auth: &AuthenticatedUser,
        pet_id: &str,
    ) -> ServiceResult<VisitScheduled> {
        let visitor = acting_user(&UserRepository::new(self.storage), auth)?;
        let mut pet = self.load(pet_id)?;

        if pet.is_owned_by(auth) {
            return Err(ServiceError::Forbidden(
                "You cannot schedule a visit to your own pet!".to_string(),
            ));
        }
        if pet.is_adopter(&visitor.id) {
            return Err(ServiceError::Conflict(
                "You have already scheduled a visit to this pet!".to_string(),
            ));
        }

        if let Some(previous) = &pet.adopter {
            tracing::debug!(pet_id = %pet.id, previous_adopter = %previous.id, "Replacing scheduled visit");
        }
        pet.adopter = Some(AdopterSnapshot::from(&visitor));
        pet.updated_at = Utc::now();
        self.repo().update(&pet)?;
        tracing::info!(pet_id = %pet.id, user_id = %visitor.id, "Visit scheduled");

        Ok(VisitScheduled {
            pet_id: pet.id,
            owner_name: pet.owner.name,
            owner_phone: pet.owner.phone,
        })
    }

    /// Mark the pet as adopted. Repeating it is harmless.
    pub fn conclude_adoption(&self, auth: &AuthenticatedUser, pet_id: &str) -> ServiceResult<()> {
        acting_user(&UserRepository::new(self.storage), auth)?;
        let mut pet = self.load_owned(auth, pet_id)?;

        pet.available = false;
        pet.updated_at = Utc::now();
        self.repo().update(&pet)?;
        tracing::info!(pet_id = %pet.id, user_id = %auth.user_id, "Adoption concluded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::test_support::{pet_form, png, register, test_state, TestUser};

    fn list_pet(state: &AppState, owner: &TestUser, name: &str) -> StoredPet {
        state
            .pets()
            .create(&owner.auth, pet_form(name), vec![png("rex.png")])
            .unwrap()
    }

    #[tokio::test]
    async fn create_snapshots_owner_and_stores_images() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;

        let pet = state
            .pets()
            .create(
                &ana.auth,
                pet_form("Rex"),
                vec![png("a.png"), ImageUpload::new("b.JPG", b"jpg".to_vec())],
            )
            .unwrap();

        assert!(pet.available);
        assert!(pet.adopter.is_none());
        assert_eq!(pet.age, 3);
        assert_eq!(pet.weight, 7.5);
        assert_eq!(pet.owner.id, ana.user_id);
        assert_eq!(pet.owner.phone, "5511999990000");
        assert_eq!(pet.images.len(), 2);
        assert!(pet.images[1].ends_with(".jpg"));
        let images = ImageRepository::new(state.storage());
        assert!(pet.images.iter().all(|name| images.path(ImageKind::Pet, name).is_file()));

        assert_eq!(state.pets().get_by_id(&pet.id).unwrap(), pet);
    }

    #[tokio::test]
    async fn create_validates_in_field_order() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let pets = state.pets();

        let err = pets.create(&ana.auth, PetForm::default(), vec![]).unwrap_err();
        assert_eq!(err, ServiceError::Validation("Name is required!".to_string()));

        let form = PetForm {
            color: Some("  ".to_string()),
            ..pet_form("Rex")
        };
        let err = pets.create(&ana.auth, form, vec![png("a.png")]).unwrap_err();
        assert_eq!(err, ServiceError::Validation("Color is required!".to_string()));

        let err = pets.create(&ana.auth, pet_form("Rex"), vec![]).unwrap_err();
        assert_eq!(err, ServiceError::Validation("Pet images are required!".to_string()));

        assert!(pets.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_bad_numbers_and_images_without_writing() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let pets = state.pets();

        let form = PetForm {
            age: Some("three".to_string()),
            ..pet_form("Rex")
        };
        assert!(matches!(
            pets.create(&ana.auth, form, vec![png("a.png")]),
            Err(ServiceError::Validation(_))
        ));

        let form = PetForm {
            weight: Some("-2".to_string()),
            ..pet_form("Rex")
        };
        assert!(matches!(
            pets.create(&ana.auth, form, vec![png("a.png")]),
            Err(ServiceError::Validation(_))
        ));

        let uploads = vec![png("a.png"), ImageUpload::new("virus.exe", vec![0])];
        assert!(matches!(
            pets.create(&ana.auth, pet_form("Rex"), uploads),
            Err(ServiceError::Validation(_))
        ));

        assert!(pets.list_all().unwrap().is_empty());
        let stored = std::fs::read_dir(state.storage().paths().pet_images_dir())
            .unwrap()
            .count();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn create_for_vanished_user_is_unauthenticated() {
        let (state, _dir) = test_state();
        let ghost = AuthenticatedUser::new(uuid::Uuid::new_v4().to_string());

        let err = state
            .pets()
            .create(&ghost, pet_form("Rex"), vec![png("a.png")])
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn listings_are_scoped_and_newest_first() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let bia = register(&state, "Bia", "bia@example.com").await;

        let first = list_pet(&state, &ana, "First");
        let second = list_pet(&state, &bia, "Second");
        let third = list_pet(&state, &ana, "Third");
        state.pets().schedule_visit(&bia.auth, &first.id).unwrap();

        let names = |pets: Vec<StoredPet>| pets.into_iter().map(|p| p.name).collect::<Vec<_>>();
        let pets = state.pets();

        assert_eq!(names(pets.list_all().unwrap()), vec!["Third", "Second", "First"]);
        assert_eq!(names(pets.list_owned_by(&ana.auth).unwrap()), vec!["Third", "First"]);
        assert_eq!(names(pets.list_adopted_by(&bia.auth).unwrap()), vec!["First"]);
        assert!(pets.list_adopted_by(&ana.auth).unwrap().is_empty());
        assert_eq!(second.owner.id, bia.user_id);
        assert_eq!(third.owner.id, ana.user_id);
    }

    #[tokio::test]
    async fn get_by_id_distinguishes_invalid_and_missing() {
        let (state, _dir) = test_state();

        assert!(matches!(
            state.pets().get_by_id("123"),
            Err(ServiceError::InvalidId(_))
        ));
        assert!(matches!(
            state.pets().get_by_id(&uuid::Uuid::new_v4().to_string()),
            Err(ServiceError::PetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn only_owner_may_delete() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let bia = register(&state, "Bia", "bia@example.com").await;
        let pet = list_pet(&state, &ana, "Rex");

        assert_eq!(
            state.pets().delete_by_id(&bia.auth, &pet.id),
            Err(ServiceError::Forbidden(
                "You do not have permission to change this pet!".to_string()
            ))
        );
        assert!(state.pets().get_by_id(&pet.id).is_ok());

        state.pets().delete_by_id(&ana.auth, &pet.id).unwrap();
        let images = ImageRepository::new(state.storage());
        assert!(pet.images.iter().all(|name| !images.path(ImageKind::Pet, name).exists()));
        assert!(matches!(
            state.pets().get_by_id(&pet.id),
            Err(ServiceError::PetNotFound(_))
        ));
        assert!(matches!(
            state.pets().delete_by_id(&ana.auth, &pet.id),
            Err(ServiceError::PetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_checks_ownership_before_fields() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let bia = register(&state, "Bia", "bia@example.com").await;
        let pet = list_pet(&state, &ana, "Rex");

        let err = state
            .pets()
            .update(&bia.auth, &pet.id, PetForm::default(), vec![])
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = state
            .pets()
            .update(&ana.auth, &pet.id, PetForm::default(), vec![])
            .unwrap_err();
        assert_eq!(err, ServiceError::Validation("Name is required!".to_string()));
    }

    #[tokio::test]
    async fn update_keeps_or_replaces_images() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let pet = list_pet(&state, &ana, "Rex");

        let form = PetForm {
            age: Some("4".to_string()),
            ..pet_form("Rex II")
        };
        let updated = state.pets().update(&ana.auth, &pet.id, form, vec![]).unwrap();
        assert_eq!(updated.name, "Rex II");
        assert_eq!(updated.age, 4);
        assert_eq!(updated.images, pet.images);
        assert_eq!(updated.created_at, pet.created_at);

        let replaced = state
            .pets()
            .update(
                &ana.auth,
                &pet.id,
                pet_form("Rex II"),
                vec![png("x.png"), png("y.png")],
            )
            .unwrap();
        assert_eq!(replaced.images.len(), 2);
        assert!(replaced.images.iter().all(|name| !pet.images.contains(name)));
        assert_eq!(state.pets().get_by_id(&pet.id).unwrap(), replaced);

        let images = ImageRepository::new(state.storage());
        assert!(pet.images.iter().all(|name| !images.path(ImageKind::Pet, name).exists()));
        assert!(replaced.images.iter().all(|name| images.path(ImageKind::Pet, name).is_file()));
    }

    #[tokio::test]
    async fn failed_create_leaves_no_images_behind() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;

        // A plain file where the pet collection should be makes the document write fail.
        let pets_dir = state.storage().paths().pets_dir();
        std::fs::remove_dir_all(&pets_dir).unwrap();
        std::fs::write(&pets_dir, b"").unwrap();

        let err = state
            .pets()
            .create(&ana.auth, pet_form("Rex"), vec![png("a.png"), png("b.png")])
            .unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        let stored = std::fs::read_dir(state.storage().paths().pet_images_dir())
            .unwrap()
            .count();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn schedule_visit_rules() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let bia = register(&state, "Bia", "bia@example.com").await;
        let caio = register(&state, "Caio", "caio@example.com").await;
        let pet = list_pet(&state, &ana, "Rex");
        let pets = state.pets();

        assert!(matches!(
            pets.schedule_visit(&ana.auth, &pet.id),
            Err(ServiceError::Forbidden(_))
        ));

        let visit = pets.schedule_visit(&bia.auth, &pet.id).unwrap();
        assert_eq!(visit.owner_name, "Ana");
        assert_eq!(visit.owner_phone, "5511999990000");

        assert!(matches!(
            pets.schedule_visit(&bia.auth, &pet.id),
            Err(ServiceError::Conflict(_))
        ));

        // A later visitor takes the adopter slot.
        pets.schedule_visit(&caio.auth, &pet.id).unwrap();
        let adopter = pets.get_by_id(&pet.id).unwrap().adopter.unwrap();
        assert_eq!(adopter.id, caio.user_id);
        assert_eq!(adopter.name, "Caio");

        assert!(matches!(
            pets.schedule_visit(&bia.auth, "nope"),
            Err(ServiceError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn conclude_adoption_is_owner_only_and_repeatable() {
        let (state, _dir) = test_state();
        let ana = register(&state, "Ana", "ana@example.com").await;
        let bia = register(&state, "Bia", "bia@example.com").await;
        let pet = list_pet(&state, &ana, "Rex");
        let pets = state.pets();
        pets.schedule_visit(&bia.auth, &pet.id).unwrap();

        assert!(matches!(
            pets.conclude_adoption(&bia.auth, &pet.id),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(pets.get_by_id(&pet.id).unwrap().available);

        pets.conclude_adoption(&ana.auth, &pet.id).unwrap();
        pets.conclude_adoption(&ana.auth, &pet.id).unwrap();

        let concluded = pets.get_by_id(&pet.id).unwrap();
        assert!(!concluded.available);
        assert_eq!(concluded.adopter.unwrap().id, bia.user_id);
    }
}
