// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User registration, login, profile lookup and profile edit.

use chrono::Utc;

use super::{acting_user, field, required, ServiceError, ServiceResult};
use crate::auth::{AuthenticatedUser, PasswordHasher, TokenCodec};
use crate::models::{EditProfileForm, LoginRequest, RegisterRequest};
use crate::storage::{
    DocumentStorage, ImageKind, ImageRepository, ImageUpload, StorageError, StoredUser,
    UserProfile, UserRepository,
};

/// A freshly issued token and the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

pub struct UserService<'a> {
    storage: &'a DocumentStorage,
    tokens: &'a TokenCodec,
    hasher: PasswordHasher,
}

/// Passwords are compared verbatim, so unlike other fields they are not trimmed.
fn secret(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a DocumentStorage, tokens: &'a TokenCodec, hasher: PasswordHasher) -> Self {
        Self {
            storage,
            tokens,
            hasher,
        }
    }

    fn repo(&self) -> UserRepository<'a> {
        UserRepository::new(self.storage)
    }

    fn ensure_email_free(&self, email: &str, current_user_id: Option<&str>) -> ServiceResult<()> {
        match self.repo().find_by_email(email)? {
            Some(existing) if Some(existing.id.as_str()) != current_user_id => Err(
                ServiceError::Conflict("This email is already in use!".to_string()),
            ),
            _ => Ok(()),
        }
    }

    fn start_session(&self, user: StoredUser) -> ServiceResult<Session> {
        let token = self.tokens.issue(&user.id, &user.name)?;
        Ok(Session {
            token,
            user: user.into(),
        })
    }

    /// Create an account and issue its first token.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<Session> {
        if field(&request.name).is_none()
            && field(&request.email).is_none()
            && secret(&request.password).is_none()
            && secret(&request.confirm_password).is_none()
        {
            return Err(ServiceError::Validation(
                "Fill in ALL fields before continuing!".to_string(),
            ));
        }

        let name = required(&request.name, "Name is required!")?;
        let email = required(&request.email, "Email is required!")?;
        let password = secret(&request.password)
            .ok_or_else(|| ServiceError::Validation("Password is required!".to_string()))?;
        let phone = required(&request.phone, "Phone is required!")?;
        let confirm_password = secret(&request.confirm_password).ok_or_else(|| {
            ServiceError::Validation(
                "You must confirm your password before continuing!".to_string(),
            )
        })?;

        if password != confirm_password {
            return Err(ServiceError::Validation("Passwords do not match!".to_string()));
        }

        self.ensure_email_free(email, None)?;

        let password_hash = self.hasher.hash(password.to_string()).await?;
        let now = Utc::now();
        let user = StoredUser {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password_hash,
            image: None,
            created_at: now,
            updated_at: now,
        };

        self.repo().create(&user)?;
        tracing::info!(user_id = %user.id, "User registered");

        self.start_session(user)
    }

    /// Exchange email and password for a token.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<Session> {
        if field(&request.email).is_none() && secret(&request.password).is_none() {
            return Err(ServiceError::Validation(
                "Fill in ALL fields before continuing!".to_string(),
            ));
        }

        let email = required(&request.email, "Email is required!")?;
        let password = secret(&request.password)
            .ok_or_else(|| ServiceError::Validation("Password is required!".to_string()))?;

        let user = self
            .repo()
            .find_by_email(email)?
            .ok_or_else(|| ServiceError::UserNotFound("Email not found!".to_string()))?;

        let matches = self
            .hasher
            .verify(password.to_string(), user.password_hash.clone())
            .await?;
        if !matches {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials("Invalid password!".to_string()));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.start_session(user)
    }

    /// The user behind an optional verified token; `None` for anonymous requests.
    pub fn resolve_current_user(
        &self,
        auth: Option<&AuthenticatedUser>,
    ) -> ServiceResult<Option<UserProfile>> {
        let Some(auth) = auth else {
            return Ok(None);
        };

        match self.repo().get(&auth.user_id) {
            Ok(user) => Ok(Some(user.into())),
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(user_id = %auth.user_id, "Token refers to an unknown user");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_id(&self, user_id: &str) -> ServiceResult<UserProfile> {
        match self.repo().get(user_id) {
            Ok(user) => Ok(user.into()),
            Err(StorageError::NotFound(_)) => {
                Err(ServiceError::UserNotFound("User not found!".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update the acting user's profile.
    ///
    /// `user_id` is the ID named in the request path and must be the acting
    /// user's own.
    pub async fn edit_profile(
        &self,
        auth: &AuthenticatedUser,
        user_id: &str,
        form: EditProfileForm,
        image: Option<ImageUpload>,
    ) -> ServiceResult<UserProfile> {
        let mut user = acting_user(&self.repo(), auth)?;
        if user.id != user_id {
            return Err(ServiceError::Forbidden(
                "You can only edit your own profile!".to_string(),
            ));
        }

        if field(&form.name).is_none() && field(&form.email).is_none() && field(&form.phone).is_none()
        {
            return Err(ServiceError::Validation(
                "Fill in the required fields before continuing!".to_string(),
            ));
        }

        let name = required(&form.name, "Name is required!")?;
        let email = required(&form.email, "Email is required!")?;
        if email != user.email {
            self.ensure_email_free(email, Some(&user.id))?;
        }
        let phone = required(&form.phone, "Phone is required!")?;

        let new_password = match (secret(&form.password), secret(&form.confirm_password)) {
            (Some(password), Some(confirm)) if password != confirm => {
                return Err(ServiceError::Validation("Passwords do not match!".to_string()));
            }
            (Some(password), Some(_)) => Some(password),
            // A password without its confirmation is ignored.
            _ => None,
        };

        if let Some(upload) = &image {
            upload.extension()?;
        }

        if let Some(password) = new_password {
            user.password_hash = self.hasher.hash(password.to_string()).await?;
        }
        let images = ImageRepository::new(self.storage);
        let replaced = match &image {
            Some(upload) => {
                let file_name = images.save(ImageKind::User, upload)?;
                Some(std::mem::replace(&mut user.image, Some(file_name)))
            }
            None => None,
        };

        user.name = name.to_string();
        user.email = email.to_string();
        user.phone = phone.to_string();
        user.updated_at = Utc::now();

        if let Err(e) = self.repo().update(&user) {
            if replaced.is_some() {
                images.remove_all(ImageKind::User, user.image.as_slice());
            }
            return Err(e.into());
        }
        if let Some(Some(old)) = replaced {
            images.remove_all(ImageKind::User, &[old]);
        }
        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user.into())
    }
}
