//! Local user profiles and sign-in requests.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::shop::CoffeeShopRecord;
use super::validation::FieldErrors;

/// Minimum password length accepted by the local sign-in form.
pub const PASSWORD_MIN: usize = 6;

const USER_NAMESPACE: Uuid = Uuid::from_u128(0x6b72_6577_7362_4b79_a5c1_0000_0000_0001);

/// Stable user identifier.
///
/// Derived from the lower-cased email, so signing out and back in with the
/// same address finds the same favorites.
///
/// # Examples
/// ```
/// use catalog::domain::UserId;
///
/// assert_eq!(UserId::for_email("Ada@Example.com"), UserId::for_email("ada@example.com"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Identifier for the account registered under `email`.
    #[must_use]
    pub fn for_email(email: &str) -> Self {
        Self(Uuid::new_v5(
            &USER_NAMESPACE,
            email.trim().to_lowercase().as_bytes(),
        ))
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The signed-in user's profile as persisted under the session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identifier.
    pub id: UserId,
    /// Sign-in email.
    pub email: String,
    /// Given name; falls back to the email local part.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// When the profile was first created.
    pub created_at: DateTime<Utc>,
    /// Free-text biography.
    #[serde(default)]
    pub bio: String,
    /// Free-text home location, unrelated to shop locations.
    #[serde(default)]
    pub location: String,
    /// Favorited shop snapshots, hydrated from the favorites index.
    #[serde(default)]
    pub favorites: Vec<CoffeeShopRecord>,
    /// Reserved for future posts; carried through untouched.
    #[serde(default)]
    pub posts: Vec<Value>,
}

impl UserProfile {
    /// Fresh profile with empty defaults.
    #[must_use]
    pub fn new(email: &str, first_name: &str, last_name: &str, created_at: DateTime<Utc>) -> Self {
        let trimmed = email.trim();
        let given = match first_name.trim() {
            "" => local_part(trimmed),
            name => name,
        };
        Self {
            id: UserId::for_email(trimmed),
            email: trimmed.to_owned(),
            first_name: given.to_owned(),
            last_name: last_name.trim().to_owned(),
            created_at,
            bio: String::new(),
            location: String::new(),
            favorites: Vec::new(),
            posts: Vec::new(),
        }
    }

    /// "First Last", trimmed when either part is missing.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Whether the form signs into an existing account or creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Existing account.
    #[default]
    Login,
    /// New account; names and confirmation are required.
    Signup,
}

/// Sign-in form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInRequest {
    /// Login or signup.
    pub mode: AuthMode,
    /// Email address.
    pub email: String,
    /// Password; checked for shape only.
    pub password: String,
    /// Repeated password (signup only).
    pub confirm_password: String,
    /// Given name (signup only).
    pub first_name: String,
    /// Family name (signup only).
    pub last_name: String,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"\S+@\S+\.\S+")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl SignInRequest {
    /// Validate the form, collecting every failing field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] keyed by `email`, `password`, `firstName`,
    /// `lastName` and `confirmPassword`.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.email.is_empty() {
            errors.set("email", "Email is required");
        } else if !email_regex().is_match(&self.email) {
            errors.set("email", "Email is invalid");
        }

        if self.password.is_empty() {
            errors.set("password", "Password is required");
        } else if self.password.chars().count() < PASSWORD_MIN {
            errors.set(
                "password",
                format!("Password must be at least {PASSWORD_MIN} characters"),
            );
        }

        if self.mode == AuthMode::Signup {
            if self.first_name.is_empty() {
                errors.set("firstName", "First name is required");
            }
            if self.last_name.is_empty() {
                errors.set("lastName", "Last name is required");
            }
            if self.confirm_password.is_empty() {
                errors.set("confirmPassword", "Please confirm your password");
            } else if self.confirm_password != self.password {
                errors.set("confirmPassword", "Passwords do not match");
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Profile edits; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement email. The identifier is re-derived from it.
    pub email: Option<String>,
    /// Replacement biography.
    pub bio: Option<String>,
    /// Replacement home location.
    pub location: Option<String>,
}

impl ProfileChanges {
    /// Apply the changes to `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] when a replacement email is malformed.
    pub fn apply(self, profile: &mut UserProfile) -> Result<(), FieldErrors> {
        if self
            .email
            .as_deref()
            .is_some_and(|email| !email_regex().is_match(email))
        {
            let mut errors = FieldErrors::default();
            errors.set("email", "Email is invalid");
            return Err(errors);
        }

        let Self {
            first_name,
            last_name,
            email,
            bio,
            location,
        } = self;
        for (slot, value) in [
            (&mut profile.first_name, first_name),
            (&mut profile.last_name, last_name),
            (&mut profile.email, email),
            (&mut profile.bio, bio),
            (&mut profile.location, location),
        ] {
            if let Some(replacement) = value {
                *slot = replacement.trim().to_owned();
            }
        }
        profile.id = UserId::for_email(&profile.email);
        Ok(())
    }
}
