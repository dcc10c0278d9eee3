use derive_more::{Deref, Display, From};
use std::fmt;

use crate::{CreateError, DeleteError, Email, Name, ReadError, ValidationError};

#[allow(async_fn_in_trait)]
pub trait AuthService {
    async fn get_current_user(&self) -> Result<User, ReadError>;
    async fn login(&self, credentials: Credentials) -> Result<User, ReadError>;
    async fn logout(&self) -> Result<(), DeleteError>;
    async fn register(&self, registration: Registration) -> Result<User, CreateError>;
    async fn validate_invitation(&self, code: &str) -> Result<Invitation, ReadError>;

    async fn validate_registration(
        &self,
        name: &str,
        email: &str,
        password: &str,
        invitation_code: &str,
    ) -> Result<Registration, ValidationError> {
        let name = Name::new(name).map_err(|err| ValidationError::Other(err.into()))?;
        let email = Email::new(email).map_err(|err| ValidationError::Other(err.into()))?;
        let password = Password::new(password).map_err(|err| ValidationError::Other(err.into()))?;
        let invitation = match self.validate_invitation(invitation_code.trim()).await {
            Ok(invitation) => invitation,
            Err(err) => return Err(ValidationError::Other(err.into())),
        };
        if !invitation.valid {
            return Err(ValidationError::Other(
                RegistrationError::InvalidInvitation.into(),
            ));
        }
        if let Some(ref invited) = invitation.email {
            if *invited != email {
                return Err(ValidationError::Other(
                    RegistrationError::EmailMismatch.into(),
                ));
            }
        }
        Ok(Registration {
            name,
            email,
            password,
            invitation_code: invitation.code,
        })
    }
}

#[allow(async_fn_in_trait)]
pub trait AuthRepository {
    async fn read_current_user(&self) -> Result<User, ReadError>;
    async fn login(&self, credentials: Credentials) -> Result<User, ReadError>;
    async fn logout(&self) -> Result<(), DeleteError>;
    async fn register(&self, registration: Registration) -> Result<User, CreateError>;
    async fn read_invitation(&self, code: &str) -> Result<Invitation, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub name: Name,
    pub email: Email,
    pub onboarding_completed: bool,
}

#[derive(Deref, Display, From, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserID(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: Name,
    pub email: Email,
    pub password: Password,
    pub invitation_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub code: String,
    pub email: Option<Email>,
    pub valid: bool,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        let len = password.chars().count();
        if len < 8 {
            return Err(PasswordError::TooShort(len));
        }
        Ok(Self(password.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Password(***)")
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PasswordError {
    #[error("Password must be at least 8 characters ({0} < 8)")]
    TooShort(usize),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RegistrationError {
    #[error("Invitation is invalid or has expired")]
    InvalidInvitation,
    #[error("Email does not match the invitation")]
    EmailMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl TryFrom<&str> for Gender {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "other" => Ok(Gender::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Gender::Female => "female",
                Gender::Male => "male",
                Gender::Other => "other",
            }
        )
    }
}
