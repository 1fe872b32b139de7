//! Authentication primitives: login credentials, signup forms and tokens.
//!
//! Constructors validate raw string input before a service talks to the
//! gateway, so rejected input never reaches the network.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Domain error returned when login or signup input is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain.tld`.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort { min: usize },
    /// Password lacks an uppercase letter.
    PasswordMissingUppercase,
    /// Password lacks a lowercase letter.
    PasswordMissingLowercase,
    /// Password lacks a digit.
    PasswordMissingDigit,
    /// Name was missing or blank once trimmed.
    EmptyName,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordMissingUppercase => {
                write!(f, "password must contain an uppercase letter")
            }
            Self::PasswordMissingLowercase => {
                write!(f, "password must contain a lowercase letter")
            }
            Self::PasswordMissingDigit => write!(f, "password must contain a number"),
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn normalise_email(email: &str) -> Result<String, CredentialsValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(CredentialsValidationError::EmptyEmail);
    }
    Ok(trimmed.to_owned())
}

/// Check the signup password policy, reporting the first rule that fails.
pub fn check_password_policy(password: &str) -> Result<(), CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(CredentialsValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CredentialsValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(CredentialsValidationError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CredentialsValidationError::PasswordMissingDigit);
    }
    Ok(())
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty. Its format is left to the server so
///   that accounts created elsewhere can still sign in.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" demo@test.com ", "Passw0rd1").unwrap();
/// assert_eq!(creds.email(), "demo@test.com");
/// assert_eq!(creds.password(), "Passw0rd1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account-creation form.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `email` matches `local@domain.tld` with no whitespace.
/// - `password` satisfies [`check_password_policy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    name: String,
    email: String,
    password: Zeroizing<String>,
}

impl SignupForm {
    /// Validate raw signup inputs.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{CredentialsValidationError, SignupForm};
    ///
    /// let err = SignupForm::try_from_parts("Ada", "ada@example.com", "abc").unwrap_err();
    /// assert_eq!(err, CredentialsValidationError::PasswordTooShort { min: 8 });
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = normalise_email(email)?;
        if !email_regex().is_match(&email) {
            return Err(CredentialsValidationError::MalformedEmail);
        }
        check_password_policy(password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }

        Ok(Self {
            name: name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email for the new account.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password for the new account.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque bearer token issued by the remote API.
///
/// The value is never inspected and is wiped from memory on drop. `Debug`
/// output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Borrow the raw token for header construction.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}
