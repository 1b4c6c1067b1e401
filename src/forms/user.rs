//! Signup and login payloads.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{PersonName, UserEmail};
use crate::forms::FormError;

/// Characters accepted in a password besides letters and digits.
const PASSWORD_SPECIALS: &str = "#?!@$%^&*-";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Validated signup data; the password is still plain text.
pub struct SignupPayload {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: UserEmail,
    pub password: String,
}

pub struct LoginPayload {
    pub email: UserEmail,
    pub password: String,
}

/// Letters, whitespace, `-`, `_` and `.`, but not only whitespace and dots.
fn is_valid_person_name(value: &str) -> bool {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '-' | '_' | '.'));
    let only_filler = value.chars().all(|c| c.is_whitespace() || c == '.');
    allowed && !only_filler
}

fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

fn person_name(value: &str) -> Result<PersonName, FormError> {
    if !is_valid_person_name(value) {
        return Err(FormError::InvalidName);
    }
    PersonName::new(value).map_err(|_| FormError::InvalidName)
}

impl TryFrom<SignupForm> for SignupPayload {
    type Error = FormError;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        form.validate()?;

        if !is_strong_password(&form.password) {
            return Err(FormError::WeakPassword);
        }

        Ok(Self {
            first_name: person_name(&form.first_name)?,
            last_name: person_name(&form.last_name)?,
            email: UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
        })
    }
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(first: &str, password: &str) -> SignupForm {
        SignupForm {
            first_name: first.to_string(),
            last_name: "doe".to_string(),
            email: " Jane@Example.com ".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_signup_is_normalized() {
        let payload = SignupPayload::try_from(signup("jane", "Secret#123")).unwrap();

        assert_eq!(payload.first_name.as_str(), "Jane");
        assert_eq!(payload.last_name.as_str(), "Doe");
        assert_eq!(payload.email.as_str(), "jane@example.com");
    }

    #[test]
    fn weak_passwords_are_rejected() {
        for password in ["Sh#1a", "nouppercase#1", "NOLOWER#1", "NoDigits#x", "NoSpecial12"] {
            let result = SignupPayload::try_from(signup("jane", password));
            assert!(
                matches!(result, Err(FormError::WeakPassword) | Err(FormError::Validation(_))),
                "{password} should be rejected"
            );
        }
        assert!(SignupPayload::try_from(signup("jane", "Short#1A")).is_ok());
    }

    #[test]
    fn names_with_digits_or_only_dots_are_rejected() {
        assert!(matches!(
            SignupPayload::try_from(signup("j4ne", "Secret#123")),
            Err(FormError::InvalidName)
        ));
        assert!(matches!(
            SignupPayload::try_from(signup(". .", "Secret#123")),
            Err(FormError::InvalidName)
        ));
        assert!(SignupPayload::try_from(signup("Mary-Jane", "Secret#123")).is_ok());
    }

    #[test]
    fn login_requires_password() {
        let form = LoginForm {
            email: "jane@example.com".to_string(),
            password: String::new(),
        };

        assert!(matches!(
            LoginPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }
}
