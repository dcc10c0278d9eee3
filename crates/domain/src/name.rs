use derive_more::{AsRef, Display};

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len > 255 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 255 characters or fewer ({0} > 255)")]
    TooLong(usize),
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let trimmed_email = email.trim();

        if trimmed_email.is_empty() {
            return Err(EmailError::Empty);
        }

        match trimmed_email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@') =>
            {
                Ok(Email(trimmed_email.to_lowercase()))
            }
            _ => Err(EmailError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("Email must not be empty")]
    Empty,
    #[error("Email must be a valid address")]
    Invalid,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Push Day", Ok(Name("Push Day".to_string())))]
    #[case("  Legs  ", Ok(Name("Legs".to_string())))]
    #[case("", Err(NameError::Empty))]
    #[case("   ", Err(NameError::Empty))]
    fn test_name_new(#[case] name: &str, #[case] expected: Result<Name, NameError>) {
        assert_eq!(Name::new(name), expected);
    }

    #[test]
    fn test_name_new_too_long() {
        assert_eq!(Name::new(&"A".repeat(256)), Err(NameError::TooLong(256)));
    }

    #[rstest]
    #[case("alice@example.com", Ok(Email("alice@example.com".to_string())))]
    #[case(" Bob@Example.org ", Ok(Email("bob@example.org".to_string())))]
    #[case("", Err(EmailError::Empty))]
    #[case("alice", Err(EmailError::Invalid))]
    #[case("@example.com", Err(EmailError::Invalid))]
    #[case("alice@example", Err(EmailError::Invalid))]
    #[case("alice@.com", Err(EmailError::Invalid))]
    #[case("alice@a@b.com", Err(EmailError::Invalid))]
    fn test_email_new(#[case] email: &str, #[case] expected: Result<Email, EmailError>) {
        assert_eq!(Email::new(email), expected);
    }
}
