use derive_more::{AsRef, Display};

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let normalized_name = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = normalized_name.chars().count();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(normalized_name))
    }

    /// Lowercase, hyphen-separated form of the name, e.g. `close-grip-bench-press`.
    #[must_use]
    pub fn slug(&self) -> String {
        self.0
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
