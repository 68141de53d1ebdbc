use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unknown role `{value}`")]
    UnknownRole { value: String },
}

impl DomainError {
    pub fn unknown_role(value: impl Into<String>) -> Self {
        Self::UnknownRole {
            value: value.into(),
        }
    }
}
