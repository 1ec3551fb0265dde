use super::error::DomainError;

const NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl Category {
    pub(crate) fn new(id: i64, name: impl Into<String>) -> Result<Self, DomainError> {
        validate_id("id", id)?;
        Ok(Self {
            id,
            name: normalize_name("name", &name.into())?,
        })
    }

    pub(crate) fn url(&self) -> String {
        format!("/categories/{}/", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl Tag {
    pub(crate) fn new(id: i64, name: impl Into<String>) -> Result<Self, DomainError> {
        validate_id("id", id)?;
        Ok(Self {
            id,
            name: normalize_name("name", &name.into())?,
        })
    }

    pub(crate) fn url(&self) -> String {
        format!("/tags/{}/", self.id)
    }
}

pub(crate) fn normalize_name(field: &'static str, name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(DomainError::Validation {
            field,
            message: "must be 1..100 chars",
        });
    }
    Ok(name.to_string())
}

pub(crate) fn validate_id(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}
