use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) url: String,
    pub(crate) text: String,
    pub(crate) created_time: DateTime<Utc>,
}

/// Comment form as submitted from the post page. Missing fields decode as
/// empty strings so that they surface as field errors rather than a
/// rejected request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub(crate) struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "name must be 1..50 chars"))]
    pub(crate) name: String,

    #[serde(default)]
    #[validate(
        email(message = "enter a valid email address"),
        length(max = 254, message = "email must be at most 254 chars")
    )]
    pub(crate) email: String,

    #[serde(default)]
    #[validate(
        length(max = 200, message = "url must be at most 200 chars"),
        custom(function = "blank_or_url")
    )]
    pub(crate) url: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "comment text must not be empty"))]
    pub(crate) text: String,
}

impl CommentForm {
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            url: self.url.trim().to_string(),
            text: self.text.trim().to_string(),
        }
    }
}

/// Field name to the messages reported for it.
pub(crate) type FieldErrors = BTreeMap<String, Vec<String>>;

pub(crate) fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs.iter().map(message_of).collect()))
        .collect()
}

fn message_of(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

const LINK_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

fn blank_or_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    if let Ok(parsed) = Url::parse(value)
        && LINK_SCHEMES.contains(&parsed.scheme())
        && parsed.has_host()
    {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some("enter a valid URL".into());
    Err(err)
}
