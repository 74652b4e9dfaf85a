//! Blog post data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::user::UserId;

/// Maximum length of titles, subtitles and image URLs, in characters.
pub const POST_FIELD_MAX: usize = 250;

/// Display format of a post's publication date, e.g. `October 15, 2026`.
pub const POST_DATE_FORMAT: &str = "%B %d, %Y";

/// Validation errors raised while building post content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// A required field was missing or blank.
    Required,
    TooLong { max: usize },
    /// The image URL is not an absolute `http` or `https` URL.
    InvalidUrl,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "this field is required"),
            Self::TooLong { max } => write!(f, "must be at most {max} characters"),
            Self::InvalidUrl => write!(f, "must be a valid http or https URL"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Store-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn bounded(raw: &str) -> Result<String, PostValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PostValidationError::Required);
    }
    if trimmed.chars().count() > POST_FIELD_MAX {
        return Err(PostValidationError::TooLong {
            max: POST_FIELD_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

macro_rules! text_field {
    ($(#[$meta:meta])* $name:ident, $validate:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
                let validate: fn(&str) -> Result<String, PostValidationError> = $validate;
                validate(raw.as_ref()).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = PostValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

text_field!(
    /// Unique post headline.
    PostTitle,
    bounded
);

text_field!(PostSubtitle, bounded);

text_field!(
    /// Rich-text (HTML) body. Stored as submitted; only blankness is rejected.
    PostBody,
    |raw| {
        if raw.trim().is_empty() {
            Err(PostValidationError::Required)
        } else {
            Ok(raw.to_owned())
        }
    }
);

text_field!(
    /// Absolute `http`/`https` URL of the header image.
    ///
    /// # Examples
    /// ```
    /// use blog::domain::ImageUrl;
    ///
    /// assert!(ImageUrl::new("https://example.com/a.jpg").is_ok());
    /// assert!(ImageUrl::new("not a url").is_err());
    /// ```
    ImageUrl,
    |raw| {
        let value = bounded(raw)?;
        let parsed = Url::parse(&value).map_err(|_| PostValidationError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(PostValidationError::InvalidUrl);
        }
        Ok(value)
    }
);

/// Editable content of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: PostTitle,
    pub subtitle: PostSubtitle,
    pub body: PostBody,
    pub img_url: ImageUrl,
}

/// Published post.
///
/// ## Invariants
/// - `title` is unique across posts.
/// - `author_id` references an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: PostId,
    pub content: PostContent,
    /// Publication date in [`POST_DATE_FORMAT`].
    pub date: String,
    pub author_id: UserId,
}

impl BlogPost {
    #[must_use]
    pub fn title(&self) -> &PostTitle {
        &self.content.title
    }
}

/// Post data supplied on creation; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: PostContent,
    pub date: String,
    pub author_id: UserId,
}

/// Replacement values applied by an edit. The publication date is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub content: PostContent,
    pub author_id: UserId,
}
