//! Comment data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::post::PostId;
use super::user::UserId;

/// Store-assigned comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i32);

impl CommentId {
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raised when submitted comment text is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("comment must not be empty")]
pub struct EmptyComment;

/// Rich-text comment body, kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentText(String);

impl CommentText {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyComment> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyComment);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentText> for String {
    fn from(value: CommentText) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentText {
    type Error = EmptyComment;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Immutable comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub text: CommentText,
    pub author_id: UserId,
    pub post_id: PostId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: CommentText,
    pub author_id: UserId,
    pub post_id: PostId,
}
