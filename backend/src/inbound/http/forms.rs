//! URL-encoded form payloads and their validation.
//!
//! Every field defaults to empty so that a missing field is reported as a
//! validation error rather than a deserialisation failure. Validation collects
//! one message list per field and never touches storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    BlogPost, CommentText, DisplayName, EmailAddress, ImageUrl, LoginCredentials, Password,
    PostBody, PostContent, PostSubtitle, PostTitle, Registration,
};

/// Validation messages keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl ToString) {
        self.0
            .entry(field.into())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Record a failure and yield `None` so callers can keep validating.
    fn check<T, E: ToString>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(field, error);
                None
            }
        }
    }
}

/// Submitted values echoed back when a form is re-rendered.
pub type FormValues = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = errors.check("name", DisplayName::new(&self.name));
        let email = errors.check("email", EmailAddress::new(&self.email));
        let password = errors.check("password", Password::new(self.password.as_str()));
        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => {
                Ok(Registration::new(name, email, password))
            }
            _ => Err(errors),
        }
    }

    /// Values safe to echo; the password is never sent back.
    pub fn values(&self) -> FormValues {
        FormValues::from([("name", self.name.clone()), ("email", self.email.clone())])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginCredentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = errors.check("email", EmailAddress::new(&self.email));
        let password = errors.check("password", Password::new(self.password.as_str()));
        match (email, password) {
            (Some(email), Some(password)) => Ok(LoginCredentials::new(email, password)),
            _ => Err(errors),
        }
    }

    pub fn values(&self) -> FormValues {
        FormValues::from([("email", self.email.clone())])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

impl PostForm {
    /// Prefill from an existing post for the edit page.
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.content.title.to_string(),
            subtitle: post.content.subtitle.to_string(),
            img_url: post.content.img_url.to_string(),
            body: post.content.body.to_string(),
        }
    }

    pub fn validate(&self) -> Result<PostContent, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = errors.check("title", PostTitle::new(&self.title));
        let subtitle = errors.check("subtitle", PostSubtitle::new(&self.subtitle));
        let img_url = errors.check("img_url", ImageUrl::new(&self.img_url));
        let body = errors.check("body", PostBody::new(&self.body));
        match (title, subtitle, img_url, body) {
            (Some(title), Some(subtitle), Some(img_url), Some(body)) => Ok(PostContent {
                title,
                subtitle,
                body,
                img_url,
            }),
            _ => Err(errors),
        }
    }

    pub fn values(&self) -> FormValues {
        FormValues::from([
            ("title", self.title.clone()),
            ("subtitle", self.subtitle.clone()),
            ("img_url", self.img_url.clone()),
            ("body", self.body.clone()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub comment: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<CommentText, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors
            .check("comment", CommentText::new(self.comment.as_str()))
            .ok_or(errors)
    }

    pub fn values(&self) -> FormValues {
        FormValues::from([("comment", self.comment.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn register(name: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[rstest]
    fn valid_registration_normalises_email() {
        let registration = register("Ada", " Ada@Example.COM ", "secret")
            .validate()
            .expect("valid form");
        assert_eq!(registration.credentials.email().as_ref(), "ada@example.com");
        assert_eq!(registration.name.as_ref(), "Ada");
    }

    #[rstest]
    #[case(register("", "ada@example.com", "pw"), &["name"])]
    #[case(register("Ada", "not-an-email", "pw"), &["email"])]
    #[case(register("Ada", "ada@example.com", ""), &["password"])]
    #[case(register("", "", ""), &["email", "name", "password"])]
    fn invalid_registration_reports_each_field(
        #[case] form: RegisterForm,
        #[case] fields: &[&str],
    ) {
        let errors = form.validate().expect_err("invalid form");
        for field in fields {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
        assert_eq!(errors.0.len(), fields.len());
    }

    #[rstest]
    fn register_values_omit_the_password() {
        let values = register("Ada", "ada@example.com", "hunter2").values();
        assert!(!values.contains_key("password"));
        assert_eq!(values.get("email").map(String::as_str), Some("ada@example.com"));
    }

    #[rstest]
    fn missing_fields_deserialise_as_empty() {
        let form: PostForm = serde_json::from_str("{}").expect("defaults apply");
        let errors = form.validate().expect_err("all required");
        for field in ["title", "subtitle", "img_url", "body"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[rstest]
    #[case("ftp://example.com/a.png")]
    #[case("example.com/a.png")]
    fn post_images_need_http_urls(#[case] img_url: &str) {
        let form = PostForm {
            title: "Title".into(),
            subtitle: "Sub".into(),
            img_url: img_url.into(),
            body: "<p>x</p>".into(),
        };
        let errors = form.validate().expect_err("bad url");
        assert!(errors.get("img_url").is_some());
        assert!(errors.get("title").is_none());
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("<p>hello</p>", true)]
    fn comments_must_have_content(#[case] text: &str, #[case] valid: bool) {
        let form = CommentForm {
            comment: text.to_owned(),
        };
        assert_eq!(form.validate().is_ok(), valid);
    }

    #[rstest]
    fn login_requires_both_fields() {
        let form = LoginForm::default();
        let errors = form.validate().expect_err("empty login");
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }

    #[rstest]
    fn field_errors_serialise_as_a_map() {
        let mut errors = FieldErrors::default();
        errors.add("title", "taken");
        let value = serde_json::to_value(&errors).expect("serialise");
        assert_eq!(value, serde_json::json!({"title": ["taken"]}));
    }
}
