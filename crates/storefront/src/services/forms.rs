//! Request payload schemas.
//!
//! Payloads derive [`Validate`] with one message per rule. `validator`
//! reports violations in a map, so each schema lists its fields in the order
//! they should be checked and [`Form::check`] surfaces the first violation in
//! that order.
//!
//! Every field is `#[serde(default)]`: a missing field reaches validation as
//! an empty value and fails with its own message instead of a generic
//! deserialization error.

use std::borrow::Cow;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use fitova_core::Email;

use crate::models::{NewAddress, NewContactMessage, NewHomepageSlide, ProfileChanges};

/// The first rule a payload broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// A validated request payload that converts into a store input.
pub trait Form: Validate + Sized {
    /// Fields in the order violations are reported.
    const FIELDS: &'static [&'static str];

    /// What the payload becomes once valid.
    type Output;

    /// Convert a payload that already passed [`Validate`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for checks that need parsing.
    fn into_output(self) -> Result<Self::Output, ValidationError>;

    /// Validate and convert.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule's message.
    fn check(self) -> Result<Self::Output, ValidationError> {
        if let Err(errors) = self.validate() {
            return Err(first_violation(&errors, Self::FIELDS));
        }
        self.into_output()
    }
}

fn first_violation(errors: &ValidationErrors, fields: &[&str]) -> ValidationError {
    let by_field = errors.errors();
    fields
        .iter()
        .filter_map(|field| match by_field.get(*field) {
            Some(ValidationErrorsKind::Field(errs)) => errs.first(),
            _ => None,
        })
        .chain(by_field.values().find_map(|kind| match kind {
            ValidationErrorsKind::Field(errs) => errs.first(),
            _ => None,
        }))
        .next()
        .map_or_else(
            || ValidationError("Invalid request".to_owned()),
            |e| {
                ValidationError(
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{} is invalid", e.code), ToString::to_string),
                )
            },
        )
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

const fn default_true() -> bool {
    true
}

fn non_negative_integer(value: &serde_json::Value) -> Result<(), validator::ValidationError> {
    match value.as_i64() {
        Some(n) if n >= 0 && i32::try_from(n).is_ok() => Ok(()),
        _ => Err(validator::ValidationError::new("sort_order").with_message(Cow::Borrowed(
            "Sort order must be a non-negative integer",
        ))),
    }
}

/// Body of `POST /api/admin/homepage-slides`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlidePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Subtitle is required"))]
    pub subtitle: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Button text is required"))]
    pub button_text: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Button link is required"))]
    pub button_link: String,
    #[serde(default)]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: String,
    /// Kept loose so strings, fractions and negatives all fail with the same
    /// message.
    #[serde(default)]
    #[validate(custom(function = "non_negative_integer"))]
    pub sort_order: serde_json::Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Form for SlidePayload {
    const FIELDS: &'static [&'static str] = &[
        "title",
        "subtitle",
        "description",
        "button_text",
        "button_link",
        "image_url",
        "sort_order",
    ];

    type Output = NewHomepageSlide;

    fn into_output(self) -> Result<NewHomepageSlide, ValidationError> {
        let sort_order = self
            .sort_order
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| ValidationError("Sort order must be a non-negative integer".to_owned()))?;

        Ok(NewHomepageSlide {
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            button_text: self.button_text,
            button_link: self.button_link,
            image_url: self.image_url,
            sort_order,
            is_active: self.is_active,
        })
    }
}

/// Body of the address create/update endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressPayload {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Address line 1 is required"))]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Form for AddressPayload {
    const FIELDS: &'static [&'static str] =
        &["full_name", "phone", "line1", "city", "postal_code", "country"];

    type Output = NewAddress;

    fn into_output(self) -> Result<NewAddress, ValidationError> {
        Ok(NewAddress {
            label: blank_to_none(self.label),
            full_name: self.full_name,
            phone: blank_to_none(self.phone),
            line1: self.line1,
            line2: blank_to_none(self.line2),
            city: self.city,
            state: blank_to_none(self.state),
            postal_code: self.postal_code,
            country: self.country,
            is_default: self.is_default,
        })
    }
}

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Subject is too long"))]
    pub subject: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

impl Form for ContactPayload {
    const FIELDS: &'static [&'static str] = &["name", "email", "subject", "message"];

    type Output = NewContactMessage;

    fn into_output(self) -> Result<NewContactMessage, ValidationError> {
        let email = Email::parse(&self.email)
            .map_err(|_| ValidationError("Email must be a valid email address".to_owned()))?;

        Ok(NewContactMessage {
            name: self.name,
            email,
            subject: blank_to_none(self.subject),
            message: self.message,
        })
    }
}

/// Body of `PATCH /api/me`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfilePayload {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 120,
        message = "Full name must be between 1 and 120 characters"
    ))]
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

impl Form for ProfilePayload {
    const FIELDS: &'static [&'static str] = &["full_name", "phone", "avatar_url"];

    type Output = ProfileChanges;

    fn into_output(self) -> Result<ProfileChanges, ValidationError> {
        Ok(ProfileChanges {
            full_name: self.full_name,
            phone: self.phone,
            avatar_url: self.avatar_url,
        })
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterPayload {
    #[serde(default)]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 120, message = "Full name is too long"))]
    pub full_name: Option<String>,
}

/// Credentials accepted by registration, ready for the auth service.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl Form for RegisterPayload {
    const FIELDS: &'static [&'static str] = &["email", "password", "full_name"];

    type Output = Registration;

    fn into_output(self) -> Result<Registration, ValidationError> {
        Ok(Registration {
            email: self.email,
            password: self.password,
            full_name: blank_to_none(self.full_name),
        })
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Form for LoginPayload {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    type Output = Self;

    fn into_output(self) -> Result<Self, ValidationError> {
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn slide(body: serde_json::Value) -> Result<NewHomepageSlide, ValidationError> {
        serde_json::from_value::<SlidePayload>(body).unwrap().check()
    }

    fn full_slide() -> serde_json::Value {
        json!({
            "title": "Autumn Edit",
            "subtitle": "New season",
            "description": "Layers for every day",
            "button_text": "Shop now",
            "button_link": "/collections/autumn",
            "image_url": "https://cdn.fitova.shop/slides/autumn.jpg",
            "sort_order": 2
        })
    }

    #[test]
    fn test_valid_slide_defaults_active() {
        let slide = slide(full_slide()).unwrap();
        assert_eq!(slide.sort_order, 2);
        assert!(slide.is_active);
    }

    #[test]
    fn test_missing_button_link_named() {
        let mut body = full_slide();
        body.as_object_mut().unwrap().remove("button_link");

        assert_eq!(slide(body).unwrap_err().0, "Button link is required");
    }

    #[test]
    fn test_first_violation_follows_field_order() {
        let body = json!({ "image_url": "not a url", "sort_order": -1 });
        assert_eq!(slide(body).unwrap_err().0, "Title is required");

        let mut body = full_slide();
        body["image_url"] = json!("not a url");
        body["sort_order"] = json!(-1);
        assert_eq!(slide(body).unwrap_err().0, "Image URL must be a valid URL");
    }

    #[test]
    fn test_sort_order_must_be_non_negative_integer() {
        for bad in [json!(-1), json!(1.5), json!("3"), json!(null)] {
            let mut body = full_slide();
            body["sort_order"] = bad;
            assert_eq!(
                slide(body).unwrap_err().0,
                "Sort order must be a non-negative integer"
            );
        }

        let mut body = full_slide();
        body["sort_order"] = json!(0);
        assert_eq!(slide(body).unwrap().sort_order, 0);
    }

    #[test]
    fn test_explicit_inactive_slide() {
        let mut body = full_slide();
        body["is_active"] = json!(false);
        assert!(!slide(body).unwrap().is_active);
    }

    #[test]
    fn test_address_requires_city() {
        let payload: AddressPayload = serde_json::from_value(json!({
            "full_name": "Nour Adel",
            "line1": "12 Nile St",
            "postal_code": "11511",
            "country": "EG",
            "line2": "  "
        }))
        .unwrap();

        assert_eq!(payload.check().unwrap_err().0, "City is required");
    }

    #[test]
    fn test_address_blank_optionals_dropped() {
        let payload: AddressPayload = serde_json::from_value(json!({
            "full_name": "Nour Adel",
            "line1": "12 Nile St",
            "line2": "  ",
            "city": "Cairo",
            "postal_code": "11511",
            "country": "EG"
        }))
        .unwrap();

        let address = payload.check().unwrap();
        assert_eq!(address.line2, None);
        assert!(!address.is_default);
    }

    #[test]
    fn test_contact_email_normalized() {
        let payload: ContactPayload = serde_json::from_value(json!({
            "name": "Salma",
            "email": "Salma@Example.com",
            "message": "Where is my order?"
        }))
        .unwrap();

        let message = payload.check().unwrap();
        assert_eq!(message.email.as_str(), "salma@example.com");
    }

    #[test]
    fn test_contact_bad_email() {
        let payload: ContactPayload = serde_json::from_value(json!({
            "name": "Salma",
            "email": "salma",
            "message": "Hi"
        }))
        .unwrap();

        assert_eq!(
            payload.check().unwrap_err().0,
            "Email must be a valid email address"
        );
    }

    #[test]
    fn test_profile_avatar_must_be_url() {
        let payload = ProfilePayload {
            avatar_url: Some("avatar.png".to_owned()),
            ..ProfilePayload::default()
        };
        assert_eq!(
            payload.check().unwrap_err().0,
            "Avatar URL must be a valid URL"
        );
    }

    #[test]
    fn test_register_short_password() {
        let payload: RegisterPayload = serde_json::from_value(json!({
            "email": "new@fitova.shop",
            "password": "short"
        }))
        .unwrap();

        assert_eq!(
            payload.check().unwrap_err().0,
            "Password must be at least 8 characters"
        );
    }
}
