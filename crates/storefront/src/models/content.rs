//! Marketing content: testimonials, homepage slides and contact messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fitova_core::{ContactMessageId, Email, HomepageSlideId, TestimonialId};

/// A customer testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub rating: i16,
    pub avatar_url: Option<String>,
    pub is_visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A hero carousel slide on the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HomepageSlide {
    pub id: HomepageSlideId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    pub image_url: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new homepage slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHomepageSlide {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    pub image_url: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: Email,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a new contact message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: Option<String>,
    pub message: String,
}
