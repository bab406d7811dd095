//! Contact-form submissions.
//!
//! # Responsibilities
//! - Validate incoming form fields
//! - Queue accepted submissions for moderation, up to a fixed capacity
//! - Hand queued submissions to moderation tooling, removing them
//!
//! Submissions live in memory only. Once the queue is full new submissions
//! are refused until moderation drains it.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::locale::Locale;

const NAME_MAX: usize = 100;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 5000;

/// Raw form body.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub locale: Option<Locale>,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("invalid contact form: {} field(s) rejected", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("contact queue is full ({capacity} submissions)")]
    QueueFull { capacity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
}

/// A validated, queued submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub locale: Locale,
    pub received_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
            .unwrap_or(false)
        && !email.chars().any(char::is_whitespace)
}

impl ContactForm {
    /// Trim fields and check them, collecting every problem.
    pub fn validate(self, fallback_locale: Locale) -> Result<ContactSubmission, ContactError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let message = self.message.trim().to_string();
        let subject = self
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut errors = Vec::new();
        let name_len = name.chars().count();
        if name_len == 0 || name_len > NAME_MAX {
            errors.push(FieldError { field: "name", message: "must be 1 to 100 characters" });
        }
        if !is_plausible_email(&email) {
            errors.push(FieldError { field: "email", message: "must be a valid email address" });
        }
        if subject.as_ref().is_some_and(|s| s.chars().count() > SUBJECT_MAX) {
            errors.push(FieldError { field: "subject", message: "must be at most 200 characters" });
        }
        let message_len = message.chars().count();
        if !(MESSAGE_MIN..=MESSAGE_MAX).contains(&message_len) {
            errors.push(FieldError { field: "message", message: "must be 10 to 5000 characters" });
        }

        if !errors.is_empty() {
            return Err(ContactError::Invalid(errors));
        }

        Ok(ContactSubmission {
            id: Uuid::new_v4(),
            name,
            email,
            subject,
            message,
            locale: self.locale.unwrap_or(fallback_locale),
            received_at: Utc::now(),
            status: SubmissionStatus::Pending,
        })
    }
}

/// Thread-safe, bounded moderation queue.
#[derive(Debug, Clone)]
pub struct ContactStore {
    inner: Arc<DashMap<Uuid, ContactSubmission>>,
    // Slots claimed by inserts; never exceeds `capacity`.
    occupied: Arc<AtomicUsize>,
    capacity: usize,
}

impl ContactStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            occupied: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue `submission`, or refuse it when the queue is full.
    pub fn insert(&self, submission: ContactSubmission) -> Result<Uuid, ContactError> {
        let capacity = self.capacity;
        self.occupied
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < capacity).then_some(n + 1))
            .map_err(|_| ContactError::QueueFull { capacity })?;

        let id = submission.id;
        self.inner.insert(id, submission);
        Ok(id)
    }

    pub fn get(&self, id: &Uuid) -> Option<ContactSubmission> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    /// Pending submissions, oldest first.
    pub fn pending(&self) -> Vec<ContactSubmission> {
        let mut pending: Vec<_> = self
            .inner
            .iter()
            .filter(|r| r.value().status == SubmissionStatus::Pending)
            .map(|r| r.value().clone())
            .collect();
        pending.sort_by_key(|s| s.received_at);
        pending
    }

    /// Remove and return up to `limit` pending submissions, oldest first.
    pub fn take_pending(&self, limit: usize) -> Vec<ContactSubmission> {
        let mut taken = Vec::new();
        for submission in self.pending().into_iter().take(limit) {
            // A concurrent take may have removed it already.
            if let Some((_, removed)) = self.inner.remove(&submission.id) {
                self.occupied.fetch_sub(1, Ordering::AcqRel);
                taken.push(removed);
            }
        }
        taken
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
