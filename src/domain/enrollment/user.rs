//! User entity.
//!
//! Profile fields are owned by the identity-sync flow; the enrollment core
//! only mutates `enrolled_courses`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, UserId};

/// A platform user, mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider id (opaque).
    pub id: UserId,

    /// Primary email address.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Avatar URL from the identity provider.
    pub image_url: Option<String>,

    /// Courses this user is enrolled in. Set semantics: no duplicates.
    pub enrolled_courses: Vec<CourseId>,

    /// When the user record was created.
    pub created_at: DateTime<Utc>,

    /// When the user record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the user is enrolled in the given course.
    pub fn is_enrolled_in(&self, course_id: &CourseId) -> bool {
        self.enrolled_courses.contains(course_id)
    }

    /// Add a course to the enrollment list if absent.
    ///
    /// Returns true if the list changed.
    pub fn enroll(&mut self, course_id: CourseId) -> bool {
        if self.is_enrolled_in(&course_id) {
            return false;
        }
        self.enrolled_courses.push(course_id);
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
pub fn test_user(id: &str) -> User {
    User {
        id: UserId::new(id).unwrap(),
        email: format!("{}@example.com", id),
        name: "Test User".to_string(),
        image_url: None,
        enrolled_courses: Vec::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
