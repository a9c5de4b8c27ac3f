//! Course entity.
//!
//! Symmetric to [`super::User`]: the roster must stay consistent with the
//! users' enrollment lists after a completed purchase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, UserId};

/// A published course with its student roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course id (opaque).
    pub id: CourseId,

    /// Course title.
    pub title: String,

    /// Students enrolled in this course. Set semantics: no duplicates.
    pub enrolled_students: Vec<UserId>,

    /// When the course record was created.
    pub created_at: DateTime<Utc>,

    /// When the course record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Returns true if the given user is on the roster.
    pub fn has_student(&self, user_id: &UserId) -> bool {
        self.enrolled_students.contains(user_id)
    }

    /// Add a user to the roster if absent.
    ///
    /// Returns true if the roster changed.
    pub fn enroll_student(&mut self, user_id: UserId) -> bool {
        if self.has_student(&user_id) {
            return false;
        }
        self.enrolled_students.push(user_id);
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
pub fn test_course(id: &str) -> Course {
    Course {
        id: CourseId::new(id).unwrap(),
        title: "Test Course".to_string(),
        enrolled_students: Vec::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enroll_student_adds_user_once() {
        let mut course = test_course("c1");
        let user = UserId::new("u1").unwrap();

        assert!(course.enroll_student(user.clone()));
        assert!(!course.enroll_student(user.clone()));

        assert_eq!(course.enrolled_students, vec![user]);
    }
}
