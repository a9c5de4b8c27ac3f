//! Enrollment linker.
//!
//! Maintains the bidirectional relationship between a user's enrollment list
//! and a course's roster. Presence checks run against the in-memory entities;
//! the persistence adapter re-asserts them with conditional updates so that
//! concurrent duplicate deliveries cannot double-credit an enrollment.

use super::{Course, User};

/// Link a user and a course after a completed purchase.
///
/// Adds the course to `user.enrolled_courses` only if absent and the user to
/// `course.enrolled_students` only if absent. Returns true if either side
/// changed.
pub fn link_enrollment(user: &mut User, course: &mut Course) -> bool {
    let user_changed = user.enroll(course.id.clone());
    let course_changed = course.enroll_student(user.id.clone());
    user_changed || course_changed
}
