use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// The provider's marker for students in the `businessCategory` attribute.
pub const STUDENT_MARKER: &str = "ELEVE";

/// Whether a user is a student or staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "business_category")]
pub enum BusinessCategory {
    #[postgres(name = "STUDENT")]
    Student,
    #[postgres(name = "TEACHER")]
    Teacher,
}

impl BusinessCategory {
    /// Classifies the provider's `businessCategory` attribute.
    ///
    /// Only the literal student marker maps to `Student`; every other value,
    /// including unknown ones, maps to `Teacher`.
    pub fn from_provider(value: &str) -> Self {
        if value == STUDENT_MARKER {
            BusinessCategory::Student
        } else {
            BusinessCategory::Teacher
        }
    }
}

/// Represents a user in the system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The user's email address, the identity key.
    pub email: String,
    /// The user's full name.
    pub full_name: String,
    pub department_number: String,
    pub business_category: BusinessCategory,
    /// Whether the user may use admin routes.
    pub is_admin: bool,
}

/// The attributes needed to insert or match a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub department_number: String,
    pub business_category: BusinessCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleve_is_a_student() {
        assert_eq!(BusinessCategory::from_provider("ELEVE"), BusinessCategory::Student);
    }

    #[test]
    fn everything_else_is_a_teacher() {
        assert_eq!(BusinessCategory::from_provider("PROF"), BusinessCategory::Teacher);
        assert_eq!(BusinessCategory::from_provider("eleve"), BusinessCategory::Teacher);
        assert_eq!(BusinessCategory::from_provider("PERSONNEL"), BusinessCategory::Teacher);
    }
}
