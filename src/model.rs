//! Entity types read from and written to the store.
//!
//! Read types are the joined display projections returned by the repository;
//! `New*` types carry the fields collected for a single-row insert.

use serde::{Deserialize, Serialize};

/// A department row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// A role joined with its department's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleView {
    pub id: i64,
    pub title: String,
    pub department: String,
    pub salary: f64,
}

/// An employee joined with role, department and manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub department: String,
    pub salary: f64,
    /// Manager's "first last", absent for employees without a manager
    #[serde(default)]
    pub manager: Option<String>,
}

impl EmployeeView {
    /// "first last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields for inserting a role
///
/// `salary` is kept as entered; the store's column type decides whether it is
/// numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub title: String,
    pub salary: String,
    pub department_id: i64,
}

/// Fields for inserting an employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    /// `None` stores a NULL manager reference
    pub manager_id: Option<i64>,
}

impl NewEmployee {
    /// "first last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
