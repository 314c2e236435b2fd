//! Selection Adapter
//!
//! Turns repository rows into label/value choice lists so the user picks a
//! referenced entity by name instead of typing its id.

use crate::model::{Department, EmployeeView, RoleView};

/// Label shown for the absent-manager choice
pub const NO_MANAGER: &str = "No manager";

/// One entry of a single-choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self { label: label.into(), value }
    }
}

/// Departments labelled by name
#[must_use]
pub fn department_choices(departments: &[Department]) -> Vec<Choice<i64>> {
    departments.iter().map(|d| Choice::new(d.name.as_str(), d.id)).collect()
}

/// Roles labelled by title
#[must_use]
pub fn role_choices(roles: &[RoleView]) -> Vec<Choice<i64>> {
    roles.iter().map(|r| Choice::new(r.title.as_str(), r.id)).collect()
}

/// Employees labelled "first last", led by the "No manager" entry
///
/// The sentinel is always first and always present, even with no employees.
#[must_use]
pub fn manager_choices(employees: &[EmployeeView]) -> Vec<Choice<Option<i64>>> {
    std::iter::once(Choice::new(NO_MANAGER, None))
        .chain(employees.iter().map(|e| Choice::new(e.full_name(), Some(e.id))))
        .collect()
}
