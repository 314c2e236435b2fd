//! Repository
//!
//! Named operations over the department/role/employee schema. Each operation
//! is a thin wrapper around one fixed query shape executed through the
//! injected [`DataStore`]; all user-supplied values travel as bound
//! parameters.
//!
//! The queries are written in the SQL subset shared by `PostgreSQL` and
//! `SQLite`: `$N` placeholders, `||` concatenation, and `CAST` to read salary
//! as a float. Only the role insert differs per engine.

use crate::error::Result;
use crate::model::{Department, EmployeeView, NewEmployee, NewRole, RoleView};
use crate::store::{DataStore, DatabaseType, SqlParam};

pub mod schema;

const LIST_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY id";

// Inner join: a role whose department is missing is left out of the listing.
const LIST_ROLES: &str = "
    SELECT role.id,
           role.title,
           department.name AS department,
           CAST(role.salary AS DOUBLE PRECISION) AS salary
    FROM role
    JOIN department ON role.department_id = department.id
    ORDER BY role.id";

// `m` is the manager's employee row; the left join keeps employees without one.
const LIST_EMPLOYEES: &str = "
    SELECT e.id,
           e.first_name,
           e.last_name,
           role.title,
           department.name AS department,
           CAST(role.salary AS DOUBLE PRECISION) AS salary,
           CASE WHEN m.id IS NULL THEN NULL
                ELSE m.first_name || ' ' || m.last_name
           END AS manager
    FROM employee e
    JOIN role ON e.role_id = role.id
    JOIN department ON role.department_id = department.id
    LEFT JOIN employee m ON e.manager_id = m.id
    ORDER BY e.id";

const INSERT_DEPARTMENT: &str = "INSERT INTO department (name) VALUES ($1)";

// Salary is bound as TEXT. Postgres converts it with the cast and rejects
// malformed text; SQLite's column affinity converts well-formed numbers and
// the table's CHECK rejects whatever stays text.
const INSERT_ROLE_POSTGRES: &str =
    "INSERT INTO role (title, salary, department_id) VALUES ($1, CAST($2 AS DECIMAL), $3)";

const INSERT_ROLE_SQLITE: &str =
    "INSERT INTO role (title, salary, department_id) VALUES ($1, $2, $3)";

const INSERT_EMPLOYEE: &str =
    "INSERT INTO employee (first_name, last_name, role_id, manager_id) VALUES ($1, $2, $3, $4)";

/// Data access for departments, roles and employees
pub struct Repository<S> {
    store: S,
}

impl<S: DataStore> Repository<S> {
    /// Wrap an already connected store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// All departments, by ascending id
    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        self.store.execute(LIST_DEPARTMENTS, &[]).await?.decode()
    }

    /// All roles with their department name, by ascending id
    pub async fn list_roles(&self) -> Result<Vec<RoleView>> {
        self.store.execute(LIST_ROLES, &[]).await?.decode()
    }

    /// All employees with title, department, salary and manager name
    pub async fn list_employees(&self) -> Result<Vec<EmployeeView>> {
        self.store.execute(LIST_EMPLOYEES, &[]).await?.decode()
    }

    pub async fn add_department(&self, name: &str) -> Result<()> {
        self.store.execute(INSERT_DEPARTMENT, &[SqlParam::from(name)]).await?;
        tracing::debug!(name, "inserted department");
        Ok(())
    }

    pub async fn add_role(&self, role: &NewRole) -> Result<()> {
        let params = [
            SqlParam::from(role.title.as_str()),
            SqlParam::from(role.salary.as_str()),
            SqlParam::from(role.department_id),
        ];
        let query = match self.store.engine() {
            DatabaseType::Postgres => INSERT_ROLE_POSTGRES,
            DatabaseType::SQLite => INSERT_ROLE_SQLITE,
        };
        self.store.execute(query, &params).await?;
        tracing::debug!(title = %role.title, department_id = role.department_id, "inserted role");
        Ok(())
    }

    pub async fn add_employee(&self, employee: &NewEmployee) -> Result<()> {
        let params = [
            SqlParam::from(employee.first_name.as_str()),
            SqlParam::from(employee.last_name.as_str()),
            SqlParam::from(employee.role_id),
            SqlParam::from(employee.manager_id),
        ];
        self.store.execute(INSERT_EMPLOYEE, &params).await?;
        tracing::debug!(
            role_id = employee.role_id,
            manager_id = ?employee.manager_id,
            "inserted employee"
        );
        Ok(())
    }

    /// Release the store's connection
    pub async fn close(self) -> Result<()> {
        self.store.close().await
    }
}
