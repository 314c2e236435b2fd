//! Table definitions for `roster init`.
//!
//! Idempotent thanks to `CREATE TABLE IF NOT EXISTS`. Tables are created
//! parent-first so the foreign keys resolve.

use crate::error::{Result, RosterError};
use crate::model::{NewEmployee, NewRole};
use crate::repository::Repository;
use crate::store::{DataStore, DatabaseType};

const POSTGRES_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS department (
        id   SERIAL PRIMARY KEY,
        name VARCHAR(30) UNIQUE NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS role (
        id            SERIAL PRIMARY KEY,
        title         VARCHAR(30) UNIQUE NOT NULL,
        salary        DECIMAL NOT NULL,
        department_id INTEGER NOT NULL REFERENCES department(id)
    )",
    "CREATE TABLE IF NOT EXISTS employee (
        id         SERIAL PRIMARY KEY,
        first_name VARCHAR(30) NOT NULL,
        last_name  VARCHAR(30) NOT NULL,
        role_id    INTEGER NOT NULL REFERENCES role(id),
        manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
    )",
];

const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS department (
        id   INTEGER PRIMARY KEY,
        name VARCHAR(30) UNIQUE NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS role (
        id            INTEGER PRIMARY KEY,
        title         VARCHAR(30) UNIQUE NOT NULL,
        salary        DECIMAL NOT NULL CHECK (typeof(salary) IN ('integer', 'real')),
        department_id INTEGER NOT NULL REFERENCES department(id)
    )",
    "CREATE TABLE IF NOT EXISTS employee (
        id         INTEGER PRIMARY KEY,
        first_name VARCHAR(30) NOT NULL,
        last_name  VARCHAR(30) NOT NULL,
        role_id    INTEGER NOT NULL REFERENCES role(id),
        manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
    )",
];

/// DDL statements for `engine`, in creation order
#[must_use]
pub const fn statements(engine: DatabaseType) -> &'static [&'static str] {
    match engine {
        DatabaseType::Postgres => POSTGRES_SCHEMA,
        DatabaseType::SQLite => SQLITE_SCHEMA,
    }
}

/// Create the three tables if they do not exist
pub async fn apply<S: DataStore>(store: &S) -> Result<()> {
    for statement in statements(store.engine()) {
        store.execute(statement, &[]).await?;
    }
    tracing::debug!(engine = %store.engine(), "schema applied");
    Ok(())
}

/// Sample organization inserted by `roster init --seed`
pub async fn seed<S: DataStore>(repo: &Repository<S>) -> Result<()> {
    for name in ["Engineering", "Finance", "Legal", "Sales"] {
        repo.add_department(name).await?;
    }

    let departments = repo.list_departments().await?;
    let department_id = |name: &str| {
        departments
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.id)
            .ok_or_else(|| RosterError::invalid_input(format!("Seed department '{name}' not found")))
    };

    let roles = [
        ("Lead Engineer", "150000", "Engineering"),
        ("Software Engineer", "120000", "Engineering"),
        ("Account Manager", "160000", "Finance"),
        ("Legal Team Lead", "250000", "Legal"),
        ("Salesperson", "80000", "Sales"),
    ];
    for (title, salary, department) in roles {
        repo.add_role(&NewRole {
            title: title.to_string(),
            salary: salary.to_string(),
            department_id: department_id(department)?,
        })
        .await?;
    }

    let roles = repo.list_roles().await?;
    let role_id = |title: &str| {
        roles
            .iter()
            .find(|r| r.title == title)
            .map(|r| r.id)
            .ok_or_else(|| RosterError::invalid_input(format!("Seed role '{title}' not found")))
    };

    // Managers first so their ids exist when the reports are inserted
    let people = [
        ("Ada", "Lovelace", "Lead Engineer", None),
        ("Grace", "Hopper", "Software Engineer", Some("Ada Lovelace")),
        ("Katherine", "Johnson", "Account Manager", None),
        ("Ruth", "Bader", "Legal Team Lead", None),
        ("Mary", "Jackson", "Salesperson", Some("Katherine Johnson")),
    ];
    for (first_name, last_name, title, manager) in people {
        let manager_id = match manager {
            Some(full_name) => repo
                .list_employees()
                .await?
                .into_iter()
                .find(|e| e.full_name() == full_name)
                .map(|e| e.id),
            None => None,
        };

        repo.add_employee(&NewEmployee {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role_id: role_id(title)?,
            manager_id,
        })
        .await?;
    }

    tracing::debug!("seed data inserted");
    Ok(())
}
