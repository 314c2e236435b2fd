//! Interaction Loop
//!
//! A small state machine driven by the main menu:
//!
//! ```text
//! MainMenu ──View(kind)──▶ Viewing(kind) ──▶ MainMenu
//!          ──Add(kind)───▶ Adding(kind)  ──▶ MainMenu
//!          ──Quit────────▶ Quitting (terminal)
//! ```
//!
//! A failed view or add is logged and control goes back to the menu; only
//! `Quit`, or a closed input stream, ends the loop. Quitting closes the store.

use std::fmt;
use std::io::Write;

use crate::error::{Result, RosterError};
use crate::model::{NewEmployee, NewRole};
use crate::output::render_table;
use crate::prompt::Prompter;
use crate::repository::Repository;
use crate::selection::{department_choices, manager_choices, role_choices, Choice};
use crate::store::DataStore;

/// The entity a view or add action works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Department,
    Role,
    Employee,
}

/// Main menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View(EntityKind),
    Add(EntityKind),
    Quit,
}

impl Action {
    /// Menu entries in display order
    pub const MENU: [Self; 7] = [
        Self::View(EntityKind::Department),
        Self::View(EntityKind::Role),
        Self::View(EntityKind::Employee),
        Self::Add(EntityKind::Department),
        Self::Add(EntityKind::Role),
        Self::Add(EntityKind::Employee),
        Self::Quit,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::View(EntityKind::Department) => "View All Departments",
            Self::View(EntityKind::Role) => "View All Roles",
            Self::View(EntityKind::Employee) => "View All Employees",
            Self::Add(EntityKind::Department) => "Add a Department",
            Self::Add(EntityKind::Role) => "Add a Role",
            Self::Add(EntityKind::Employee) => "Add an Employee",
            Self::Quit => "Quit",
        }
    }

    /// The main menu as prompt choices
    #[must_use]
    pub fn menu_choices() -> Vec<Choice<Self>> {
        Self::MENU.iter().map(|action| Choice::new(action.label(), *action)).collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    MainMenu,
    Viewing(EntityKind),
    Adding(EntityKind),
    Quitting,
}

impl From<Action> for State {
    fn from(action: Action) -> Self {
        match action {
            Action::View(kind) => Self::Viewing(kind),
            Action::Add(kind) => Self::Adding(kind),
            Action::Quit => Self::Quitting,
        }
    }
}

pub const MAIN_MENU_PROMPT: &str = "What would you like to do?";

/// The interactive application: a repository, a prompter and an output sink
pub struct App<S, P, W> {
    repo: Repository<S>,
    prompter: P,
    out: W,
}

impl<S, P, W> App<S, P, W>
where
    S: DataStore,
    P: Prompter,
    W: Write,
{
    pub const fn new(repo: Repository<S>, prompter: P, out: W) -> Self {
        Self { repo, prompter, out }
    }

    pub const fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    /// Run until the user quits, then release the store
    pub async fn run(mut self) -> Result<()> {
        let mut state = State::MainMenu;
        while state != State::Quitting {
            state = self.step(state).await;
        }
        self.shutdown().await
    }

    /// Perform one state's work and return the next state
    ///
    /// `Quitting` is terminal and maps to itself; [`App::run`] handles it.
    pub async fn step(&mut self, state: State) -> State {
        match state {
            State::MainMenu => self.main_menu(),
            State::Viewing(kind) => {
                let result = self.view(kind).await;
                self.finish(Action::View(kind), result);
                State::MainMenu
            }
            State::Adding(kind) => {
                let result = self.add(kind).await;
                self.finish(Action::Add(kind), result);
                State::MainMenu
            }
            State::Quitting => State::Quitting,
        }
    }

    fn main_menu(&mut self) -> State {
        match self.prompter.select(MAIN_MENU_PROMPT, &Action::menu_choices()) {
            Ok(action) => {
                tracing::debug!(%action, "menu selection");
                State::from(action)
            }
            Err(RosterError::InputClosed) => {
                tracing::debug!("input closed at main menu");
                State::Quitting
            }
            Err(e) => {
                tracing::error!(code = e.error_code(), error = %e, "Error occurred during prompt");
                State::MainMenu
            }
        }
    }

    /// Log a failed action; a closed input stream is not worth an error line
    fn finish(&self, action: Action, result: Result<()>) {
        match result {
            Ok(()) => {}
            Err(RosterError::InputClosed) => {
                tracing::debug!(%action, "input closed during action");
            }
            Err(e) => {
                tracing::error!(%action, code = e.error_code(), error = %e, "action failed");
            }
        }
    }

    async fn view(&mut self, kind: EntityKind) -> Result<()> {
        let table = match kind {
            EntityKind::Department => render_table(&self.repo.list_departments().await?),
            EntityKind::Role => render_table(&self.repo.list_roles().await?),
            EntityKind::Employee => render_table(&self.repo.list_employees().await?),
        };
        writeln!(self.out, "{table}")?;
        Ok(())
    }

    async fn add(&mut self, kind: EntityKind) -> Result<()> {
        let added = match kind {
            EntityKind::Department => self.add_department().await?,
            EntityKind::Role => self.add_role().await?,
            EntityKind::Employee => self.add_employee().await?,
        };
        writeln!(self.out, "Added {added} to the database")?;
        Ok(())
    }

    async fn add_department(&mut self) -> Result<String> {
        let name = self.prompter.input("Enter the name of the department:")?;
        self.repo.add_department(&name).await?;
        Ok(name)
    }

    async fn add_role(&mut self) -> Result<String> {
        let departments = department_choices(&self.repo.list_departments().await?);
        if departments.is_empty() {
            return Err(RosterError::invalid_input("No departments exist; add a department first"));
        }

        let title = self.prompter.input("Enter the title of the role:")?;
        let salary = self.prompter.input("Enter the salary of the role:")?;
        let department_id =
            self.prompter.select("Select the department that the role belongs to:", &departments)?;

        self.repo.add_role(&NewRole { title: title.clone(), salary, department_id }).await?;
        Ok(title)
    }

    async fn add_employee(&mut self) -> Result<String> {
        let roles = role_choices(&self.repo.list_roles().await?);
        if roles.is_empty() {
            return Err(RosterError::invalid_input("No roles exist; add a role first"));
        }
        let managers = manager_choices(&self.repo.list_employees().await?);

        let first_name = self.prompter.input("Enter the first name of the employee:")?;
        let last_name = self.prompter.input("Enter the last name of the employee:")?;
        let role_id = self.prompter.select("Select the role of the employee:", &roles)?;
        let manager_id = self.prompter.select("Select the manager of the employee:", &managers)?;

        let employee = NewEmployee { first_name, last_name, role_id, manager_id };
        self.repo.add_employee(&employee).await?;
        Ok(employee.full_name())
    }

    async fn shutdown(mut self) -> Result<()> {
        if let Err(e) = self.repo.close().await {
            tracing::error!(code = e.error_code(), error = %e, "Error disconnecting from database");
        }
        writeln!(self.out, "Disconnected from database.")?;
        Ok(())
    }
}
