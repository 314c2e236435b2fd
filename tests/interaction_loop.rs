//! Interaction Loop Tests
//!
//! Each test scripts the user's answers with `ScriptedPrompter` and drives
//! `App` against an in-memory database, checking the printed output, the
//! prompts offered, the rows stored and the state transitions.

#![cfg(feature = "sqlite")]

mod common;

use pretty_assertions::assert_eq;
use roster::{Action, App, DataStore, EntityKind, NewRole, State, NO_MANAGER};

use common::{empty_repository, pick, text, ScriptedPrompter};

fn printed(out: &[u8]) -> String {
    String::from_utf8(out.to_vec()).unwrap()
}

#[tokio::test]
async fn test_view_empty_departments_prints_header_only() {
    let mut prompter = ScriptedPrompter::new([]);
    let mut out = Vec::new();
    let mut app = App::new(empty_repository().await, &mut prompter, &mut out);

    let next = app.step(State::Viewing(EntityKind::Department)).await;
    assert_eq!(next, State::MainMenu);
    drop(app);

    assert_eq!(printed(&out), "id  name\n--  ----\n(0 rows)\n");
}

#[tokio::test]
async fn test_add_department_then_view() {
    let mut prompter = ScriptedPrompter::new([text("Engineering")]);
    let mut out = Vec::new();
    let mut app = App::new(empty_repository().await, &mut prompter, &mut out);

    assert_eq!(app.step(State::Adding(EntityKind::Department)).await, State::MainMenu);
    assert_eq!(app.step(State::Viewing(EntityKind::Department)).await, State::MainMenu);

    let names: Vec<String> =
        app.repository().list_departments().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Engineering".to_string()]);
    drop(app);

    let output = printed(&out);
    assert!(output.starts_with("Added Engineering to the database\n"));
    assert!(output.contains("1   Engineering"));
    assert_eq!(prompter.asked, vec!["Enter the name of the department:".to_string()]);
}

#[tokio::test]
async fn test_add_role_offers_departments_by_name() {
    let repo = empty_repository().await;
    repo.add_department("Engineering").await.unwrap();
    repo.add_department("Finance").await.unwrap();

    let mut prompter =
        ScriptedPrompter::new([text("Accountant"), text("70000"), pick("Finance")]);
    let mut out = Vec::new();
    let mut app = App::new(repo, &mut prompter, &mut out);

    assert_eq!(app.step(State::Adding(EntityKind::Role)).await, State::MainMenu);

    let roles = app.repository().list_roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].title, "Accountant");
    assert_eq!(roles[0].department, "Finance");
    assert_eq!(roles[0].salary, 70000.0);
    drop(app);

    assert_eq!(printed(&out), "Added Accountant to the database\n");
    assert_eq!(
        prompter.offered,
        vec![vec!["Engineering".to_string(), "Finance".to_string()]]
    );
}

#[tokio::test]
async fn test_add_employee_offers_sentinel_first_with_no_employees() {
    let repo = empty_repository().await;
    repo.add_department("Engineering").await.unwrap();
    repo.add_role(&NewRole {
        title: "Engineer".to_string(),
        salary: "90000".to_string(),
        department_id: 1,
    })
    .await
    .unwrap();

    let mut prompter = ScriptedPrompter::new([
        text("Ada"),
        text("Lovelace"),
        pick("Engineer"),
        pick(NO_MANAGER),
    ]);
    let mut out = Vec::new();
    let mut app = App::new(repo, &mut prompter, &mut out);

    assert_eq!(app.step(State::Adding(EntityKind::Employee)).await, State::MainMenu);

    let employees = app.repository().list_employees().await.unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].manager, None);
    drop(app);

    assert_eq!(printed(&out), "Added Ada Lovelace to the database\n");
    assert_eq!(prompter.offered[1], vec![NO_MANAGER.to_string()]);
    assert_eq!(
        prompter.asked,
        vec![
            "Enter the first name of the employee:".to_string(),
            "Enter the last name of the employee:".to_string(),
            "Select the role of the employee:".to_string(),
            "Select the manager of the employee:".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_add_employee_with_manager() {
    let repo = empty_repository().await;
    roster::repository::schema::seed(&repo).await.unwrap();

    let mut prompter = ScriptedPrompter::new([
        text("Annie"),
        text("Easley"),
        pick("Software Engineer"),
        pick("Grace Hopper"),
    ]);
    let mut out = Vec::new();
    let mut app = App::new(repo, &mut prompter, &mut out);

    app.step(State::Adding(EntityKind::Employee)).await;

    let employees = app.repository().list_employees().await.unwrap();
    let annie = employees.last().unwrap();
    assert_eq!(annie.full_name(), "Annie Easley");
    assert_eq!(annie.manager.as_deref(), Some("Grace Hopper"));
    drop(app);

    assert_eq!(prompter.offered[1].first().map(String::as_str), Some(NO_MANAGER));
    assert_eq!(prompter.offered[1].len(), 6);
}

#[tokio::test]
async fn test_failed_insert_returns_to_menu_without_changes() {
    let repo = empty_repository().await;
    repo.add_department("Engineering").await.unwrap();

    // Department names are unique
    let mut prompter = ScriptedPrompter::new([text("Engineering")]);
    let mut out = Vec::new();
    let mut app = App::new(repo, &mut prompter, &mut out);

    assert_eq!(app.step(State::Adding(EntityKind::Department)).await, State::MainMenu);
    assert_eq!(app.repository().list_departments().await.unwrap().len(), 1);
    drop(app);

    assert_eq!(printed(&out), "");
}

#[tokio::test]
async fn test_failed_view_returns_to_menu_without_output() {
    let repo = empty_repository().await;
    repo.store().execute("DROP TABLE employee", &[]).await.unwrap();

    let mut prompter = ScriptedPrompter::new([]);
    let mut out = Vec::new();
    let mut app = App::new(repo, &mut prompter, &mut out);

    assert_eq!(app.step(State::Viewing(EntityKind::Employee)).await, State::MainMenu);
    drop(app);

    assert_eq!(printed(&out), "");
}

#[tokio::test]
async fn test_menu_prompt_failure_keeps_loop_running() {
    let mut prompter = ScriptedPrompter::new([pick("Fire Everyone")]);
    let mut out = Vec::new();
    let mut app = App::new(empty_repository().await, &mut prompter, &mut out);

    assert_eq!(app.step(State::MainMenu).await, State::MainMenu);
    drop(app);

    assert_eq!(prompter.remaining(), 0);
    assert_eq!(printed(&out), "");
}

#[tokio::test]
async fn test_malformed_salary_is_not_added() {
    let repo = empty_repository().await;
    repo.add_department("Finance").await.unwrap();

    let mut prompter =
        ScriptedPrompter::new([text("Accountant"), text("90,000"), pick("Finance")]);
    let mut out = Vec::new();
    let mut app = App::new(repo, &mut prompter, &mut out);

    assert_eq!(app.step(State::Adding(EntityKind::Role)).await, State::MainMenu);
    assert!(app.repository().list_roles().await.unwrap().is_empty());
    drop(app);

    assert_eq!(printed(&out), "");
}

#[tokio::test]
async fn test_add_role_without_departments_is_aborted() {
    let mut prompter = ScriptedPrompter::new([text("Engineer")]);
    let mut out = Vec::new();
    let mut app = App::new(empty_repository().await, &mut prompter, &mut out);

    assert_eq!(app.step(State::Adding(EntityKind::Role)).await, State::MainMenu);
    assert!(app.repository().list_roles().await.unwrap().is_empty());
    drop(app);

    // Nothing was asked, so the scripted answer is still queued
    assert!(prompter.asked.is_empty());
    assert_eq!(prompter.remaining(), 1);
}

#[tokio::test]
async fn test_menu_selection_moves_to_action_state() {
    let mut prompter = ScriptedPrompter::new([pick("View All Roles")]);
    let mut out = Vec::new();
    let mut app = App::new(empty_repository().await, &mut prompter, &mut out);

    assert_eq!(app.step(State::MainMenu).await, State::Viewing(EntityKind::Role));
    drop(app);

    let labels: Vec<&str> = Action::MENU.iter().map(|a| a.label()).collect();
    assert_eq!(prompter.offered[0], labels);
}

#[tokio::test]
async fn test_run_until_quit_disconnects() {
    let mut prompter = ScriptedPrompter::new([
        pick("Add a Department"),
        text("Legal"),
        pick("View All Departments"),
        pick("Quit"),
    ]);
    let mut out = Vec::new();
    let app = App::new(empty_repository().await, &mut prompter, &mut out);

    app.run().await.unwrap();

    let output = printed(&out);
    assert!(output.starts_with("Added Legal to the database\n"));
    assert!(output.contains("1   Legal\n(1 row)\n"));
    assert!(output.ends_with("Disconnected from database.\n"));
    assert_eq!(prompter.remaining(), 0);
}

#[tokio::test]
async fn test_closed_input_at_menu_quits() {
    let mut prompter = ScriptedPrompter::new([]);
    let mut out = Vec::new();
    let app = App::new(empty_repository().await, &mut prompter, &mut out);

    app.run().await.unwrap();

    assert_eq!(printed(&out), "Disconnected from database.\n");
}

#[tokio::test]
async fn test_quitting_is_terminal() {
    let mut prompter = ScriptedPrompter::new([]);
    let mut out = Vec::new();
    let mut app = App::new(empty_repository().await, &mut prompter, &mut out);

    assert_eq!(app.step(State::Quitting).await, State::Quitting);
}
