//! Shared helpers for the integration tests: an in-memory store with the
//! schema applied and a prompter that replays canned answers.

#![allow(dead_code)]

use std::collections::VecDeque;

use roster::repository::schema;
use roster::store::sqlite::SqliteStore;
use roster::{Choice, Prompter, Repository, Result, RosterError};

/// A canned answer for the next prompt
#[derive(Debug, Clone)]
pub enum Answer {
    /// Reply to an `input` prompt
    Text(String),
    /// Pick the choice with this label at a `select` prompt
    Pick(String),
}

pub fn text(value: &str) -> Answer {
    Answer::Text(value.to_string())
}

pub fn pick(label: &str) -> Answer {
    Answer::Pick(label.to_string())
}

/// Replays answers in order; once they run out every prompt sees a closed input
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    /// Prompt messages in the order they were asked
    pub asked: Vec<String>,
    /// Labels offered by each `select`, in order
    pub offered: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self { answers: answers.into_iter().collect(), ..Default::default() }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for &mut ScriptedPrompter {
    fn input(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        match self.answers.pop_front() {
            Some(Answer::Text(value)) => Ok(value),
            Some(other) => panic!("expected a text answer for {message:?}, script has {other:?}"),
            None => Err(RosterError::InputClosed),
        }
    }

    fn select<T: Clone>(&mut self, message: &str, choices: &[Choice<T>]) -> Result<T> {
        self.asked.push(message.to_string());
        self.offered.push(choices.iter().map(|c| c.label.clone()).collect());
        match self.answers.pop_front() {
            Some(Answer::Pick(label)) => choices
                .iter()
                .find(|c| c.label == label)
                .map(|c| c.value.clone())
                .ok_or_else(|| RosterError::invalid_input(format!("no choice labelled {label:?}"))),
            Some(other) => panic!("expected a pick for {message:?}, script has {other:?}"),
            None => Err(RosterError::InputClosed),
        }
    }
}

/// A repository over a fresh in-memory database with the tables created
pub async fn empty_repository() -> Repository<SqliteStore> {
    let store = SqliteStore::open_in_memory().expect("open in-memory database");
    schema::apply(&store).await.expect("apply schema");
    Repository::new(store)
}
