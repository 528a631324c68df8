//! Todo Store
//!
//! Recurring and one-off task items, independent of XP. Recurrence and
//! last-completed-day are stored but never evaluated here; rollover is an
//! external responsibility.

use crate::persist::StateFile;
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoCategory {
    Morning,
    General,
    Evening,
}

impl TodoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoCategory::Morning => "morning",
            TodoCategory::General => "general",
            TodoCategory::Evening => "evening",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "morning" => TodoCategory::Morning,
            "evening" => TodoCategory::Evening,
            _ => TodoCategory::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "daily" => Recurrence::Daily,
            "weekly" => Recurrence::Weekly,
            "monthly" => Recurrence::Monthly,
            _ => Recurrence::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub category: TodoCategory,
    pub user_id: String,
    pub completed: bool,
    pub recurrence: Recurrence,
    pub last_completed_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub category: TodoCategory,
    pub user_id: String,
    pub recurrence: Recurrence,
}

/// Editable subset of a todo.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub category: Option<TodoCategory>,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TodoState {
    todos: Vec<Todo>,
}

/// In-memory todo store persisted under the `todos` namespace.
pub struct TodoStore {
    state: TodoState,
    file: StateFile,
}

impl TodoStore {
    pub fn open(dir: &Path) -> Result<Self> {
        let file = StateFile::open(dir, "todos")?;
        let state = file.load();
        Ok(Self { state, file })
    }

    fn dirty(&self) {
        self.file.save(&self.state);
    }

    pub fn add_todo(&mut self, new: NewTodo) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            category: new.category,
            user_id: new.user_id,
            completed: false,
            recurrence: new.recurrence,
            last_completed_date: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.state.todos.push(todo.clone());
        self.dirty();
        todo
    }

    /// Merge a patch into the matching todo. Unknown ids are a silent
    /// no-op.
    pub fn update_todo(&mut self, id: &str, patch: TodoPatch) {
        let Some(todo) = self.state.todos.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(category) = patch.category {
            todo.category = category;
        }
        if let Some(recurrence) = patch.recurrence {
            todo.recurrence = recurrence;
        }
        self.dirty();
    }

    pub fn delete_todo(&mut self, id: &str) {
        let before = self.state.todos.len();
        self.state.todos.retain(|t| t.id != id);
        if self.state.todos.len() != before {
            self.dirty();
        }
    }

    /// Flip completion. Completing stamps `completed_at` and the
    /// last-completed calendar day; un-completing clears only
    /// `completed_at` (the day stays behind for recurrence consumers).
    pub fn toggle_todo(&mut self, id: &str) {
        let Some(todo) = self.state.todos.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if todo.completed {
            todo.completed = false;
            todo.completed_at = None;
        } else {
            todo.completed = true;
            todo.completed_at = Some(Utc::now());
            todo.last_completed_date = Some(Local::now().date_naive());
        }
        self.dirty();
    }

    /// Todos owned by `user`, newest-created first.
    pub fn todos_for_user(&self, user: &str) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self
            .state
            .todos
            .iter()
            .filter(|t| t.user_id == user)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        todos
    }

    pub fn todo(&self, id: &str) -> Option<Todo> {
        self.state.todos.iter().find(|t| t.id == id).cloned()
    }
}
