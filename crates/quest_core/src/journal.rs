//! Journal Store
//!
//! Free-text dated entries plus reusable writing prompts. Prompts are
//! append-only reference data.
//!
//! Same-day uniqueness is not enforced on insert; `entry_by_date` returns
//! the first match when duplicates coexist. That lookup ambiguity is
//! deliberate and pinned down in the tests rather than tightened.

use crate::persist::StateFile;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    /// 1-5 scale; not validated by the store.
    pub mood: Option<u8>,
    pub tags: Vec<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on every update.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub mood: Option<u8>,
    pub tags: Vec<String>,
    pub user_id: String,
}

/// Editable subset of an entry.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<Option<u8>>,
    pub tags: Option<Vec<String>>,
}

/// Reusable writing prompt. No lifecycle beyond creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalPrompt {
    pub id: String,
    pub text: String,
    pub category: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub text: String,
    pub category: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct JournalState {
    entries: Vec<JournalEntry>,
    prompts: Vec<JournalPrompt>,
}

/// In-memory journal store persisted under the `journal` namespace.
pub struct JournalStore {
    state: JournalState,
    file: StateFile,
}

impl JournalStore {
    pub fn open(dir: &Path) -> Result<Self> {
        let file = StateFile::open(dir, "journal")?;
        let state = file.load();
        Ok(Self { state, file })
    }

    fn dirty(&self) {
        self.file.save(&self.state);
    }

    pub fn add_entry(&mut self, new: NewEntry) -> JournalEntry {
        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            date: new.date,
            title: new.title,
            content: new.content,
            mood: new.mood,
            tags: new.tags,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        self.state.entries.push(entry.clone());
        self.dirty();
        entry
    }

    /// Merge a patch into the matching entry and refresh `updated_at`.
    /// Unknown ids are a silent no-op.
    pub fn update_entry(&mut self, id: &str, patch: EntryPatch) {
        let Some(entry) = self.state.entries.iter_mut().find(|e| e.id == id) else {
            return;
        };
        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(content) = patch.content {
            entry.content = content;
        }
        if let Some(mood) = patch.mood {
            entry.mood = mood;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        entry.updated_at = Utc::now();
        self.dirty();
    }

    pub fn delete_entry(&mut self, id: &str) {
        let before = self.state.entries.len();
        self.state.entries.retain(|e| e.id != id);
        if self.state.entries.len() != before {
            self.dirty();
        }
    }

    /// Entries owned by `user`, most recent date first.
    pub fn entries_for_user(&self, user: &str) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = self
            .state
            .entries
            .iter()
            .filter(|e| e.user_id == user)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// First entry matching (user, date) in insertion order. Duplicates
    /// may coexist; later ones are not reachable through this lookup.
    pub fn entry_by_date(&self, user: &str, date: NaiveDate) -> Option<JournalEntry> {
        self.state
            .entries
            .iter()
            .find(|e| e.user_id == user && e.date == date)
            .cloned()
    }

    pub fn add_prompt(&mut self, new: NewPrompt) -> JournalPrompt {
        let prompt = JournalPrompt {
            id: Uuid::new_v4().to_string(),
            text: new.text,
            category: new.category,
            user_id: new.user_id,
        };
        self.state.prompts.push(prompt.clone());
        self.dirty();
        prompt
    }

    pub fn prompts_for_user(&self, user: &str) -> Vec<JournalPrompt> {
        self.state
            .prompts
            .iter()
            .filter(|p| p.user_id == user)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (JournalStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = JournalStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_entry(title: &str, date: &str, user: &str) -> NewEntry {
        NewEntry {
            date: day(date),
            title: title.to_string(),
            content: "...".to_string(),
            mood: Some(4),
            tags: vec!["daily".to_string()],
            user_id: user.to_string(),
        }
    }

    #[test]
    fn test_add_and_list_by_date_desc() {
        let (mut store, _dir) = test_store();
        store.add_entry(new_entry("Older", "2024-01-01", "u1"));
        store.add_entry(new_entry("Newer", "2024-01-05", "u1"));
        store.add_entry(new_entry("Elsewhere", "2024-01-03", "u2"));

        let list = store.entries_for_user("u1");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "Newer");
        assert_eq!(list[1].title, "Older");
    }

    #[test]
    fn test_update_bumps_updated_at() {
        let (mut store, _dir) = test_store();
        let e = store.add_entry(new_entry("Day one", "2024-01-01", "u1"));
        std::thread::sleep(std::time::Duration::from_millis(5));

        store.update_entry(
            &e.id,
            EntryPatch {
                content: Some("rewritten".to_string()),
                mood: Some(None),
                ..Default::default()
            },
        );

        let updated = store.entry_by_date("u1", day("2024-01-01")).unwrap();
        assert_eq!(updated.content, "rewritten");
        assert_eq!(updated.mood, None);
        assert!(updated.updated_at > e.updated_at);
    }

    #[test]
    fn test_duplicate_same_day_entries_coexist() {
        let (mut store, _dir) = test_store();
        let first = store.add_entry(new_entry("Morning", "2024-01-01", "u1"));
        store.add_entry(new_entry("Evening", "2024-01-01", "u1"));

        // Both live in the store; the date lookup yields the first insert.
        assert_eq!(store.entries_for_user("u1").len(), 2);
        let found = store.entry_by_date("u1", day("2024-01-01")).unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn test_delete_entry() {
        let (mut store, _dir) = test_store();
        let e = store.add_entry(new_entry("Day one", "2024-01-01", "u1"));
        store.delete_entry(&e.id);
        assert!(store.entries_for_user("u1").is_empty());
        store.delete_entry("no-such-id"); // silent no-op
    }

    #[test]
    fn test_prompts_append_only() {
        let (mut store, _dir) = test_store();
        store.add_prompt(NewPrompt {
            text: "What went well today?".to_string(),
            category: "gratitude".to_string(),
            user_id: "u1".to_string(),
        });
        store.add_prompt(NewPrompt {
            text: "What drained you?".to_string(),
            category: "reflection".to_string(),
            user_id: "u1".to_string(),
        });
        assert_eq!(store.prompts_for_user("u1").len(), 2);
        assert!(store.prompts_for_user("u2").is_empty());
    }

    #[test]
    fn test_persistence_reload() {
        let dir = tempdir().unwrap();
        {
            let mut store = JournalStore::open(dir.path()).unwrap();
            store.add_entry(new_entry("Day one", "2024-01-01", "u1"));
        }
        let store = JournalStore::open(dir.path()).unwrap();
        assert!(store.entry_by_date("u1", day("2024-01-01")).is_some());
    }
}
