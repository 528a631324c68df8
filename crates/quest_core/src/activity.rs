//! Activity Store
//!
//! Owns XP-earning activity definitions and their per-day completion
//! records; derives streaks and XP totals from them. This is the store
//! feeding every level and reward calculation.
//!
//! An activity's XP value is fixed at creation. [`ActivityPatch`] carries
//! no `xp` field, so immutability is enforced by the type system rather
//! than by stripping fields at run time.

use crate::persist::StateFile;
use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// Schema
// ============================================================================

/// Core activities count toward daily structure (and may carry a cap);
/// bonus activities are uncapped extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Core,
    Bonus,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Core => "core",
            ActivityKind::Bonus => "bonus",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "bonus" => ActivityKind::Bonus,
            _ => ActivityKind::Core,
        }
    }
}

/// An XP-earning activity definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    /// XP awarded per completion. Set once at creation; no update path
    /// for this field exists.
    pub xp: u64,
    pub kind: ActivityKind,
    /// Free-form tag ("health", "learning", ...).
    pub category: String,
    pub user_id: String,
    /// Max completions per calendar day, meaningful for core activities.
    /// Stored only; enforcement is the caller's responsibility.
    pub daily_cap: Option<u32>,
    pub linked_habit: Option<String>,
    pub linked_todo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an activity (id and created_at are assigned by the
/// store).
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub name: String,
    pub xp: u64,
    pub kind: ActivityKind,
    pub category: String,
    pub user_id: String,
    pub daily_cap: Option<u32>,
    pub linked_habit: Option<String>,
    pub linked_todo: Option<String>,
}

/// Editable subset of an activity. `None` leaves the stored value
/// untouched; the double-`Option` fields can also clear a value.
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    pub name: Option<String>,
    pub kind: Option<ActivityKind>,
    pub category: Option<String>,
    pub daily_cap: Option<Option<u32>>,
    pub linked_habit: Option<Option<String>>,
    pub linked_todo: Option<Option<String>>,
}

/// One completion of an activity on a calendar day. `xp_earned` is a
/// snapshot of the activity's XP at completion time and is what every
/// aggregate query sums over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub activity_id: String,
    pub date: NaiveDate,
    pub xp_earned: u64,
    pub completed_at: DateTime<Utc>,
}

/// Seed entry for bulk generation of a starter activity catalogue.
#[derive(Debug, Clone)]
pub struct ActivitySeed {
    pub name: &'static str,
    pub xp: u64,
    pub kind: ActivityKind,
    pub category: &'static str,
    pub daily_cap: Option<u32>,
}

/// Starter catalogue used to bootstrap a fresh profile.
pub fn default_seeds() -> Vec<ActivitySeed> {
    vec![
        ActivitySeed { name: "Morning walk", xp: 20, kind: ActivityKind::Core, category: "health", daily_cap: Some(1) },
        ActivitySeed { name: "Read 30 minutes", xp: 50, kind: ActivityKind::Core, category: "learning", daily_cap: Some(1) },
        ActivitySeed { name: "Write journal", xp: 30, kind: ActivityKind::Core, category: "reflection", daily_cap: Some(1) },
        ActivitySeed { name: "Workout", xp: 60, kind: ActivityKind::Core, category: "health", daily_cap: Some(1) },
        ActivitySeed { name: "Tidy one room", xp: 15, kind: ActivityKind::Bonus, category: "home", daily_cap: None },
        ActivitySeed { name: "Call a friend", xp: 25, kind: ActivityKind::Bonus, category: "social", daily_cap: None },
    ]
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ActivityState {
    activities: Vec<Activity>,
    completions: Vec<Completion>,
    /// Last calendar day on which a daily-boundary check ran.
    last_reset_date: Option<NaiveDate>,
}

/// In-memory activity store persisted under the `activities` namespace.
pub struct ActivityStore {
    state: ActivityState,
    file: StateFile,
}

impl ActivityStore {
    pub fn open(dir: &Path) -> Result<Self> {
        let file = StateFile::open(dir, "activities")?;
        let state = file.load();
        Ok(Self { state, file })
    }

    fn dirty(&self) {
        self.file.save(&self.state);
    }

    // ========== Daily boundary ==========

    /// Advance the daily-boundary marker if `today` differs from the last
    /// recorded day. Completions are never deleted here; they remain as
    /// permanent history. Idempotent, safe to call on every load. Returns
    /// whether the boundary advanced.
    pub fn check_daily_reset(&mut self, today: NaiveDate) -> bool {
        if self.state.last_reset_date == Some(today) {
            return false;
        }
        debug!("Daily boundary advanced to {}", today);
        self.state.last_reset_date = Some(today);
        self.dirty();
        true
    }

    /// Daily-boundary check against the local calendar day.
    pub fn check_daily_reset_now(&mut self) -> bool {
        self.check_daily_reset(Local::now().date_naive())
    }

    pub fn last_reset_date(&self) -> Option<NaiveDate> {
        self.state.last_reset_date
    }

    // ========== Mutations ==========

    /// Create an activity. Always succeeds given well-typed input.
    pub fn add_activity(&mut self, new: NewActivity) -> Activity {
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            xp: new.xp,
            kind: new.kind,
            category: new.category,
            user_id: new.user_id,
            daily_cap: new.daily_cap,
            linked_habit: new.linked_habit,
            linked_todo: new.linked_todo,
            created_at: Utc::now(),
        };
        self.state.activities.push(activity.clone());
        self.dirty();
        activity
    }

    /// Merge a patch into the matching activity. Unknown ids are a silent
    /// no-op. XP is not part of the patch type and therefore never changes.
    pub fn update_activity(&mut self, id: &str, patch: ActivityPatch) {
        let Some(activity) = self.state.activities.iter_mut().find(|a| a.id == id) else {
            return;
        };
        if let Some(name) = patch.name {
            activity.name = name;
        }
        if let Some(kind) = patch.kind {
            activity.kind = kind;
        }
        if let Some(category) = patch.category {
            activity.category = category;
        }
        if let Some(daily_cap) = patch.daily_cap {
            activity.daily_cap = daily_cap;
        }
        if let Some(linked_habit) = patch.linked_habit {
            activity.linked_habit = linked_habit;
        }
        if let Some(linked_todo) = patch.linked_todo {
            activity.linked_todo = linked_todo;
        }
        self.dirty();
    }

    /// Remove an activity and every completion referencing it, so no
    /// orphaned completions remain. Unknown ids are a silent no-op.
    pub fn delete_activity(&mut self, id: &str) {
        let before = self.state.activities.len();
        self.state.activities.retain(|a| a.id != id);
        if self.state.activities.len() == before {
            return;
        }
        self.state.completions.retain(|c| c.activity_id != id);
        self.dirty();
    }

    /// Record a completion. The store does not check the daily cap and
    /// does not reject duplicate (activity, date) pairs; both are the
    /// caller's responsibility.
    pub fn complete_activity(&mut self, activity_id: &str, date: NaiveDate, xp_earned: u64) {
        self.state.completions.push(Completion {
            activity_id: activity_id.to_string(),
            date,
            xp_earned,
            completed_at: Utc::now(),
        });
        self.dirty();
    }

    /// Bulk-create activities for an explicit owner, each with a fresh id.
    pub fn generate_activities(&mut self, owner: &str, seeds: &[ActivitySeed]) -> Vec<Activity> {
        let mut created = Vec::with_capacity(seeds.len());
        for seed in seeds {
            created.push(self.add_activity(NewActivity {
                name: seed.name.to_string(),
                xp: seed.xp,
                kind: seed.kind,
                category: seed.category.to_string(),
                user_id: owner.to_string(),
                daily_cap: seed.daily_cap,
                linked_habit: None,
                linked_todo: None,
            }));
        }
        created
    }

    // ========== Queries ==========

    pub fn activities_for_user(&self, user: &str) -> Vec<Activity> {
        self.state
            .activities
            .iter()
            .filter(|a| a.user_id == user)
            .cloned()
            .collect()
    }

    pub fn activity(&self, id: &str) -> Option<Activity> {
        self.state.activities.iter().find(|a| a.id == id).cloned()
    }

    /// Completions on `date` whose activity belongs to `user`.
    pub fn completions_for_date(&self, date: NaiveDate, user: &str) -> Vec<Completion> {
        let owned: HashSet<&str> = self
            .state
            .activities
            .iter()
            .filter(|a| a.user_id == user)
            .map(|a| a.id.as_str())
            .collect();
        self.state
            .completions
            .iter()
            .filter(|c| c.date == date && owned.contains(c.activity_id.as_str()))
            .cloned()
            .collect()
    }

    /// XP earned by `user` on one calendar day.
    pub fn total_xp_for_date(&self, date: NaiveDate, user: &str) -> u64 {
        self.completions_for_date(date, user)
            .iter()
            .map(|c| c.xp_earned)
            .sum()
    }

    /// Lifetime XP for `user` across all completions of their activities.
    /// This is the total that feeds level and reward calculations.
    pub fn total_xp_for_user(&self, user: &str) -> u64 {
        let owned: HashSet<&str> = self
            .state
            .activities
            .iter()
            .filter(|a| a.user_id == user)
            .map(|a| a.id.as_str())
            .collect();
        self.state
            .completions
            .iter()
            .filter(|c| owned.contains(c.activity_id.as_str()))
            .map(|c| c.xp_earned)
            .sum()
    }

    /// Consecutive-day completion streak for an activity, evaluated
    /// against `today`.
    ///
    /// Exact gap-scan over the set of completion dates: the walk starts at
    /// `today` when today is completed, otherwise at yesterday — an
    /// unfinished "today" never breaks a streak that is still in progress.
    /// Any missing day strictly before today terminates the count.
    pub fn streak_for_activity(&self, activity_id: &str, today: NaiveDate) -> u32 {
        let days: HashSet<NaiveDate> = self
            .state
            .completions
            .iter()
            .filter(|c| c.activity_id == activity_id)
            .map(|c| c.date)
            .collect();
        if days.is_empty() {
            return 0;
        }

        let mut day = if days.contains(&today) {
            today
        } else {
            today - Duration::days(1)
        };
        let mut streak = 0;
        while days.contains(&day) {
            streak += 1;
            day = day - Duration::days(1);
        }
        streak
    }

    /// Streak evaluated against the local calendar day.
    pub fn streak_for_activity_now(&self, activity_id: &str) -> u32 {
        self.streak_for_activity(activity_id, Local::now().date_naive())
    }
}

// ============================================================================
// Tests
// ============================================================================
