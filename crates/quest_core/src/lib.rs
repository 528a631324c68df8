//! Questlog core - progress and gamification state engine
//!
//! Tracks user-performed activities, awards XP, derives streaks and
//! levels, and gates rewards behind XP thresholds. Four stores own the
//! state (activities, todos, journal, rewards); each keeps its whole
//! state in memory and persists it as one JSON namespace file after
//! every mutation.
//!
//! Design ground rules:
//! - Store operations never fail: mutations on unknown ids are silent
//!   no-ops, and persistence is best-effort (a failed write costs
//!   durability, not correctness).
//! - An activity's XP is fixed at creation; the patch types simply have
//!   no field for it.
//! - Stores never read each other. The XP total that reward queries need
//!   is always passed in by the caller.

pub mod activity;
pub mod engine;
pub mod journal;
pub mod persist;
pub mod rewards;
pub mod todo;

pub use activity::{
    default_seeds, Activity, ActivityKind, ActivityPatch, ActivitySeed, ActivityStore, Completion,
    NewActivity,
};
pub use engine::Engine;
pub use journal::{
    EntryPatch, JournalEntry, JournalPrompt, JournalStore, NewEntry, NewPrompt,
};
pub use persist::StateFile;
pub use rewards::{NewReward, Reward, RewardPatch, RewardStore};
pub use todo::{NewTodo, Recurrence, Todo, TodoCategory, TodoPatch, TodoStore};
