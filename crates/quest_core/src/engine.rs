//! Engine aggregate
//!
//! Opens the four stores from one data directory and runs the
//! daily-boundary check, so consumers get a ready-to-use engine on load.
//!
//! Stores stay independent: the only cross-store coupling is lifetime XP
//! flowing from the activity store into reward queries, and it flows here
//! as an explicit value, never as a hidden read. There is no notification
//! mechanism between stores; consumers re-query after each mutation.

use crate::activity::ActivityStore;
use crate::journal::JournalStore;
use crate::rewards::{Reward, RewardStore};
use crate::todo::TodoStore;
use anyhow::Result;
use std::path::Path;

pub struct Engine {
    pub activities: ActivityStore,
    pub todos: TodoStore,
    pub journal: JournalStore,
    pub rewards: RewardStore,
}

impl Engine {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let mut activities = ActivityStore::open(data_dir)?;
        activities.check_daily_reset_now();
        Ok(Self {
            activities,
            todos: TodoStore::open(data_dir)?,
            journal: JournalStore::open(data_dir)?,
            rewards: RewardStore::open(data_dir)?,
        })
    }

    /// Current level derived from lifetime XP.
    pub fn level_for_user(&self, user: &str) -> u32 {
        let xp = self.activities.total_xp_for_user(user);
        self.rewards.current_level(user, xp)
    }

    /// Next milestone still out of reach at the user's lifetime XP.
    pub fn next_reward_for_user(&self, user: &str) -> Option<Reward> {
        let xp = self.activities.total_xp_for_user(user);
        self.rewards.next_reward(user, xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityKind, NewActivity};
    use crate::rewards::NewReward;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_completions_drive_level_and_next_reward() {
        let dir = tempdir().unwrap();
        let mut engine = Engine::open(dir.path()).unwrap();

        let a = engine.activities.add_activity(NewActivity {
            name: "Read".to_string(),
            xp: 50,
            kind: ActivityKind::Core,
            category: "learning".to_string(),
            user_id: "u1".to_string(),
            daily_cap: Some(1),
            linked_habit: None,
            linked_todo: None,
        });
        engine.rewards.add_reward(NewReward {
            name: "Fancy coffee".to_string(),
            description: String::new(),
            level: 2,
            xp_required: 100,
            user_id: "u1".to_string(),
            image_url: None,
        });
        engine.rewards.add_reward(NewReward {
            name: "Cinema night".to_string(),
            description: String::new(),
            level: 3,
            xp_required: 500,
            user_id: "u1".to_string(),
            image_url: None,
        });

        assert_eq!(engine.level_for_user("u1"), 1);

        engine
            .activities
            .complete_activity(&a.id, day("2024-01-01"), 50);
        engine
            .activities
            .complete_activity(&a.id, day("2024-01-02"), 50);

        // 100 XP: level 2 reached, the level-3 milestone is next.
        assert_eq!(engine.level_for_user("u1"), 2);
        assert_eq!(engine.next_reward_for_user("u1").unwrap().level, 3);
    }

    #[test]
    fn test_open_is_reentrant() {
        let dir = tempdir().unwrap();
        {
            let engine = Engine::open(dir.path()).unwrap();
            assert!(engine.activities.last_reset_date().is_some());
        }
        // Opening again the same day leaves the boundary where it was.
        let engine = Engine::open(dir.path()).unwrap();
        assert!(engine.activities.last_reset_date().is_some());
    }
}
