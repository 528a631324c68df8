//! Rewards Store
//!
//! Level-gated unlockables behind XP thresholds. The store never computes
//! XP itself: every XP-dependent query takes `current_xp` as a parameter,
//! supplied by the caller from the activity store. "XP-eligible" (threshold
//! reached) and "claimed" (`unlocked` flag) are deliberately separate
//! states.

use crate::persist::StateFile;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Level this reward represents.
    pub level: u32,
    /// Lifetime-XP threshold for eligibility.
    pub xp_required: u64,
    pub user_id: String,
    pub unlocked: bool,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReward {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub xp_required: u64,
    pub user_id: String,
    pub image_url: Option<String>,
}

/// Editable subset of a reward.
#[derive(Debug, Clone, Default)]
pub struct RewardPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<u32>,
    pub xp_required: Option<u64>,
    pub image_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RewardState {
    rewards: Vec<Reward>,
}

/// In-memory rewards store persisted under the `rewards` namespace.
pub struct RewardStore {
    state: RewardState,
    file: StateFile,
}

impl RewardStore {
    pub fn open(dir: &Path) -> Result<Self> {
        let file = StateFile::open(dir, "rewards")?;
        let state = file.load();
        Ok(Self { state, file })
    }

    fn dirty(&self) {
        self.file.save(&self.state);
    }

    pub fn add_reward(&mut self, new: NewReward) -> Reward {
        let reward = Reward {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            level: new.level,
            xp_required: new.xp_required,
            user_id: new.user_id,
            unlocked: false,
            claimed_at: None,
            created_at: Utc::now(),
            image_url: new.image_url,
        };
        self.state.rewards.push(reward.clone());
        self.dirty();
        reward
    }

    /// Merge a patch into the matching reward. Unknown ids are a silent
    /// no-op.
    pub fn update_reward(&mut self, id: &str, patch: RewardPatch) {
        let Some(reward) = self.state.rewards.iter_mut().find(|r| r.id == id) else {
            return;
        };
        if let Some(name) = patch.name {
            reward.name = name;
        }
        if let Some(description) = patch.description {
            reward.description = description;
        }
        if let Some(level) = patch.level {
            reward.level = level;
        }
        if let Some(xp_required) = patch.xp_required {
            reward.xp_required = xp_required;
        }
        if let Some(image_url) = patch.image_url {
            reward.image_url = image_url;
        }
        self.dirty();
    }

    pub fn delete_reward(&mut self, id: &str) {
        let before = self.state.rewards.len();
        self.state.rewards.retain(|r| r.id != id);
        if self.state.rewards.len() != before {
            self.dirty();
        }
    }

    /// One-way transition to unlocked with a claim timestamp. Claiming an
    /// already-unlocked reward keeps the flag and re-stamps `claimed_at`;
    /// there is no way back to locked.
    pub fn claim_reward(&mut self, id: &str) {
        let Some(reward) = self.state.rewards.iter_mut().find(|r| r.id == id) else {
            return;
        };
        reward.unlocked = true;
        reward.claimed_at = Some(Utc::now());
        self.dirty();
    }

    /// Rewards owned by `user`, ascending by level.
    pub fn rewards_for_user(&self, user: &str) -> Vec<Reward> {
        let mut rewards: Vec<Reward> = self
            .state
            .rewards
            .iter()
            .filter(|r| r.user_id == user)
            .cloned()
            .collect();
        rewards.sort_by_key(|r| r.level);
        rewards
    }

    pub fn reward(&self, id: &str) -> Option<Reward> {
        self.state.rewards.iter().find(|r| r.id == id).cloned()
    }

    /// The next milestone still out of reach: first reward in level order
    /// that is not yet unlocked and whose threshold exceeds `current_xp`.
    pub fn next_reward(&self, user: &str, current_xp: u64) -> Option<Reward> {
        self.rewards_for_user(user)
            .into_iter()
            .find(|r| !r.unlocked && r.xp_required > current_xp)
    }

    /// Highest level whose threshold is at or below `current_xp`, floor 1.
    /// The `unlocked` flag plays no part: a level is reached by XP alone,
    /// whether or not its reward was claimed.
    pub fn current_level(&self, user: &str, current_xp: u64) -> u32 {
        self.state
            .rewards
            .iter()
            .filter(|r| r.user_id == user && r.xp_required <= current_xp)
            .map(|r| r.level)
            .max()
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (RewardStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = RewardStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn new_reward(name: &str, level: u32, xp_required: u64, user: &str) -> NewReward {
        NewReward {
            name: name.to_string(),
            description: String::new(),
            level,
            xp_required,
            user_id: user.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_list_sorted_by_level() {
        let (mut store, _dir) = test_store();
        store.add_reward(new_reward("Cinema night", 3, 500, "u1"));
        store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
        store.add_reward(new_reward("New book", 5, 1200, "u1"));

        let levels: Vec<u32> = store
            .rewards_for_user("u1")
            .iter()
            .map(|r| r.level)
            .collect();
        assert_eq!(levels, vec![2, 3, 5]);
    }

    #[test]
    fn test_level_floor_is_one() {
        let (mut store, _dir) = test_store();
        store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
        assert_eq!(store.current_level("u1", 0), 1);
        assert_eq!(store.current_level("nobody", 10_000), 1);
    }

    #[test]
    fn test_level_and_next_reward_example() {
        let (mut store, _dir) = test_store();
        store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
        let cinema = store.add_reward(new_reward("Cinema night", 3, 500, "u1"));

        // 250 XP clears the level-2 threshold, not the level-3 one.
        assert_eq!(store.current_level("u1", 250), 2);
        assert_eq!(store.next_reward("u1", 250).unwrap().id, cinema.id);
    }

    #[test]
    fn test_level_ignores_unlocked_flag() {
        let (mut store, _dir) = test_store();
        let r = store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
        assert_eq!(store.current_level("u1", 250), 2);
        store.claim_reward(&r.id);
        assert_eq!(store.current_level("u1", 250), 2);
    }

    #[test]
    fn test_next_reward_skips_unlocked() {
        let (mut store, _dir) = test_store();
        let coffee = store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
        let cinema = store.add_reward(new_reward("Cinema night", 3, 500, "u1"));

        assert_eq!(store.next_reward("u1", 0).unwrap().id, coffee.id);
        store.claim_reward(&coffee.id);
        assert_eq!(store.next_reward("u1", 0).unwrap().id, cinema.id);

        store.claim_reward(&cinema.id);
        assert!(store.next_reward("u1", 0).is_none());
    }

    #[test]
    fn test_claim_is_one_way_and_restamps() {
        let (mut store, _dir) = test_store();
        let r = store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));

        store.claim_reward(&r.id);
        let first = store.reward(&r.id).unwrap();
        assert!(first.unlocked);
        let first_claim = first.claimed_at.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        store.claim_reward(&r.id);
        let second = store.reward(&r.id).unwrap();
        // Still unlocked; the timestamp moves on a repeat claim. That is
        // the stored behavior, intentional or not.
        assert!(second.unlocked);
        assert!(second.claimed_at.unwrap() > first_claim);
    }

    #[test]
    fn test_claim_unknown_id_is_noop() {
        let (mut store, _dir) = test_store();
        store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
        store.claim_reward("no-such-id");
        assert!(!store.rewards_for_user("u1")[0].unlocked);
    }

    #[test]
    fn test_update_and_delete() {
        let (mut store, _dir) = test_store();
        let r = store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));

        store.update_reward(
            &r.id,
            RewardPatch {
                xp_required: Some(250),
                description: Some("Oat-milk latte".to_string()),
                ..Default::default()
            },
        );
        let updated = store.reward(&r.id).unwrap();
        assert_eq!(updated.xp_required, 250);
        assert_eq!(updated.description, "Oat-milk latte");

        store.delete_reward(&r.id);
        assert!(store.rewards_for_user("u1").is_empty());
    }

    #[test]
    fn test_persistence_reload() {
        let dir = tempdir().unwrap();
        let id;
        {
            let mut store = RewardStore::open(dir.path()).unwrap();
            let r = store.add_reward(new_reward("Fancy coffee", 2, 200, "u1"));
            store.claim_reward(&r.id);
            id = r.id;
        }
        let store = RewardStore::open(dir.path()).unwrap();
        assert!(store.reward(&id).unwrap().unlocked);
    }
}
