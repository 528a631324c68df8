//! Command execution - calls engine operations and prints results
//!
//! ASCII-only output, no emojis. The engine never fails on bad ids, so
//! the only hard errors here are a missing data directory or a bad date
//! argument.

use crate::cli::{
    ActivityCommands, Cli, JournalCommands, RewardCommands, TodoCommands,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use quest_core::{
    default_seeds, ActivityKind, Engine, NewActivity, NewEntry, NewPrompt, NewReward, NewTodo,
    Recurrence, TodoCategory,
};
use std::path::PathBuf;

/// Data directory resolution: flag, then $QUESTLOG_DIR, then the
/// platform-local data dir.
pub fn data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("QUESTLOG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("questlog")
}

fn parse_day(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn status(engine: &Engine, user: &str, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let total_xp = engine.activities.total_xp_for_user(user);
    let today_xp = engine.activities.total_xp_for_date(today, user);
    let level = engine.level_for_user(user);
    let next = engine.next_reward_for_user(user);

    if json {
        let next_json = next.as_ref().map(|r| {
            serde_json::json!({
                "name": r.name,
                "level": r.level,
                "xp_required": r.xp_required,
            })
        });
        let out = serde_json::json!({
            "user": user,
            "level": level,
            "total_xp": total_xp,
            "today_xp": today_xp,
            "next_reward": next_json,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}  Level {}", "[QUESTLOG]".bright_green(), level);
    println!("  Lifetime XP: {}", total_xp.to_string().cyan());
    println!("  Today's XP:  {}", today_xp.to_string().cyan());
    match next {
        Some(r) => println!(
            "  Next reward: {} (level {}, {} XP to go)",
            r.name,
            r.level,
            r.xp_required.saturating_sub(total_xp)
        ),
        None => println!("  Next reward: {}", "none in sight".dimmed()),
    }

    let activities = engine.activities.activities_for_user(user);
    if !activities.is_empty() {
        println!();
        println!("[STREAKS]");
        for a in &activities {
            let streak = engine.activities.streak_for_activity(&a.id, today);
            let marker = if streak > 0 {
                format!("{} day(s)", streak).bright_green().to_string()
            } else {
                "-".dimmed().to_string()
            };
            println!("  * {:<24} {}", a.name, marker);
        }
    }
    println!();
    Ok(())
}

pub fn activity(engine: &mut Engine, user: &str, action: ActivityCommands) -> Result<()> {
    match action {
        ActivityCommands::Add { name, xp, kind, category, cap } => {
            let a = engine.activities.add_activity(NewActivity {
                name,
                xp,
                kind: ActivityKind::parse(&kind),
                category,
                user_id: user.to_string(),
                daily_cap: cap,
                linked_habit: None,
                linked_todo: None,
            });
            println!("{} activity '{}' ({} XP)  id={}", "[OK]".bright_green(), a.name, a.xp, a.id);
        }
        ActivityCommands::List => {
            let today = Local::now().date_naive();
            for a in engine.activities.activities_for_user(user) {
                let streak = engine.activities.streak_for_activity(&a.id, today);
                println!(
                    "{}  {:<24} {:>4} XP  {}  streak {}  [{}]",
                    a.id,
                    a.name,
                    a.xp,
                    a.kind.as_str(),
                    streak,
                    a.category
                );
            }
        }
        ActivityCommands::Done { id, date } => {
            let day = parse_day(date.as_deref())?;
            match engine.activities.activity(&id) {
                Some(a) => {
                    // XP snapshot at completion time.
                    engine.activities.complete_activity(&a.id, day, a.xp);
                    let total = engine.activities.total_xp_for_date(day, user);
                    println!(
                        "{} '{}' on {}  (+{} XP, {} total that day)",
                        "[OK]".bright_green(),
                        a.name,
                        day,
                        a.xp,
                        total
                    );
                }
                None => println!("{} no activity with id {}", "[MISS]".yellow(), id),
            }
        }
        ActivityCommands::Rm { id } => {
            engine.activities.delete_activity(&id);
            println!("{} removed (with completion history)", "[OK]".bright_green());
        }
    }
    Ok(())
}

pub fn todo(engine: &mut Engine, user: &str, action: TodoCommands) -> Result<()> {
    match action {
        TodoCommands::Add { title, category, recur } => {
            let t = engine.todos.add_todo(NewTodo {
                title,
                category: TodoCategory::parse(&category),
                user_id: user.to_string(),
                recurrence: Recurrence::parse(&recur),
            });
            println!("{} todo '{}'  id={}", "[OK]".bright_green(), t.title, t.id);
        }
        TodoCommands::List => {
            for t in engine.todos.todos_for_user(user) {
                let mark = if t.completed { "[x]".bright_green().to_string() } else { "[ ]".to_string() };
                println!(
                    "{}  {} {:<32} {}  {}",
                    t.id,
                    mark,
                    t.title,
                    t.category.as_str(),
                    t.recurrence.as_str()
                );
            }
        }
        TodoCommands::Toggle { id } => {
            engine.todos.toggle_todo(&id);
            match engine.todos.todo(&id) {
                Some(t) if t.completed => println!("{} '{}' completed", "[OK]".bright_green(), t.title),
                Some(t) => println!("{} '{}' reopened", "[OK]".bright_green(), t.title),
                None => println!("{} no todo with id {}", "[MISS]".yellow(), id),
            }
        }
        TodoCommands::Rm { id } => {
            engine.todos.delete_todo(&id);
            println!("{} removed", "[OK]".bright_green());
        }
    }
    Ok(())
}

pub fn journal(engine: &mut Engine, user: &str, action: JournalCommands) -> Result<()> {
    match action {
        JournalCommands::Write { title, content, date, mood, tags } => {
            let day = parse_day(date.as_deref())?;
            let tags = tags
                .map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();
            let e = engine.journal.add_entry(NewEntry {
                date: day,
                title,
                content,
                mood,
                tags,
                user_id: user.to_string(),
            });
            println!("{} entry '{}' for {}", "[OK]".bright_green(), e.title, e.date);
        }
        JournalCommands::List => {
            for e in engine.journal.entries_for_user(user) {
                let mood = e
                    .mood
                    .map(|m| format!("mood {}/5", m))
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {}  {:<24} {}", e.id, e.date, e.title, mood.dimmed());
            }
        }
        JournalCommands::Prompt { text, category } => {
            engine.journal.add_prompt(NewPrompt {
                text,
                category,
                user_id: user.to_string(),
            });
            println!("{} prompt saved", "[OK]".bright_green());
        }
        JournalCommands::Prompts => {
            for p in engine.journal.prompts_for_user(user) {
                println!("  * [{}] {}", p.category.cyan(), p.text);
            }
        }
    }
    Ok(())
}

pub fn reward(engine: &mut Engine, user: &str, action: RewardCommands) -> Result<()> {
    match action {
        RewardCommands::Add { name, level, xp, desc } => {
            let r = engine.rewards.add_reward(NewReward {
                name,
                description: desc,
                level,
                xp_required: xp,
                user_id: user.to_string(),
                image_url: None,
            });
            println!(
                "{} reward '{}' at level {} ({} XP)  id={}",
                "[OK]".bright_green(),
                r.name,
                r.level,
                r.xp_required,
                r.id
            );
        }
        RewardCommands::List => {
            let total_xp = engine.activities.total_xp_for_user(user);
            for r in engine.rewards.rewards_for_user(user) {
                let state = if r.unlocked {
                    "[CLAIMED]".bright_green().to_string()
                } else if r.xp_required <= total_xp {
                    "[READY]".yellow().to_string()
                } else {
                    "[LOCKED]".dimmed().to_string()
                };
                println!(
                    "{}  L{:<3} {:<24} {:>6} XP  {}",
                    r.id, r.level, r.name, r.xp_required, state
                );
            }
        }
        RewardCommands::Claim { id } => {
            engine.rewards.claim_reward(&id);
            match engine.rewards.reward(&id) {
                Some(r) => println!("{} '{}' claimed", "[OK]".bright_green(), r.name),
                None => println!("{} no reward with id {}", "[MISS]".yellow(), id),
            }
        }
        RewardCommands::Next => {
            match engine.next_reward_for_user(user) {
                Some(r) => {
                    let total_xp = engine.activities.total_xp_for_user(user);
                    println!(
                        "Next milestone: '{}' at level {} ({} XP to go)",
                        r.name,
                        r.level,
                        r.xp_required.saturating_sub(total_xp)
                    );
                }
                None => println!("{}", "No milestone ahead - add a reward.".dimmed()),
            }
        }
    }
    Ok(())
}

pub fn seed(engine: &mut Engine, user: &str) -> Result<()> {
    let created = engine.activities.generate_activities(user, &default_seeds());
    println!(
        "{} created {} starter activities for '{}'",
        "[OK]".bright_green(),
        created.len(),
        user
    );
    for a in &created {
        println!("  * {:<24} {:>4} XP  [{}]", a.name, a.xp, a.category);
    }
    Ok(())
}
