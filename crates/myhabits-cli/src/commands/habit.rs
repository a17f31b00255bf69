//! Habit management commands for CLI.

use clap::{Args, Subcommand};
use myhabits_core::schedule;
use myhabits_core::{Habit, RepeatType, Session};

use crate::common::{parse_days, print_json, require_login, Context};

/// Options shared by create and update. Unset options leave fields alone.
#[derive(Args)]
pub struct HabitOptions {
    /// Habit description
    #[arg(long)]
    description: Option<String>,
    /// ARGB color as a signed 32-bit integer
    #[arg(long, allow_hyphen_values = true)]
    color: Option<i32>,
    /// Recurrence: daily, weekly or monthly
    #[arg(long)]
    repeat: Option<RepeatType>,
    /// Comma-separated ISO weekdays for weekly habits (1=Mon .. 7=Sun)
    #[arg(long)]
    days: Option<String>,
    /// Day of month for monthly habits
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=31))]
    monthly_date: Option<u8>,
    /// Enable or disable the reminder flag
    #[arg(long)]
    reminder: Option<bool>,
    /// Goal target; enables the goal
    #[arg(long)]
    goal: Option<u32>,
    /// Clear the goal
    #[arg(long, conflicts_with = "goal")]
    no_goal: bool,
    /// Routine label (e.g. "Morning")
    #[arg(long)]
    routine: Option<String>,
    /// Mark the habit active or inactive
    #[arg(long)]
    active: Option<bool>,
}

impl HabitOptions {
    fn apply(self, habit: &mut Habit) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(description) = self.description {
            habit.description = description;
        }
        if let Some(color) = self.color {
            habit.color = color;
        }
        if let Some(repeat) = self.repeat {
            habit.repeat_type = repeat;
        }
        if let Some(days) = self.days {
            habit.selected_days = parse_days(&days)?;
        }
        if let Some(date) = self.monthly_date {
            habit.monthly_date = date;
        }
        if let Some(reminder) = self.reminder {
            habit.has_reminder = reminder;
        }
        if let Some(goal) = self.goal {
            habit.has_goal = true;
            habit.goal_target = goal;
        }
        if self.no_goal {
            habit.has_goal = false;
        }
        if let Some(routine) = self.routine {
            habit.routine = routine;
        }
        if let Some(active) = self.active {
            habit.is_active = active;
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit title
        title: String,
        #[command(flatten)]
        options: HabitOptions,
    },
    /// List habits
    List {
        /// Include inactive habits
        #[arg(long)]
        all: bool,
    },
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        options: HabitOptions,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit ID
        id: String,
    },
}

pub fn run(
    ctx: &Context,
    session: Session,
    action: HabitAction,
) -> Result<Session, Box<dyn std::error::Error>> {
    require_login(&session)?;
    let store = &ctx.store;

    match action {
        HabitAction::Create { title, options } => {
            if title.trim().is_empty() {
                return Err("habit title must not be blank".into());
            }
            let mut habit = ctx.config.new_habit(title);
            options.apply(&mut habit)?;
            store.save_habit(habit.clone())?;
            println!("Habit created: {}", habit.id);
            print_json(&habit)?;
        }
        HabitAction::List { all } => {
            let habits: Vec<_> = store
                .list_habits()?
                .into_iter()
                .filter(|h| all || h.is_active)
                .map(|h| {
                    serde_json::json!({
                        "id": h.id,
                        "title": h.title,
                        "schedule": schedule::describe(&h),
                        "active": h.is_active,
                    })
                })
                .collect();
            print_json(&habits)?;
        }
        HabitAction::Get { id } => match store.get_habit(&id)? {
            Some(habit) => print_json(&habit)?,
            None => println!("Habit not found: {id}"),
        },
        HabitAction::Update { id, title, options } => {
            let Some(mut habit) = store.get_habit(&id)? else {
                println!("Habit not found: {id}");
                return Ok(session);
            };
            if let Some(title) = title {
                if title.trim().is_empty() {
                    return Err("habit title must not be blank".into());
                }
                habit.title = title;
            }
            options.apply(&mut habit)?;
            store.save_habit(habit.clone())?;
            println!("Habit updated: {id}");
            print_json(&habit)?;
        }
        HabitAction::Delete { id } => {
            if store.get_habit(&id)?.is_none() {
                println!("Habit not found: {id}");
            } else {
                store.delete_habit(&id)?;
                println!("Habit deleted: {id}");
            }
        }
    }
    Ok(session)
}
