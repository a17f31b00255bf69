//! Today's due habits: listing, filtering and recording outcomes.

use clap::Subcommand;
use myhabits_core::progress::{apply_filter, DailyProgress};
use myhabits_core::{schedule, HabitFilter, HabitWithEntries, Session};
use serde::Serialize;

use crate::common::{print_json, require_login, Context};

#[derive(Subcommand)]
pub enum TodayAction {
    /// List habits due today
    List {
        /// all, completed or skipped
        #[arg(long, default_value = "all")]
        filter: HabitFilter,
    },
    /// Mark a habit completed for today
    Complete {
        /// Habit ID
        id: String,
    },
    /// Mark a habit skipped for today
    Skip {
        /// Habit ID
        id: String,
    },
    /// Completed / skipped counts for today
    Progress,
}

#[derive(Serialize)]
struct TodayRow<'a> {
    id: &'a str,
    title: &'a str,
    schedule: String,
    completed: bool,
    skipped: bool,
    weekly_progress: String,
}

impl<'a> From<&'a HabitWithEntries> for TodayRow<'a> {
    fn from(view: &'a HabitWithEntries) -> Self {
        Self {
            id: &view.habit.id,
            title: &view.habit.title,
            schedule: schedule::describe(&view.habit),
            completed: view.is_completed_today(),
            skipped: view.is_skipped_today(),
            weekly_progress: view.weekly_progress(),
        }
    }
}

pub fn run(
    ctx: &Context,
    session: Session,
    action: TodayAction,
) -> Result<Session, Box<dyn std::error::Error>> {
    require_login(&session)?;
    let store = &ctx.store;

    match action {
        TodayAction::List { filter } => {
            let due = store.today_habits(ctx.today)?;
            let shown = apply_filter(&due, filter);
            let rows: Vec<TodayRow<'_>> = shown.iter().map(TodayRow::from).collect();
            print_json(&rows)?;
        }
        TodayAction::Complete { id } => {
            if store.get_habit(&id)?.is_none() {
                return Err(format!("habit not found: {id}").into());
            }
            let entry = store.complete_habit(&id, ctx.today)?;
            println!("Completed: {id}");
            print_json(&entry)?;
        }
        TodayAction::Skip { id } => {
            if store.get_habit(&id)?.is_none() {
                return Err(format!("habit not found: {id}").into());
            }
            let entry = store.skip_habit(&id, ctx.today)?;
            println!("Skipped: {id}");
            print_json(&entry)?;
        }
        TodayAction::Progress => {
            let due = store.today_habits(ctx.today)?;
            let progress = DailyProgress::from_due(&due);
            print_json(&serde_json::json!({
                "date": ctx.today.to_string(),
                "completed": progress.completed,
                "skipped": progress.skipped,
                "pending": progress.pending(),
                "total": progress.total,
                "fraction": progress.fraction(),
            }))?;
        }
    }
    Ok(session)
}
