use clap::Subcommand;
use myhabits_core::progress::{monthly_view, weekly_view};
use myhabits_core::{schedule, HabitWithEntries, Session};

use crate::common::{print_json, require_login, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Weekly and all-time stats for one habit
    Habit {
        /// Habit ID
        id: String,
    },
    /// Trailing 7-day stats for daily and weekly habits
    Week,
    /// All-time stats for monthly habits
    Monthly,
}

fn summary(view: &HabitWithEntries) -> serde_json::Value {
    serde_json::json!({
        "id": view.habit.id,
        "title": view.habit.title,
        "schedule": schedule::describe(&view.habit),
        "weekly_progress": view.weekly_progress(),
        "weekly_completion_rate": view.weekly_completion_rate(),
        "overall_progress": view.overall_progress(),
        "completion_rate": view.completion_rate(),
    })
}

pub fn run(
    ctx: &Context,
    session: Session,
    action: StatsAction,
) -> Result<Session, Box<dyn std::error::Error>> {
    require_login(&session)?;
    let views = ctx.store.list_active_habits_with_entries(ctx.today)?;

    match action {
        StatsAction::Habit { id } => match views.iter().find(|v| v.habit.id == id) {
            Some(view) => print_json(&summary(view))?,
            None => return Err(format!("active habit not found: {id}").into()),
        },
        StatsAction::Week => {
            let rows: Vec<_> = weekly_view(&views).iter().map(summary).collect();
            print_json(&rows)?;
        }
        StatsAction::Monthly => {
            let rows: Vec<_> = monthly_view(&views).iter().map(summary).collect();
            print_json(&rows)?;
        }
    }
    Ok(session)
}
