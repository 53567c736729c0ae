//! Reporting commands: stats and seed.

use chrono::Local;
use serde::Serialize;

use crate::config::MAX_TREND_DAYS;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::stats::{CategoryCount, Stats};

use super::Context;

#[derive(Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: Stats,
    completion_percent: u32,
    status_distribution: Vec<CategoryCount>,
    priority_distribution: Vec<CategoryCount>,
}

#[derive(Serialize)]
struct SeedOutput {
    inserted: usize,
    total: usize,
}

pub fn run_stats(ctx: Context, days: Option<u32>) -> Result<()> {
    let days = days.unwrap_or(ctx.config.stats.trend_days);
    if days == 0 || days > MAX_TREND_DAYS {
        return Err(Error::InvalidArgument(format!(
            "days must be between 1 and {MAX_TREND_DAYS}"
        )));
    }

    let stats = ctx.tracker.stats(&Local::now(), days);

    let mut human = HumanOutput::new("Statistics");
    human.push_summary("Total", stats.total.to_string());
    human.push_summary("Completion rate", format!("{}%", stats.completion_percent()));
    for entry in stats.status_distribution() {
        human.push_summary(entry.label, entry.count.to_string());
    }
    for entry in stats.priority_distribution() {
        human.push_summary(format!("{} priority", entry.label), entry.count.to_string());
    }
    for day in &stats.completion_trend {
        human.push_detail(format!("{}: {} completed", day.date, day.count));
    }
    if stats.total == 0 {
        human.push_next_step("todo add <title>");
    }

    let output = StatsOutput {
        completion_percent: stats.completion_percent(),
        status_distribution: stats.status_distribution(),
        priority_distribution: stats.priority_distribution(),
        stats,
    };
    emit_success(ctx.output, "stats", &output, Some(&human))
}

pub fn run_seed(mut ctx: Context, force: bool) -> Result<()> {
    let now = Local::now();
    let inserted = if force {
        ctx.tracker.load_sample_data(&now)?
    } else {
        ctx.tracker.seed_if_empty(&now)?
    };

    let mut human = HumanOutput::new(format!("Loaded {inserted} sample item(s)"));
    if inserted == 0 {
        human.push_warning("store already has items; pass --force to add samples anyway");
    }
    human.push_next_step("todo list");

    let output = SeedOutput {
        inserted,
        total: ctx.tracker.items().len(),
    };
    emit_success(ctx.output, "seed", &output, Some(&human))
}
