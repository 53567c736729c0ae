//! Item commands: add, list, show, edit, status, complete, start, rm.

use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::item::{Item, ItemEdit, NewItem, Priority, Status};
use crate::output::{emit_success, HumanOutput};
use crate::query::{ItemQuery, SortOption};

use super::Context;

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub no_due: bool,
}

pub struct ListOptions {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub no_due: bool,
}

#[derive(Serialize)]
struct ItemOutput<'a> {
    #[serde(flatten)]
    item: &'a Item,
    overdue: bool,
}

impl<'a> ItemOutput<'a> {
    fn new(item: &'a Item, now: DateTime<Utc>) -> Self {
        Self {
            item,
            overdue: item.is_overdue(now),
        }
    }
}

#[derive(Serialize)]
struct ItemListOutput<'a> {
    total: usize,
    shown: usize,
    sort: SortOption,
    filtered: bool,
    items: Vec<ItemOutput<'a>>,
}

pub fn run_add(mut ctx: Context, options: AddOptions) -> Result<()> {
    let now = Utc::now();
    let title = require_title(&options.title)?;
    let status = parse_or(options.status.as_deref(), ctx.config.defaults.status)?;
    let priority = parse_or(options.priority.as_deref(), ctx.config.defaults.priority)?;
    let due_date = if options.no_due {
        None
    } else {
        match parse_due(options.due.as_deref())? {
            Some(due) => Some(due),
            None => Some(now + Duration::days(1)),
        }
    };

    let new = NewItem::new(title)
        .description(options.description.unwrap_or_default())
        .status(status)
        .priority(priority)
        .due(due_date);
    let item = ctx.tracker.create(new, now)?;

    let mut human = HumanOutput::new(format!("Added {}", item.id()));
    push_item_summary(&mut human, &item, now);
    emit_success(ctx.output, "add", &ItemOutput::new(&item, now), Some(&human))
}

pub fn run_list(ctx: Context, options: ListOptions) -> Result<()> {
    let now = Utc::now();
    let sort = parse_or(options.sort.as_deref(), ctx.config.defaults.sort)?;
    let query = ItemQuery::sorted_by(sort)
        .search(options.search.unwrap_or_default())
        .status(parse_optional::<Status>(options.status.as_deref())?)
        .priority(parse_optional::<Priority>(options.priority.as_deref())?);

    let mut items = ctx.tracker.view(&query);
    let total = items.len();
    apply_limit(&mut items, options.limit)?;

    let mut human = HumanOutput::new(format!("{} item(s)", items.len()));
    human.push_summary("sort", sort.label());
    if query.is_filtered() || !query.search.is_empty() {
        human.push_summary("matching", total.to_string());
    }
    for item in &items {
        human.push_detail(format_item_line(item, now));
    }
    if ctx.tracker.items().is_empty() {
        human.push_next_step("todo add <title>");
        human.push_next_step("todo seed");
    }

    let output = ItemListOutput {
        total,
        shown: items.len(),
        sort,
        filtered: query.is_filtered(),
        items: items.iter().map(|item| ItemOutput::new(item, now)).collect(),
    };
    emit_success(ctx.output, "list", &output, Some(&human))
}

pub fn run_show(ctx: Context, id: &str) -> Result<()> {
    let now = Utc::now();
    let id = ctx.tracker.resolve_id(id)?;
    let item = ctx
        .tracker
        .get(&id)
        .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;

    let mut human = HumanOutput::new(format!("Item {}", item.id()));
    push_item_summary(&mut human, item, now);
    emit_success(ctx.output, "show", &ItemOutput::new(item, now), Some(&human))
}

pub fn run_edit(mut ctx: Context, options: EditOptions) -> Result<()> {
    let now = Utc::now();
    let id = ctx.tracker.resolve_id(&options.id)?;
    let edit = ItemEdit {
        title: options
            .title
            .as_deref()
            .map(require_title)
            .transpose()?
            .map(str::to_string),
        description: options.description,
        status: parse_optional::<Status>(options.status.as_deref())?,
        due_date: if options.no_due {
            Some(None)
        } else {
            parse_due(options.due.as_deref())?.map(Some)
        },
        priority: parse_optional::<Priority>(options.priority.as_deref())?,
    };
    if edit.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit; pass at least one field".to_string(),
        ));
    }

    let item = ctx.tracker.edit(&id, edit, now)?;
    let mut human = HumanOutput::new(format!("Updated {}", item.id()));
    push_item_summary(&mut human, &item, now);
    emit_success(ctx.output, "edit", &ItemOutput::new(&item, now), Some(&human))
}

pub fn run_status(mut ctx: Context, id: &str, status: &str) -> Result<()> {
    let now = Utc::now();
    let status: Status = status.parse()?;
    let id = ctx.tracker.resolve_id(id)?;
    let item = ctx.tracker.set_status(&id, status, now)?;
    emit_status_change(&ctx, "status", &item, now)
}

pub fn run_complete(mut ctx: Context, id: &str) -> Result<()> {
    let now = Utc::now();
    let id = ctx.tracker.resolve_id(id)?;
    let item = ctx.tracker.mark_complete(&id, now)?;
    emit_status_change(&ctx, "complete", &item, now)
}

pub fn run_start(mut ctx: Context, id: &str) -> Result<()> {
    let now = Utc::now();
    let id = ctx.tracker.resolve_id(id)?;
    let item = ctx.tracker.start(&id, now)?;
    emit_status_change(&ctx, "start", &item, now)
}

pub fn run_rm(mut ctx: Context, id: &str) -> Result<()> {
    let now = Utc::now();
    let id = ctx.tracker.resolve_id(id)?;
    let item = ctx.tracker.delete(&id)?;
    let human = HumanOutput::new(format!("Deleted {} ({})", item.id(), item.title()));
    emit_success(ctx.output, "rm", &ItemOutput::new(&item, now), Some(&human))
}

fn emit_status_change(ctx: &Context, command: &str, item: &Item, now: DateTime<Utc>) -> Result<()> {
    let human = HumanOutput::new(format!("{} is now {}", item.id(), item.status()));
    emit_success(ctx.output, command, &ItemOutput::new(item, now), Some(&human))
}

fn push_item_summary(human: &mut HumanOutput, item: &Item, now: DateTime<Utc>) {
    human.push_summary("title", item.title());
    if !item.description().is_empty() {
        human.push_summary("description", item.description());
    }
    human.push_summary("status", item.status().label());
    human.push_summary("priority", item.priority().label());
    human.push_summary(
        "due",
        item.due_date()
            .map(format_local)
            .unwrap_or_else(|| "none".to_string()),
    );
    human.push_summary("created", format_local(item.creation_date()));
    if let Some(completed) = item.completion_date() {
        human.push_summary("completed", format_local(completed));
    }
    if item.is_overdue(now) {
        human.push_warning("overdue");
    }
}

fn format_item_line(item: &Item, now: DateTime<Utc>) -> String {
    let due = match item.due_date() {
        Some(due) if item.is_overdue(now) => format!("due {} (overdue)", format_local(due)),
        Some(due) => format!("due {}", format_local(due)),
        None => "no due date".to_string(),
    };
    format!(
        "{}  [{}] {}  ({}, {})",
        item.id(),
        item.status(),
        item.title(),
        item.priority(),
        due
    )
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn require_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    Ok(trimmed)
}

fn parse_or<T>(value: Option<&str>, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = Error>,
{
    Ok(parse_optional(value)?.unwrap_or(default))
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = Error>,
{
    value.map(str::parse::<T>).transpose()
}

fn parse_due(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|err| {
        Error::InvalidArgument(format!("invalid due timestamp '{value}': {err}"))
    })?;
    Ok(Some(parsed.with_timezone(&Utc)))
}

fn apply_limit<T>(items: &mut Vec<T>, limit: Option<usize>) -> Result<()> {
    if let Some(limit) = limit {
        if limit == 0 {
            return Err(Error::InvalidArgument("limit must be >= 1".to_string()));
        }
        items.truncate(limit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn apply_limit_truncates() {
        let mut items = vec!["a", "b", "c"];
        apply_limit(&mut items, Some(2)).expect("limit");
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn apply_limit_rejects_zero() {
        let mut items = vec!["a"];
        assert!(apply_limit(&mut items, Some(0)).is_err());
    }

    #[test]
    fn parse_due_accepts_offsets() {
        let due = parse_due(Some("2025-03-26T17:00:00+02:00")).expect("parse");
        assert_eq!(due, Some(Utc.with_ymd_and_hms(2025, 3, 26, 15, 0, 0).unwrap()));
        assert_eq!(parse_due(None).expect("none"), None);

        let err = parse_due(Some("tomorrow")).expect_err("invalid");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn require_title_trims_and_rejects_blank() {
        assert_eq!(require_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(require_title("   ").is_err());
    }

    #[test]
    fn parse_or_falls_back_to_default() {
        assert_eq!(parse_or::<Priority>(None, Priority::Low).unwrap(), Priority::Low);
        assert_eq!(parse_or(Some("high"), Priority::Low).unwrap(), Priority::High);
        assert!(parse_or::<SortOption>(Some("size"), SortOption::Title).is_err());
    }
}
