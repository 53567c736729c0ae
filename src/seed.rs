//! Demonstration items for a fresh store.

use chrono::{DateTime, Days, Duration, NaiveTime, TimeZone, Utc};

use crate::item::{Item, NewItem, Priority, Status};

/// Five sample items positioned around `now` on the caller's calendar.
pub fn sample_items<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<Item> {
    let created = now.with_timezone(&Utc);
    let in_days = |days: u64| {
        now.clone()
            .checked_add_days(Days::new(days))
            .map(|due| due.with_timezone(&Utc))
            .unwrap_or_else(|| created + Duration::days(days as i64))
    };

    let proposal = Item::create(
        NewItem::new("Finish project proposal")
            .description("Complete the draft and send to the team for review")
            .status(Status::InProgress)
            .priority(Priority::High)
            .due(Some(today_at_five(now))),
        created,
    );

    let meeting = Item::create(
        NewItem::new("Weekly team meeting")
            .description("Prepare agenda and discussion points")
            .due(Some(in_days(1))),
        created,
    );

    let research = Item::create(
        NewItem::new("Research new technologies")
            .description("Look into SwiftData and latest SwiftUI features")
            .priority(Priority::Low)
            .due(Some(in_days(7))),
        created,
    );

    let overdue = now
        .clone()
        .checked_sub_days(Days::new(2))
        .map(|due| due.with_timezone(&Utc))
        .unwrap_or_else(|| created - Duration::days(2));
    let mut repository = Item::create(
        NewItem::new("Set up project repository")
            .description("Create Git repo and invite team members")
            .priority(Priority::High)
            .due(Some(overdue)),
        created,
    );
    repository.set_status(Status::Completed, created - Duration::hours(12));

    let brainstorm = Item::create(
        NewItem::new("Brainstorm app ideas").description("Think about potential new features"),
        created,
    );

    vec![proposal, meeting, research, repository, brainstorm]
}

/// 17:00 today in `now`'s zone, or `now` when that local time does not exist.
fn today_at_five<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default();
    now.timezone()
        .from_local_datetime(&now.date_naive().and_time(five))
        .earliest()
        .map(|due| due.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}
