//! Completion statistics over an item collection.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::item::{Item, Priority, Status};

pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 7;

/// Items completed on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendDay {
    pub date: NaiveDate,
    pub count: usize,
}

/// One bar or slice of a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Percentage of completed items, `0.0` for an empty collection.
    pub completion_rate: f64,
    pub trend_window_days: u32,
    pub completion_trend: Vec<TrendDay>,
}

impl Stats {
    pub fn status_count(&self, status: Status) -> usize {
        match status {
            Status::NotStarted => self.not_started,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }

    /// Completed, in progress, not started.
    pub fn status_distribution(&self) -> Vec<CategoryCount> {
        [Status::Completed, Status::InProgress, Status::NotStarted]
            .into_iter()
            .map(|status| CategoryCount {
                key: status.key(),
                label: status.label(),
                count: self.status_count(status),
            })
            .collect()
    }

    /// High, medium, low.
    pub fn priority_distribution(&self) -> Vec<CategoryCount> {
        [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .map(|priority| CategoryCount {
                key: priority.key(),
                label: priority.label(),
                count: self.priority_count(priority),
            })
            .collect()
    }

    /// Completion rate truncated to a whole percent.
    pub fn completion_percent(&self) -> u32 {
        self.completion_rate.trunc() as u32
    }
}

/// Aggregate counts, completion rate and a per-day completion trend. Days
/// are calendar days in `now`'s time zone, oldest first, ending today.
pub fn aggregate<Tz: TimeZone>(items: &[Item], now: &DateTime<Tz>, trend_window_days: u32) -> Stats {
    let mut stats = Stats {
        total: items.len(),
        not_started: 0,
        in_progress: 0,
        completed: 0,
        low: 0,
        medium: 0,
        high: 0,
        completion_rate: 0.0,
        trend_window_days,
        completion_trend: completion_trend(items, now, trend_window_days),
    };

    for item in items {
        match item.status() {
            Status::NotStarted => stats.not_started += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Completed => stats.completed += 1,
        }
        match item.priority() {
            Priority::Low => stats.low += 1,
            Priority::Medium => stats.medium += 1,
            Priority::High => stats.high += 1,
        }
    }

    if stats.total > 0 {
        stats.completion_rate = stats.completed as f64 / stats.total as f64 * 100.0;
    }
    stats
}

fn completion_trend<Tz: TimeZone>(items: &[Item], now: &DateTime<Tz>, days: u32) -> Vec<TrendDay> {
    let tz = now.timezone();
    let today = now.date_naive();
    let completions: Vec<DateTime<Utc>> = items.iter().filter_map(Item::completion_date).collect();

    (0..days)
        .rev()
        .filter_map(|days_ago| today.checked_sub_days(Days::new(u64::from(days_ago))))
        .map(|date| {
            let start = start_of_day(&tz, date);
            let end = date.succ_opt().map(|next| start_of_day(&tz, next));
            let count = completions
                .iter()
                .filter(|completed| **completed >= start && end.map_or(true, |end| **completed < end))
                .count();
            TrendDay { date, count }
        })
        .collect()
}

/// First instant of `date` in `tz`. A midnight skipped by a DST change
/// resolves to the first local time that exists after it.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::default());
    (0..=96)
        .find_map(|step| {
            tz.from_local_datetime(&(midnight + Duration::minutes(15 * step)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use chrono::FixedOffset;

    fn utc(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn completed_at(title: &str, at: DateTime<Utc>) -> Item {
        let mut item = Item::create(NewItem::new(title), at - Duration::days(1));
        item.mark_complete(at);
        item
    }

    #[test]
    fn empty_collection_has_zero_rate() {
        let stats = aggregate(&[], &utc(20, 12), DEFAULT_TREND_WINDOW_DAYS);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert!(!stats.completion_rate.is_nan());
        assert_eq!(stats.completion_trend.len(), 7);
        assert!(stats.completion_trend.iter().all(|day| day.count == 0));
    }

    #[test]
    fn counts_by_status_and_priority() {
        let now = utc(20, 12);
        let items = vec![
            Item::create(NewItem::new("a").priority(Priority::High), now),
            Item::create(NewItem::new("b").status(Status::InProgress), now),
            Item::create(
                NewItem::new("c")
                    .status(Status::Completed)
                    .priority(Priority::Low),
                now,
            ),
            Item::create(NewItem::new("d").priority(Priority::High), now),
        ];
        let stats = aggregate(&items, &now, 7);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.not_started, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!((stats.low, stats.medium, stats.high), (1, 1, 2));
        assert_eq!(stats.completion_rate, 25.0);
        assert_eq!(stats.completion_percent(), 25);
    }

    #[test]
    fn completion_percent_truncates() {
        let now = utc(20, 12);
        let items = vec![
            Item::create(NewItem::new("a").status(Status::Completed), now),
            Item::create(NewItem::new("b"), now),
            Item::create(NewItem::new("c"), now),
        ];
        let stats = aggregate(&items, &now, 7);
        assert_eq!(stats.completion_percent(), 33);
    }

    #[test]
    fn trend_buckets_same_day_completions() {
        let now = utc(20, 12);
        let items = vec![
            completed_at("morning", utc(17, 10)),
            completed_at("night", utc(17, 22)),
            Item::create(NewItem::new("open"), utc(17, 9)),
        ];
        let stats = aggregate(&items, &now, 7);
        let trend = &stats.completion_trend;
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(trend[6].date, NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        for day in trend {
            let expected = if day.date == NaiveDate::from_ymd_opt(2025, 3, 17).unwrap() {
                2
            } else {
                0
            };
            assert_eq!(day.count, expected, "{}", day.date);
        }
    }

    #[test]
    fn trend_ignores_completions_outside_window() {
        let now = utc(20, 12);
        let items = vec![
            completed_at("too old", utc(13, 23)),
            completed_at("later today", utc(20, 18)),
            completed_at("tomorrow", utc(21, 0)),
        ];
        let stats = aggregate(&items, &now, 7);
        let total: usize = stats.completion_trend.iter().map(|day| day.count).sum();
        assert_eq!(total, 1);
        assert_eq!(stats.completion_trend[6].count, 1);
    }

    #[test]
    fn trend_uses_callers_calendar() {
        // 23:30 UTC on the 17th is already the 18th at UTC+2.
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = utc(20, 12).with_timezone(&offset);
        let items = vec![completed_at("late", Utc.with_ymd_and_hms(2025, 3, 17, 23, 30, 0).unwrap())];
        let stats = aggregate(&items, &now, 7);
        let day = stats
            .completion_trend
            .iter()
            .find(|day| day.count == 1)
            .expect("bucket");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 3, 18).unwrap());
    }

    #[test]
    fn day_after_skipped_midnight_starts_at_first_valid_time() {
        // Sao Paulo jumped from 00:00 to 01:00 on 2018-11-04 (-03 to -02).
        let tz = chrono_tz::America::Sao_Paulo;
        let gap_day = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        assert_eq!(
            start_of_day(&tz, gap_day),
            Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap()
        );

        let now = Utc
            .with_ymd_and_hms(2018, 11, 4, 15, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let items = vec![
            completed_at("before", Utc.with_ymd_and_hms(2018, 11, 4, 2, 59, 0).unwrap()),
            completed_at("after", Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap()),
        ];
        let stats = aggregate(&items, &now, 2);
        let buckets: Vec<(NaiveDate, usize)> = stats
            .completion_trend
            .iter()
            .map(|day| (day.date, day.count))
            .collect();
        assert_eq!(
            buckets,
            vec![(NaiveDate::from_ymd_opt(2018, 11, 3).unwrap(), 1), (gap_day, 1)]
        );
    }

    #[test]
    fn zero_window_has_no_trend() {
        let stats = aggregate(&[completed_at("x", utc(20, 9))], &utc(20, 12), 0);
        assert!(stats.completion_trend.is_empty());
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn distributions_follow_chart_order() {
        let now = utc(20, 12);
        let items = vec![
            Item::create(NewItem::new("a").priority(Priority::Low), now),
            Item::create(NewItem::new("b").status(Status::Completed), now),
        ];
        let stats = aggregate(&items, &now, 7);
        let statuses: Vec<(&str, usize)> = stats
            .status_distribution()
            .iter()
            .map(|entry| (entry.label, entry.count))
            .collect();
        assert_eq!(
            statuses,
            vec![("Completed", 1), ("In Progress", 0), ("Not Started", 1)]
        );
        let priorities: Vec<&str> = stats
            .priority_distribution()
            .iter()
            .map(|entry| entry.key)
            .collect();
        assert_eq!(priorities, vec!["high", "medium", "low"]);
    }
}
