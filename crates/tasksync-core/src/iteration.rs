use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

/// A date-ranged iteration declared on the remote project board. Read-only
/// from our side; the remote API offers no way to create new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationBucket {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub duration_days: i64,
}

impl IterationBucket {
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(self.duration_days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date()
    }

    /// Number embedded in the title; a bare `Iteration` counts as 1.
    pub fn number(&self) -> Option<u32> {
        let title = self.title.to_lowercase();
        if title.trim() == "iteration" {
            return Some(1);
        }
        let re = Regex::new(r"(\d+)").expect("regex");
        re.captures(&title)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Select the iteration for a task. Tried in order:
/// 1. due date falls inside a bucket's range
/// 2. declared month number matches a bucket's title number or start month
/// 3. due date's calendar month matches a bucket's start month (any year)
/// 4. today falls inside a bucket's range
/// 5. the bucket with the latest start date
///
/// Total for any non-empty bucket list; `None` only when there are no
/// buckets at all.
pub fn match_bucket<'a>(
    buckets: &'a [IterationBucket],
    due_date: Option<NaiveDate>,
    month: Option<u32>,
    today: NaiveDate,
) -> Option<&'a IterationBucket> {
    if buckets.is_empty() {
        return None;
    }

    if let Some(due) = due_date {
        if let Some(bucket) = buckets.iter().find(|bucket| bucket.contains(due)) {
            return Some(bucket);
        }
    }

    if let Some(month) = month {
        if let Some(bucket) = buckets.iter().find(|bucket| {
            bucket.number() == Some(month) || bucket.start_date.month() == month
        }) {
            return Some(bucket);
        }
    }

    if let Some(due) = due_date {
        if let Some(bucket) = buckets
            .iter()
            .find(|bucket| bucket.start_date.month() == due.month())
        {
            return Some(bucket);
        }
    }

    if let Some(bucket) = buckets.iter().find(|bucket| bucket.contains(today)) {
        return Some(bucket);
    }

    buckets.iter().max_by_key(|bucket| bucket.start_date)
}

/// The expected sprint schedule: seven two-week iterations anchored on the
/// board's original cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedIteration {
    pub number: u32,
    pub title: String,
    pub start_date: NaiveDate,
    pub duration_days: i64,
}

impl PlannedIteration {
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(self.duration_days)
    }
}

const SCHEDULE_START: (i32, u32, u32) = (2025, 12, 15);
const SCHEDULE_LEN: u32 = 7;
const SPRINT_DAYS: i64 = 14;

pub fn expected_iterations() -> Vec<PlannedIteration> {
    let first = NaiveDate::from_ymd_opt(SCHEDULE_START.0, SCHEDULE_START.1, SCHEDULE_START.2)
        .expect("schedule anchor");
    (1..=SCHEDULE_LEN)
        .map(|number| PlannedIteration {
            number,
            // The first board iteration was created without a number suffix.
            title: if number == 1 {
                "Iteration".to_string()
            } else {
                format!("Iteration {number}")
            },
            start_date: first + Duration::days(SPRINT_DAYS * i64::from(number - 1)),
            duration_days: SPRINT_DAYS,
        })
        .collect()
}

/// Planned iterations with no matching remote bucket, by number.
pub fn missing_iterations(existing: &[IterationBucket]) -> Vec<PlannedIteration> {
    let present: Vec<u32> = existing.iter().filter_map(IterationBucket::number).collect();
    expected_iterations()
        .into_iter()
        .filter(|planned| !present.contains(&planned.number))
        .collect()
}
