use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const ENGAGEMENT_POSTS: usize = 10;
pub const TIMELINE_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_comments: i64,
    pub total_likes: i64,
    pub posts_with_engagement: Vec<PostEngagement>,
    pub activity_timeline: Vec<ActivityDay>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostEngagement {
    pub id: Uuid,
    pub title: String,
    pub comments: i64,
    pub likes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub posts: i64,
    pub comments: i64,
    pub likes: i64,
}

/// Creation timestamps of the three entity kinds within the timeline window.
#[derive(Debug, Clone, Default)]
pub struct ActivityEvents {
    pub posts: Vec<DateTime<Utc>>,
    pub comments: Vec<DateTime<Utc>>,
    pub likes: Vec<DateTime<Utc>>,
}

impl ActivityEvents {
    /// Buckets events by UTC date, oldest date first. Days without activity are omitted.
    pub fn into_timeline(self) -> Vec<ActivityDay> {
        let mut days: BTreeMap<NaiveDate, ActivityDay> = BTreeMap::new();

        for at in self.posts {
            day_entry(&mut days, at).posts += 1;
        }
        for at in self.comments {
            day_entry(&mut days, at).comments += 1;
        }
        for at in self.likes {
            day_entry(&mut days, at).likes += 1;
        }

        days.into_values().collect()
    }
}

fn day_entry(days: &mut BTreeMap<NaiveDate, ActivityDay>, at: DateTime<Utc>) -> &mut ActivityDay {
    let date = at.date_naive();
    days.entry(date).or_insert_with(|| ActivityDay {
        date,
        ..ActivityDay::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timeline_groups_by_date_in_order() {
        let day1 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let day1_late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 3, 2, 0, 1, 0).unwrap();

        let events = ActivityEvents {
            posts: vec![day2, day1],
            comments: vec![day1_late],
            likes: vec![day2, day2],
        };
        let timeline = events.into_timeline();

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date, day1.date_naive());
        assert_eq!((timeline[0].posts, timeline[0].comments, timeline[0].likes), (1, 1, 0));
        assert_eq!((timeline[1].posts, timeline[1].comments, timeline[1].likes), (1, 0, 2));
    }
}
