use crate::units::format_bytes;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A tag as listed by Docker Hub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(rename = "last_updated", default = "min_date", deserialize_with = "date_or_min")]
    pub date: DateTime<Utc>,
    #[serde(rename = "full_size", default, deserialize_with = "size_or_zero")]
    pub size: u64,
}

fn min_date() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

// Tags that were never pushed through the v2 API come back with a null date.
fn date_or_min<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(min_date))
}

fn size_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Age cutoffs for tag filtering, fixed relative to a single "now".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub older_than: Option<DateTime<Utc>>,
    pub newer_than: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn from_ages(
        greater_than: Option<TimeDelta>,
        less_than: Option<TimeDelta>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            older_than: greater_than.map(|age| cutoff(now, age)),
            newer_than: less_than.map(|age| cutoff(now, age)),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.older_than.is_none() && self.newer_than.is_none()
    }

    /// A tag is admitted when it satisfies either bound. Both bounds set is
    /// not "between two dates".
    pub fn admits(&self, tag: &Tag) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let older = self.older_than.is_some_and(|cutoff| tag.date < cutoff);
        let newer = self.newer_than.is_some_and(|cutoff| tag.date > cutoff);
        older || newer
    }
}

// Ages reaching past the representable range clamp to the earliest date.
fn cutoff(now: DateTime<Utc>, age: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(age).unwrap_or_else(min_date)
}

/// Result of filtering: what gets printed by `tags list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagListing {
    pub tags: Vec<Tag>,
    pub total: usize,
    pub total_size: Option<u64>,
}

pub fn filter_tags(tags: &[Tag], window: &DateWindow, sum_size: bool) -> TagListing {
    let filtered: Vec<Tag> = tags
        .iter()
        .filter(|tag| window.admits(tag))
        .cloned()
        .collect();

    let total_size = sum_size.then(|| filtered.iter().map(|tag| tag.size).sum());

    TagListing {
        tags: filtered,
        total: tags.len(),
        total_size,
    }
}

impl TagListing {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for TagListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "There were no tags to list.");
        }

        for tag in &self.tags {
            writeln!(f, "{}", tag.name)?;
        }
        writeln!(f, "====================")?;
        writeln!(f, "Tags: showing {} of {}", self.tags.len(), self.total)?;
        if let Some(size) = self.total_size {
            writeln!(f, "Total size: {}", format_bytes(size))?;
        }
        Ok(())
    }
}
