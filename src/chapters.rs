//! Latest-per-chapter selection for a manga feed
//!
//! A MangaDex feed often carries several uploads of the same chapter (different
//! groups, re-uploads). [`select_latest_per_label`] keeps the most recently
//! updated upload for each chapter label and orders the result newest chapter
//! first, comparing labels numerically ("12.5" sits between "13" and "12").
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use mangadex_proxy::chapters::{select_latest_per_label, ChapterEntry};
//!
//! struct Upload(Option<&'static str>, i64);
//!
//! impl ChapterEntry for Upload {
//!     fn label(&self) -> Option<&str> { self.0 }
//!     fn updated_at(&self) -> chrono::DateTime<Utc> { Utc.timestamp_opt(self.1, 0).unwrap() }
//! }
//!
//! let picked = select_latest_per_label(vec![Upload(Some("1"), 10), Upload(Some("2"), 5)]);
//! assert_eq!(picked[0].0, Some("2"));
//! ```

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::Chapter;

/// A chapter-like record that can be grouped by label and compared by age
pub trait ChapterEntry {
    fn label(&self) -> Option<&str>;
    fn updated_at(&self) -> DateTime<Utc>;
}

impl ChapterEntry for Chapter {
    fn label(&self) -> Option<&str> {
        self.attributes.chapter.as_deref()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.attributes.updated_at
    }
}

/// Numeric sort key derived from a chapter label.
///
/// Missing or malformed labels map to `(0, 0)`, so they sort alongside
/// chapter "0" at the tail of a normal feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ChapterKey {
    pub major: i64,
    pub fractional: i64,
}

impl ChapterKey {
    pub fn parse(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::default();
        };
        let mut parts = label.trim().splitn(3, '.');
        let major = match parts.next().map(str::trim) {
            Some("") | None => Some(0),
            Some(s) => s.parse::<i64>().ok(),
        };
        let fractional = match parts.next().map(str::trim) {
            None => Some(0),
            Some(s) => s.parse::<i64>().ok(),
        };
        match (major, fractional) {
            (Some(major), Some(fractional)) => Self { major, fractional },
            _ => Self::default(),
        }
    }
}

/// Keep the most recently updated record per chapter label, newest chapter first.
///
/// Records without a label share the `""` group. On equal `updated_at` the
/// record seen later wins. Groups with equal keys keep first-appearance order.
pub fn select_latest_per_label<T: ChapterEntry>(records: Vec<T>) -> Vec<T> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut latest: Vec<T> = Vec::new();

    for record in records {
        let group = record.label().unwrap_or_default().to_string();
        match index.get(&group).copied() {
            Some(slot) => {
                if record.updated_at() >= latest[slot].updated_at() {
                    latest[slot] = record;
                }
            }
            None => {
                index.insert(group, latest.len());
                latest.push(record);
            }
        }
    }

    latest.sort_by(|a, b| compare_desc(a, b));
    latest
}

fn compare_desc<T: ChapterEntry>(a: &T, b: &T) -> Ordering {
    ChapterKey::parse(b.label()).cmp(&ChapterKey::parse(a.label()))
}
