use std::{cmp::Reverse, collections::BTreeMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anything that was logged on a calendar day
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryGroup<T> {
    pub date: NaiveDate,
    pub entries: Vec<T>,
}

/// Partition `items` into one group per day, newest day first
///
/// Items keep their relative order within a day. Days with nothing logged
/// don't get a group
pub fn group_by_date<T: Dated>(items: impl IntoIterator<Item = T>) -> Vec<EntryGroup<T>> {
    let mut buckets: BTreeMap<Reverse<NaiveDate>, Vec<T>> = BTreeMap::new();
    for item in items {
        buckets.entry(Reverse(item.date())).or_default().push(item);
    }

    buckets
        .into_iter()
        .map(|(Reverse(date), entries)| EntryGroup { date, entries })
        .collect()
}
