use std::{collections::VecDeque, num::NonZeroUsize};

use wristlog_types::{ActivityAmounts, Timestamp};

/// Start of the cached day, shifted by the caller's day offset.
pub type DayKey = Timestamp;

/// Bounded per-day cache of computed amounts. Owned by whoever renders
/// multi-day views; the oldest insertion is evicted first.
#[derive(Clone, Debug)]
pub struct AmountCache {
    capacity: NonZeroUsize,
    entries: VecDeque<(DayKey, ActivityAmounts)>,
}

impl AmountCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.get()),
        }
    }

    pub fn get(&self, key: DayKey) -> Option<&ActivityAmounts> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, a)| a)
    }

    /// Inserts or replaces the entry for `key`. Returns the evicted entry, if any.
    pub fn insert(
        &mut self,
        key: DayKey,
        amounts: ActivityAmounts,
    ) -> Option<(DayKey, ActivityAmounts)> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            *existing = amounts;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity.get() {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some((day, _)) = &evicted {
            trace!("evicting cached amounts for {}", day);
        }

        self.entries.push_back((key, amounts));
        evicted
    }

    /// Returns the cached amounts for `key`, computing and caching them on a miss.
    pub fn get_or_try_insert_with<F, E>(
        &mut self,
        key: DayKey,
        compute: F,
    ) -> Result<ActivityAmounts, E>
    where
        F: FnOnce() -> Result<ActivityAmounts, E>,
    {
        if let Some(amounts) = self.get(key) {
            trace!("cached amounts for {}", key);
            return Ok(amounts.clone());
        }

        let amounts = compute()?;
        self.insert(key, amounts.clone());
        Ok(amounts)
    }

    pub fn remove(&mut self, key: DayKey) -> Option<ActivityAmounts> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        self.entries.remove(index).map(|(_, a)| a)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
