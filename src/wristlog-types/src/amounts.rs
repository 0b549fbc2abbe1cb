use crate::{ActivityKind, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityAmount {
    pub kind: ActivityKind,
    pub total_seconds: i64,
    pub total_steps: u64,
    /// Share of the grand total, 0-100. Filled in once all buckets are known.
    pub percentage: f64,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl ActivityAmount {
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            total_seconds: 0,
            total_steps: 0,
            percentage: 0.0,
            start: None,
            end: None,
        }
    }

    pub fn add_seconds(&mut self, seconds: i64) {
        self.total_seconds += seconds;
    }

    pub fn add_steps(&mut self, steps: u64) {
        self.total_steps += steps;
    }

    /// Widens the first/last credited timestamps to include `timestamp`.
    pub fn touch(&mut self, timestamp: Timestamp) {
        self.start = Some(self.start.map_or(timestamp, |s| s.min(timestamp)));
        self.end = Some(self.end.map_or(timestamp, |e| e.max(timestamp)));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityAmounts {
    amounts: Vec<ActivityAmount>,
    total_seconds: i64,
}

impl ActivityAmounts {
    /// Keeps the amounts with recorded time and attaches their share of the total.
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = ActivityAmount>,
    {
        let mut amounts = amounts
            .into_iter()
            .filter(|a| a.total_seconds > 0)
            .collect::<Vec<_>>();

        let total_seconds = amounts.iter().map(|a| a.total_seconds).sum::<i64>();
        for amount in &mut amounts {
            amount.percentage = amount.total_seconds as f64 * 100.0 / total_seconds as f64;
        }

        Self {
            amounts,
            total_seconds,
        }
    }

    pub fn amounts(&self) -> &[ActivityAmount] {
        &self.amounts
    }

    pub fn get(&self, kind: ActivityKind) -> Option<&ActivityAmount> {
        self.amounts.iter().find(|a| a.kind == kind)
    }

    pub fn total_seconds(&self) -> i64 {
        self.total_seconds
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Seconds spent in any sleep bucket.
    pub fn sleep_seconds(&self) -> i64 {
        self.amounts
            .iter()
            .filter(|a| a.kind.is_sleep())
            .map(|a| a.total_seconds)
            .sum()
    }
}
