use anyhow::Context;
use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wristlog_algos::{DailyStepSource, StreakCalculator};
use wristlog_types::StreakSummary;

/// Runs a streak scan off the async runtime.
pub struct StreakWorker {
    handle: JoinHandle<Option<StreakSummary>>,
    cancel_token: CancellationToken,
}

impl StreakWorker {
    pub fn spawn<S>(calculator: StreakCalculator, source: S, today: NaiveDate) -> Self
    where
        S: DailyStepSource + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle =
            tokio::task::spawn_blocking(move || calculator.scan(&source, today, &token));

        Self {
            handle,
            cancel_token,
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// `Ok(None)` means the scan was cancelled before it finished.
    pub async fn join(self) -> anyhow::Result<Option<StreakSummary>> {
        self.handle.await.context("streak worker panicked")
    }
}

/// Last completed streak result; a cancelled scan leaves it untouched.
#[derive(Clone, Debug, Default)]
pub struct StreakState {
    summary: Option<StreakSummary>,
}

impl StreakState {
    pub fn update(&mut self, result: Option<StreakSummary>) -> bool {
        match result {
            Some(summary) => {
                self.summary = Some(summary);
                true
            }
            None => {
                debug!("streak scan cancelled, keeping previous result");
                false
            }
        }
    }

    pub fn summary(&self) -> Option<&StreakSummary> {
        self.summary.as_ref()
    }
}
