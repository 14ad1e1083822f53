use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::Serialize;
use std::fmt;
use std::time::Duration as StdDuration;
use tokio::sync::watch;
use tokio::time::interval;

const REFRESH_INTERVAL_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.days, self.hours, self.minutes)
    }
}

/// Time until polls close, shown on the landing page.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    closes_at: DateTime<Utc>,
}

impl Countdown {
    pub fn new(closes_at: DateTime<Utc>) -> Self {
        Self { closes_at }
    }

    /// `None` when the closing time falls outside chrono's date range.
    pub fn closing_in(minutes: i64) -> Option<Self> {
        Duration::try_minutes(minutes)
            .and_then(|offset| Utc::now().checked_add_signed(offset))
            .map(Self::new)
    }

    pub fn closes_at(&self) -> DateTime<Utc> {
        self.closes_at
    }

    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.closes_at
    }

    /// Partial minutes count as a whole minute, so a fresh countdown shows
    /// its full length until sixty seconds have passed.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TimeLeft {
        let seconds = (self.closes_at - now).num_seconds().max(0);
        let total_minutes = (seconds + 59) / 60;
        TimeLeft {
            days: total_minutes / (24 * 60),
            hours: total_minutes / 60 % 24,
            minutes: total_minutes % 60,
        }
    }
}

/// Publishes the remaining time once a minute until polls close.
pub async fn run_countdown(countdown: Countdown, updates: watch::Sender<TimeLeft>) {
    info!("Polls close at {}", countdown.closes_at().to_rfc3339());
    let mut interval = interval(StdDuration::from_secs(REFRESH_INTERVAL_SECONDS));

    loop {
        interval.tick().await;
        let now = Utc::now();
        updates.send_replace(countdown.remaining_at(now));
        if countdown.is_closed_at(now) {
            info!("Polls closed at {}", now.to_rfc3339());
            break;
        }
    }
}
