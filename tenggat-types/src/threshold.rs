use chrono::TimeDelta;

/// A point before a deadline at which one reminder is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub key: &'static str,
    pub hours: i64,
    pub label: &'static str,
}

/// Reminder thresholds, longest first.
pub const THRESHOLDS: [Threshold; 6] = [
    Threshold::new("2d", 48, "2 hari"),
    Threshold::new("1d", 24, "1 hari"),
    Threshold::new("12h", 12, "12 jam"),
    Threshold::new("6h", 6, "6 jam"),
    Threshold::new("3h", 3, "3 jam"),
    Threshold::new("1h", 1, "1 jam"),
];

impl Threshold {
    pub const fn new(key: &'static str, hours: i64, label: &'static str) -> Self {
        Self { key, hours, label }
    }

    pub fn find(key: &str) -> Option<Self> {
        THRESHOLDS.into_iter().find(|threshold| threshold.key == key)
    }

    pub fn before_deadline(&self) -> TimeDelta {
        TimeDelta::hours(self.hours)
    }

    pub fn is_crossed(&self, time_left: TimeDelta) -> bool {
        time_left <= self.before_deadline()
    }
}
