use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tenggat_types::{Task, Threshold, THRESHOLDS};
use tokio::time::{interval, MissedTickBehavior};

use crate::{sender::MessageSender, store::Store};

pub const CONNECTION_TEST_MESSAGE: &str = "*Test Koneksi*\n\nHalo! Jika Anda menerima pesan ini, berarti integrasi pengingat tenggat berhasil.\n\n_Dikirim dari tenggatd_";

/// Sends deadline reminders for the tasks in a [`Store`].
#[derive(Clone)]
pub struct Reminders {
    store: Store,
    sender: Arc<dyn MessageSender>,
    utc_offset: FixedOffset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub attempted: usize,
    pub sent: usize,
}

impl Reminders {
    pub fn new(store: Store, sender: Arc<dyn MessageSender>, utc_offset: FixedOffset) -> Self {
        Self {
            store,
            sender,
            utc_offset,
        }
    }

    /// Send every reminder whose threshold has been crossed at `now` and not
    /// yet delivered. Failed sends stay unmarked and are retried next tick.
    pub async fn tick(&self, now: DateTime<Utc>) -> TickReport {
        let state = self.store.snapshot();
        let mut report = TickReport::default();

        if !state.settings.is_configured() {
            tracing::debug!("Reminder settings incomplete, skipping tick");
            return report;
        }

        for task in state.tasks.iter().filter(|task| !task.completed) {
            let Some(deadline) = task.deadline else {
                continue;
            };

            let time_left = deadline - now;
            if time_left < TimeDelta::zero() {
                continue;
            }

            let due = THRESHOLDS.iter().filter(|threshold| {
                threshold.is_crossed(time_left) && !task.reminder_sent(threshold.key)
            });

            for threshold in due {
                report.attempted += 1;
                let message = reminder_message(task, deadline, threshold, self.utc_offset);

                if !self
                    .sender
                    .send(
                        &state.settings.target_address,
                        &message,
                        &state.settings.send_token,
                    )
                    .await
                {
                    tracing::warn!(
                        "Reminder {} for task {} not delivered, retrying next tick",
                        threshold.key,
                        task.id
                    );
                    continue;
                }

                report.sent += 1;
                if self
                    .store
                    .mark_reminder_sent_for_deadline(task.id, threshold.key, deadline)
                    .is_some()
                {
                    tracing::info!("Reminder sent for {} ({})", task.title, threshold.key);
                } else {
                    tracing::info!(
                        "Reminder sent for {} ({}), task changed meanwhile",
                        task.title,
                        threshold.key
                    );
                }
            }
        }

        report
    }

    /// Send the connection test message with the stored settings.
    /// Returns `None` when the settings are incomplete.
    pub async fn send_test_message(&self) -> Option<bool> {
        let settings = self.store.settings();
        if !settings.is_configured() {
            return None;
        }

        tracing::info!(
            "Sending test message to {} with token {}",
            settings.target_address,
            settings.masked_token()
        );

        Some(
            self.sender
                .send(
                    &settings.target_address,
                    CONNECTION_TEST_MESSAGE,
                    &settings.send_token,
                )
                .await,
        )
    }
}

pub fn reminder_message(
    task: &Task,
    deadline: DateTime<Utc>,
    threshold: &Threshold,
    utc_offset: FixedOffset,
) -> String {
    format!(
        "*Pengingat Tugas*\n\nTugas: *{}*\nDeadline: {}\nSisa Waktu: < {}\n\nSegera selesaikan!",
        task.title,
        deadline
            .with_timezone(&utc_offset)
            .format("%d/%m/%Y, %H.%M.%S"),
        threshold.label
    )
}

/// Run a tick every `period`, starting immediately. Ticks never overlap.
#[tracing::instrument(skip_all)]
pub async fn run(reminders: Reminders, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!("Checking reminders every {}s", period.as_secs());

    loop {
        ticker.tick().await;
        let report = reminders.tick(Utc::now()).await;
        if report.attempted > 0 {
            tracing::info!(
                "Delivered {} of {} due reminders",
                report.sent,
                report.attempted
            );
        }
    }
}
