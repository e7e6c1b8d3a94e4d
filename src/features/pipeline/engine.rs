//! # Feature: Reminder Engine
//!
//! Three sequential passes over the full speaker list: initial
//! notifications, advance reminders (1-15 days out), then day-of messages.
//! A per-run set of messaged phones is checked at the start of every
//! per-record step, so no phone ever receives two messages in one run, even
//! when a record qualifies for more than one kind.
//!
//! Phones enter the set only on send success; a failed send leaves the
//! record eligible for a later pass (and for the next scheduled run).
//!
//! A send success followed by a write failure is NOT rolled back: the
//! message was already delivered, so it is counted as sent while the sheet
//! keeps the stale flags. That can produce a duplicate message on the next
//! run. Known consistency gap, accepted.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Successful sends count even when the write-back fails
//! - 1.1.0: Collaborators injected as traits instead of constructed inline
//! - 1.0.0: Initial release with the three-pass process

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::time::sleep;

use crate::core::config::Config;
use crate::core::dates;
use crate::core::error::StoreError;
use crate::features::messaging::{compose, MessageKind, MessageTransport};
use crate::features::sheets::SpreadsheetStore;
use crate::features::speakers::Speaker;

/// Pause between consecutive send attempts, to stay under the provider's
/// rate limit. Pacing only; execution is strictly sequential.
const SEND_PACING: Duration = Duration::from_millis(100);

/// Minimum days since the last reminder for a day-of message. Deliberately
/// a fixed dedup threshold, not the configurable cooldown: a speaker
/// reminded four days ago should still hear from us on the day itself.
const DAY_OF_MIN_DAYS: f64 = 1.0;

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Valid records considered by the run.
    pub processed: usize,
    pub notifications: usize,
    pub reminders: usize,
    pub today_reminders: usize,
    pub errors: usize,
    pub total_messages: usize,
    /// Distinct phones messaged this run.
    pub unique_users: usize,
}

/// Process-scoped state for one invocation; discarded at exit. All
/// cross-run memory lives in the sheet's notificado/recordado columns.
#[derive(Default)]
struct RunState {
    messaged: HashSet<String>,
    stats: RunStats,
}

impl RunState {
    fn finalize(mut self) -> RunStats {
        self.stats.total_messages =
            self.stats.notifications + self.stats.reminders + self.stats.today_reminders;
        self.stats.unique_users = self.messaged.len();
        self.stats
    }
}

/// The reminder decision engine, generic over its two collaborators.
pub struct ReminderEngine<S, T> {
    store: S,
    transport: T,
    config: Config,
}

impl<S: SpreadsheetStore, T: MessageTransport> ReminderEngine<S, T> {
    pub fn new(store: S, transport: T, config: Config) -> Self {
        ReminderEngine {
            store,
            transport,
            config,
        }
    }

    /// Full pipeline: all three passes over one sheet snapshot.
    pub async fn execute_full_run(&self) -> Result<RunStats, StoreError> {
        info!(
            "starting reminder run (mode: {})",
            if self.config.twilio.use_templates {
                "templates"
            } else {
                "free text"
            }
        );

        let speakers = self.load_speakers().await?;
        let mut state = RunState::default();
        state.stats.processed = speakers.len();

        self.pass_notifications(&speakers, &mut state).await;
        self.pass_reminders(&speakers, &mut state).await;
        self.pass_day_of(&speakers, &mut state).await;

        let stats = state.finalize();
        log_summary(&stats);
        Ok(stats)
    }

    /// Pass 1 only.
    pub async fn execute_notifications_only(&self) -> Result<RunStats, StoreError> {
        let speakers = self.load_speakers().await?;
        let mut state = RunState::default();
        state.stats.processed = speakers.len();

        self.pass_notifications(&speakers, &mut state).await;
        Ok(state.finalize())
    }

    /// Passes 2 and 3 only.
    pub async fn execute_reminders_only(&self) -> Result<RunStats, StoreError> {
        let speakers = self.load_speakers().await?;
        let mut state = RunState::default();
        state.stats.processed = speakers.len();

        self.pass_reminders(&speakers, &mut state).await;
        self.pass_day_of(&speakers, &mut state).await;
        Ok(state.finalize())
    }

    /// One sheet read per run. The in-memory snapshot is never refreshed,
    /// which is safe because the messaged set prevents re-evaluating any
    /// record whose cells were written.
    async fn load_speakers(&self) -> Result<Vec<Speaker>, StoreError> {
        let rows = self.store.read_rows().await?;
        if rows.is_empty() {
            warn!("no rows to process");
        }
        let speakers = Speaker::from_rows(&rows);
        info!(
            "{} valid speakers (today: {})",
            speakers.len(),
            dates::to_storage_format(dates::today())
        );
        Ok(speakers)
    }

    /// Pass 1: first-contact notifications for anyone not yet notified.
    async fn pass_notifications(&self, speakers: &[Speaker], state: &mut RunState) {
        info!("pass 1: initial notifications");

        for speaker in speakers {
            if state.messaged.contains(&speaker.phone) {
                debug!("{} - already messaged this run", speaker.name);
                continue;
            }
            if speaker.has_been_notified(&self.config.business) {
                debug!("{} - already notified", speaker.name);
                continue;
            }

            info!(
                "{} ({}) - notified flag {:?}, sending notification",
                speaker.name,
                speaker.formatted_phone(),
                speaker.notified_flag
            );
            if self.send(MessageKind::Notification, speaker, state).await {
                // First contact also establishes the cooldown baseline.
                self.write_back(speaker.row_index, "notificado", &self.config.business.yes_marker, state)
                    .await;
                self.write_back(speaker.row_index, "recordado", &today_storage(), state)
                    .await;
                state.stats.notifications += 1;
            }
        }
    }

    /// Pass 2: advance reminders inside the window, gated by the cooldown.
    async fn pass_reminders(&self, speakers: &[Speaker], state: &mut RunState) {
        info!(
            "pass 2: advance reminders (1-{} days)",
            self.config.business.reminder_days_limit
        );

        for speaker in speakers {
            if state.messaged.contains(&speaker.phone) {
                debug!("{} - already messaged this run", speaker.name);
                continue;
            }
            if !speaker.preaches_soon(&self.config.business) {
                continue;
            }

            let days_until = speaker.days_until_preaching().unwrap_or_default();
            info!(
                "{} ({}) - preaches in {} days",
                speaker.name,
                speaker.formatted_phone(),
                days_until.round()
            );

            if !speaker.can_receive_reminder(&self.config.business) {
                // Cooldown still active: a skip, not an error.
                let days_since = speaker.days_since_last_reminder().unwrap_or_default();
                info!(
                    "{} - cooldown active ({} days since last reminder)",
                    speaker.name,
                    days_since.round()
                );
                continue;
            }

            if self.send(MessageKind::Reminder, speaker, state).await {
                self.write_back(speaker.row_index, "recordado", &today_storage(), state)
                    .await;
                state.stats.reminders += 1;
            }
        }
    }

    /// Pass 3: day-of messages, gated by the fixed one-day dedup threshold.
    async fn pass_day_of(&self, speakers: &[Speaker], state: &mut RunState) {
        info!("pass 3: day-of reminders");

        for speaker in speakers {
            if state.messaged.contains(&speaker.phone) {
                debug!("{} - already messaged this run", speaker.name);
                continue;
            }
            if !speaker.preaches_today() {
                continue;
            }

            info!("{} preaches TODAY", speaker.name);

            let can_send = match speaker.days_since_last_reminder() {
                None => true,
                Some(days) => days >= DAY_OF_MIN_DAYS,
            };
            if !can_send {
                info!("{} - already reminded today", speaker.name);
                continue;
            }

            if self.send(MessageKind::DayOf, speaker, state).await {
                self.write_back(speaker.row_index, "recordado", &today_storage(), state)
                    .await;
                state.stats.today_reminders += 1;
            }
        }
    }

    /// Compose and send one message. On success the phone joins the
    /// messaged set and `true` is returned; on any failure the error
    /// counter is bumped and the record stays eligible.
    async fn send(&self, kind: MessageKind, speaker: &Speaker, state: &mut RunState) -> bool {
        let message = match compose(kind, speaker, &self.config.twilio) {
            Ok(message) => message,
            Err(e) => {
                error!("cannot compose {} for {}: {e}", kind.label(), speaker.name);
                state.stats.errors += 1;
                return false;
            }
        };

        let result = self.transport.send(&message).await;
        sleep(SEND_PACING).await;

        match result {
            Ok(sid) => {
                info!("{} sent to {} (sid {sid})", kind.label(), speaker.name);
                state.messaged.insert(speaker.phone.clone());
                true
            }
            Err(e) => {
                error!("failed to send {} to {}: {e}", kind.label(), speaker.name);
                state.stats.errors += 1;
                false
            }
        }
    }

    /// Write one cell after a successful send. Failures are logged and
    /// counted, never rolled back: the message is already out.
    async fn write_back(&self, row_index: usize, column: &str, value: &str, state: &mut RunState) {
        if let Err(e) = self.store.write_cell(row_index, column, value).await {
            warn!(
                "write-back failed (row {}, column {column}): {e} - message already delivered, \
                 flags stay stale until the next run",
                row_index + 2
            );
            state.stats.errors += 1;
        }
    }
}

fn today_storage() -> String {
    dates::to_storage_format(dates::today())
}

fn log_summary(stats: &RunStats) {
    info!("run complete");
    info!("  processed:       {}", stats.processed);
    info!("  notifications:   {}", stats.notifications);
    info!("  reminders:       {}", stats.reminders);
    info!("  day-of messages: {}", stats.today_reminders);
    info!("  errors:          {}", stats.errors);
    info!(
        "  total: {} messages to {} users",
        stats.total_messages, stats.unique_users
    );
}
