//! Sequential reminder delivery.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use relance_channels::{Channel, OutboundReminder};
use relance_core::template;
use relance_store::{ClientStore, StoreError};

use crate::report::{ChannelOutcome, ClientOutcome, DispatchErrorDetail, RunReport};
use crate::selector::select_due_clients;

/// Drives one dispatch run: select, send through every configured channel,
/// mark successes.
///
/// Holds everything it needs explicitly — channels are resolved from config
/// by the caller once per invocation, never from module state. Clients are
/// processed strictly sequentially so the pacing delay actually throttles
/// the shared outbound path.
pub struct Dispatcher {
    store: Arc<dyn ClientStore>,
    channels: Vec<Arc<dyn Channel>>,
    pace: Duration,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn ClientStore>,
        channels: Vec<Arc<dyn Channel>>,
        pace: Duration,
    ) -> Self {
        Self {
            store,
            channels,
            pace,
        }
    }

    /// Run one dispatch pass. `now` anchors both the eligibility window and
    /// the last-sent markers written for successful sends, so a report's
    /// markers always equal the run's own timestamp.
    ///
    /// A store failure during selection is fatal. Everything after that —
    /// validation failures, channel errors, marker-write errors — is recorded
    /// per client and the loop always reaches the next client.
    pub async fn run(&self, now: DateTime<Utc>, verbose: bool) -> Result<RunReport, StoreError> {
        let clients = select_due_clients(self.store.as_ref(), now).await?;
        info!(due = clients.len(), "dispatch run started");

        let mut results = Vec::with_capacity(clients.len());
        let mut errors = Vec::new();
        let mut calls_made = 0usize;

        for client in &clients {
            let started = Instant::now();
            let message = template::render(&client.message_relance, &client.prenom);

            if message.is_empty() {
                warn!(client_id = %client.id, "empty rendered message — nothing to send");
                if verbose {
                    errors.push(DispatchErrorDetail {
                        client: client.display_name(),
                        channel: "template".to_string(),
                        error: "rendered message is empty".to_string(),
                    });
                }
                results.push(ClientOutcome {
                    client_id: client.id.clone(),
                    name: client.display_name(),
                    telephone: client.telephone.clone(),
                    sent: false,
                    channels: Vec::new(),
                    error: Some("rendered message is empty".to_string()),
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
                continue;
            }

            let reminder = OutboundReminder {
                client_id: client.id.clone(),
                prenom: client.prenom.clone(),
                nom: client.nom.clone(),
                telephone: client.telephone.clone(),
                message,
            };

            let mut channel_outcomes = Vec::with_capacity(self.channels.len());
            let mut any_sent = false;

            for channel in &self.channels {
                // Pace every provider call except the very first of the run.
                if calls_made > 0 && !self.pace.is_zero() {
                    tokio::time::sleep(self.pace).await;
                }
                calls_made += 1;

                match channel.send(&reminder).await {
                    Ok(()) => {
                        any_sent = true;
                        channel_outcomes.push(ChannelOutcome {
                            channel: channel.name(),
                            sent: true,
                            error: None,
                        });
                    }
                    Err(e) => {
                        warn!(
                            client_id = %client.id,
                            channel = channel.name(),
                            error = %e,
                            "channel send failed"
                        );
                        if verbose {
                            errors.push(DispatchErrorDetail {
                                client: client.display_name(),
                                channel: channel.name().to_string(),
                                error: e.to_string(),
                            });
                        }
                        channel_outcomes.push(ChannelOutcome {
                            channel: channel.name(),
                            sent: false,
                            error: Some(e.to_string()),
                        });
                    }
                }
            }

            if any_sent {
                // A lost marker write is logged only; the client simply stays
                // eligible for the next run (at-least-once, not exactly-once).
                if let Err(e) = self.store.mark_sent(&client.id, now).await {
                    warn!(client_id = %client.id, error = %e, "failed to record last-sent marker");
                }
            }

            results.push(ClientOutcome {
                client_id: client.id.clone(),
                name: client.display_name(),
                telephone: client.telephone.clone(),
                sent: any_sent,
                channels: channel_outcomes,
                error: None,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }

        let report = RunReport::new(results, if verbose { errors } else { Vec::new() });
        info!(
            total = report.total,
            sent = report.sent,
            failed = report.failed,
            "dispatch run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{client_due, MemoryStore, StubChannel};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn dispatcher(
        store: Arc<MemoryStore>,
        channels: Vec<Arc<dyn Channel>>,
    ) -> Dispatcher {
        Dispatcher::new(store, channels, Duration::ZERO)
    }

    #[tokio::test]
    async fn all_sent_and_marked_with_run_timestamp() {
        let now = utc("2025-07-15T10:00:00Z");
        let store = Arc::new(MemoryStore::with_clients(vec![
            client_due("a", Some(utc("2025-07-14T08:00:00Z")), None),
            client_due("b", Some(utc("2025-07-15T08:00:00Z")), None),
        ]));
        let sms = Arc::new(StubChannel::ok("sms"));

        let report = dispatcher(store.clone(), vec![sms.clone() as Arc<dyn Channel>])
            .run(now, false)
            .await
            .unwrap();

        assert_eq!((report.total, report.sent, report.failed), (2, 2, 0));
        assert_eq!(store.get("a").unwrap().relance_envoyee_at, Some(now));
        assert_eq!(store.get("b").unwrap().relance_envoyee_at, Some(now));
        assert_eq!(sms.delivered.lock().unwrap().len(), 2);

        // An immediate second run the same day selects nobody.
        let second = dispatcher(store, vec![sms as Arc<dyn Channel>])
            .run(now, false)
            .await
            .unwrap();
        assert_eq!(second.total, 0);
    }

    #[tokio::test]
    async fn channel_failure_leaves_client_eligible() {
        let now = utc("2025-07-15T10:00:00Z");
        let store = Arc::new(MemoryStore::with_clients(vec![
            client_due("ok", Some(utc("2025-07-14T08:00:00Z")), None),
            client_due("ko", Some(utc("2025-07-14T08:00:00Z")), None),
        ]));
        let sms = Arc::new(StubChannel::failing_for("sms", &["ko"]));

        let report = dispatcher(store.clone(), vec![sms as Arc<dyn Channel>])
            .run(now, false)
            .await
            .unwrap();

        assert_eq!((report.sent, report.failed), (1, 1));
        assert_eq!(store.get("ok").unwrap().relance_envoyee_at, Some(now));
        assert_eq!(store.get("ko").unwrap().relance_envoyee_at, None);

        let still_due = select_due_clients(store.as_ref(), now).await.unwrap();
        assert_eq!(still_due.len(), 1);
        assert_eq!(still_due[0].id, "ko");
    }

    #[tokio::test]
    async fn lost_marker_write_keeps_the_client_counted_as_sent() {
        let now = utc("2025-07-15T10:00:00Z");
        let store = Arc::new(MemoryStore::failing_mark_sent(vec![client_due(
            "a",
            Some(utc("2025-07-14T08:00:00Z")),
            None,
        )]));
        let sms = Arc::new(StubChannel::ok("sms"));

        let report = dispatcher(store.clone(), vec![sms.clone() as Arc<dyn Channel>])
            .run(now, false)
            .await
            .unwrap();

        // The delivery happened; the failed marker write only means the
        // client stays eligible for the next run.
        assert_eq!((report.sent, report.failed), (1, 0));
        assert!(report.results[0].sent);
        assert_eq!(sms.delivered.lock().unwrap().len(), 1);
        assert_eq!(store.get("a").unwrap().relance_envoyee_at, None);
    }

    #[tokio::test(start_paused = true)]
    async fn pace_delays_every_call_after_the_first() {
        let now = utc("2025-07-15T10:00:00Z");
        let store = Arc::new(MemoryStore::with_clients(vec![
            client_due("a", Some(utc("2025-07-14T08:00:00Z")), None),
            client_due("b", Some(utc("2025-07-14T08:00:00Z")), None),
        ]));
        let sms = Arc::new(StubChannel::ok("sms"));
        let email = Arc::new(StubChannel::ok("email"));
        let pace = Duration::from_millis(500);
        let start = tokio::time::Instant::now();

        Dispatcher::new(
            store,
            vec![sms.clone() as Arc<dyn Channel>, email.clone() as Arc<dyn Channel>],
            pace,
        )
        .run(now, false)
        .await
        .unwrap();

        // 2 clients × 2 channels = 4 calls, so 3 paced gaps and none before
        // the first call.
        let sms_calls = sms.call_instants.lock().unwrap();
        let email_calls = email.call_instants.lock().unwrap();
        let mut offsets: Vec<Duration> = sms_calls
            .iter()
            .chain(email_calls.iter())
            .map(|instant| *instant - start)
            .collect();
        offsets.sort();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(500),
                Duration::from_millis(1000),
                Duration::from_millis(1500),
            ]
        );
    }

    #[tokio::test]
    async fn one_channel_success_is_enough() {
        let now = utc("2025-07-15T10:00:00Z");
        let store = Arc::new(MemoryStore::with_clients(vec![client_due(
            "a",
            Some(utc("2025-07-14T08:00:00Z")),
            None,
        )]));
        let sms = Arc::new(StubChannel::failing_for("sms", &["a"]));
        let email = Arc::new(StubChannel::ok("email"));

        let report = dispatcher(
            store.clone(),
            vec![sms as Arc<dyn Channel>, email as Arc<dyn Channel>],
        )
            .run(now, false)
            .await
            .unwrap();

        assert_eq!((report.sent, report.failed), (1, 0));
        let outcome = &report.results[0];
        assert!(outcome.sent);
        assert!(!outcome.channels[0].sent);
        assert!(outcome.channels[1].sent);
        assert_eq!(store.get("a").unwrap().relance_envoyee_at, Some(now));
    }

    #[tokio::test]
    async fn empty_rendered_message_is_a_recorded_failure() {
        let now = utc("2025-07-15T10:00:00Z");
        let mut client = client_due("a", Some(utc("2025-07-14T08:00:00Z")), None);
        client.message_relance = "   ".to_string();
        let store = Arc::new(MemoryStore::with_clients(vec![client]));
        let sms = Arc::new(StubChannel::ok("sms"));

        let report = dispatcher(store.clone(), vec![sms.clone() as Arc<dyn Channel>])
            .run(now, false)
            .await
            .unwrap();

        assert_eq!((report.sent, report.failed), (0, 1));
        assert!(report.results[0].error.is_some());
        assert!(sms.delivered.lock().unwrap().is_empty());
        // No marker — the client stays eligible.
        assert_eq!(store.get("a").unwrap().relance_envoyee_at, None);
    }

    #[tokio::test]
    async fn verbose_run_collects_error_detail() {
        let now = utc("2025-07-15T10:00:00Z");
        let store = Arc::new(MemoryStore::with_clients(vec![client_due(
            "ko",
            Some(utc("2025-07-14T08:00:00Z")),
            None,
        )]));
        let sms = Arc::new(StubChannel::failing_for("sms", &["ko"]));

        let report = dispatcher(store, vec![sms as Arc<dyn Channel>])
            .run(now, true)
            .await
            .unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].channel, "sms");

        // Non-verbose runs keep the aggregate but drop the detail.
        assert!(report.results[0].channels[0].error.is_some());
    }

    #[tokio::test]
    async fn selection_failure_is_fatal() {
        let store = Arc::new(MemoryStore::failing());
        let sms: Arc<dyn Channel> = Arc::new(StubChannel::ok("sms"));
        let result = dispatcher(store, vec![sms])
            .run(utc("2025-07-15T10:00:00Z"), false)
            .await;
        assert!(result.is_err());
    }
}
