//! Off-thread delivery of submissions.

use super::controller::Submission;
use crate::domain::{FormKind, SubmitError, SubmitResult};
use crate::infrastructure::{Endpoints, Transport};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, error};

/// Outcome of one delivered submission, routed back to its form.
#[derive(Debug)]
pub struct Completion {
    pub ticket: u64,
    pub kind: FormKind,
    pub outcome: SubmitResult,
}

/// Delivers each submission on its own worker thread and collects the outcomes.
///
/// Requests are never cancelled; dropping the dispatcher only discards outcomes
/// that arrive afterwards.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            transport,
            endpoints,
            tx,
            rx,
        }
    }

    pub fn endpoint(&self, kind: FormKind) -> &str {
        match kind {
            FormKind::Contact => &self.endpoints.contact,
            FormKind::Newsletter => &self.endpoints.newsletter,
        }
    }

    pub fn dispatch(&self, submission: Submission) {
        let transport = Arc::clone(&self.transport);
        let url = self.endpoint(submission.kind).to_string();
        let tx = self.tx.clone();

        debug!(form = %submission.kind, ticket = submission.ticket, %url, "dispatching");
        let spawned = thread::Builder::new()
            .name(format!("submit-{}-{}", submission.kind, submission.ticket))
            .spawn({
                let submission = submission.clone();
                move || {
                    let outcome = transport.post_json(&url, &submission.payload);
                    let _ = tx.send(Completion {
                        ticket: submission.ticket,
                        kind: submission.kind,
                        outcome,
                    });
                }
            });

        if let Err(err) = spawned {
            error!(form = %submission.kind, error = %err, "could not start submission worker");
            let _ = self.tx.send(Completion {
                ticket: submission.ticket,
                kind: submission.kind,
                outcome: Err(SubmitError::Transport(err.to_string())),
            });
        }
    }

    /// Returns every outcome that has arrived so far without blocking.
    pub fn drain(&self) -> Vec<Completion> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Records every request and answers with a fixed outcome.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub calls: Mutex<Vec<(String, serde_json::Value)>>,
        pub reject_with: Option<u16>,
    }

    impl RecordingTransport {
        pub fn rejecting(status: u16) -> Self {
            Self {
                reject_with: Some(status),
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Transport for RecordingTransport {
        fn post_json(&self, url: &str, body: &serde_json::Value) -> SubmitResult {
            self.calls.lock().unwrap().push((url.to_string(), body.clone()));
            match self.reject_with {
                Some(status) => Err(SubmitError::Rejected { status }),
                None => Ok(()),
            }
        }
    }

    pub(crate) fn test_endpoints() -> Endpoints {
        Endpoints {
            contact: "https://relay.test/f/contact".to_string(),
            newsletter: "https://site.test/api/newsletter".to_string(),
        }
    }

    pub(crate) fn wait_for(dispatcher: &Dispatcher, count: usize) -> Vec<Completion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut completions = Vec::new();
        while completions.len() < count && Instant::now() < deadline {
            completions.extend(dispatcher.drain());
            thread::sleep(Duration::from_millis(5));
        }
        completions
    }

    #[test]
    fn test_each_dispatch_makes_one_call_to_the_form_endpoint() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), test_endpoints());

        dispatcher.dispatch(Submission {
            ticket: 1,
            kind: FormKind::Newsletter,
            payload: serde_json::json!({ "email": "a@b.com" }),
        });
        let completions = wait_for(&dispatcher, 1);

        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].ticket, 1);
        assert_eq!(completions[0].kind, FormKind::Newsletter);
        assert!(completions[0].outcome.is_ok());

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://site.test/api/newsletter");
        assert_eq!(calls[0].1, serde_json::json!({ "email": "a@b.com" }));
    }

    #[test]
    fn test_rejection_is_reported_as_outcome() {
        let transport = Arc::new(RecordingTransport::rejecting(500));
        let dispatcher = Dispatcher::new(transport, test_endpoints());

        dispatcher.dispatch(Submission {
            ticket: 7,
            kind: FormKind::Contact,
            payload: serde_json::json!({}),
        });
        let completions = wait_for(&dispatcher, 1);

        assert!(matches!(
            completions[0].outcome,
            Err(SubmitError::Rejected { status: 500 })
        ));
    }

    #[test]
    fn test_drain_is_empty_without_dispatches() {
        let dispatcher = Dispatcher::new(Arc::new(RecordingTransport::default()), test_endpoints());
        assert!(dispatcher.drain().is_empty());
    }
}
