//! Mock lookup for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::lookup::{LookupError, PmidLookup};

/// A lookup request recorded by [`MockLookup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCall {
    Identifier(String),
    Title(String),
}

#[derive(Debug, Clone)]
struct MockReply {
    result: Result<Vec<String>, LookupError>,
    delay: Duration,
}

/// A mock lookup that returns predefined candidate lists.
///
/// Terms without a configured reply resolve to an empty list.
#[derive(Debug, Default)]
pub struct MockLookup {
    replies: Mutex<HashMap<String, MockReply>>,
    calls: Mutex<Vec<LookupCall>>,
    completed: Mutex<Vec<LookupCall>>,
}

impl MockLookup {
    /// Create a new mock lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `term` with the given candidates.
    pub fn respond(&self, term: &str, candidates: &[&str]) {
        self.respond_after(term, candidates, Duration::ZERO);
    }

    /// Answer `term` with the given candidates after a delay.
    pub fn respond_after(&self, term: &str, candidates: &[&str], delay: Duration) {
        let candidates = candidates.iter().map(|c| c.to_string()).collect();
        self.insert(
            term,
            MockReply {
                result: Ok(candidates),
                delay,
            },
        );
    }

    /// Fail lookups of `term` with the given error.
    pub fn fail(&self, term: &str, error: LookupError) {
        self.insert(
            term,
            MockReply {
                result: Err(error),
                delay: Duration::ZERO,
            },
        );
    }

    /// Requests received so far, in arrival order.
    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests whose reply has been delivered, in completion order.
    pub fn completed(&self) -> Vec<LookupCall> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn insert(&self, term: &str, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(term.to_string(), reply);
    }

    async fn answer(&self, call: LookupCall, term: &str) -> Result<Vec<String>, LookupError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(term)
            .cloned();

        let result = match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Ok(Vec::new()),
        };

        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        result
    }
}

#[async_trait]
impl PmidLookup for MockLookup {
    async fn resolve_by_identifier(&self, id: &str) -> Result<Vec<String>, LookupError> {
        self.answer(LookupCall::Identifier(id.to_string()), id).await
    }

    async fn resolve_by_title(&self, title: &str) -> Result<Vec<String>, LookupError> {
        self.answer(LookupCall::Title(title.to_string()), title).await
    }
}
