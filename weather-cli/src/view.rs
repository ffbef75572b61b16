//! State of the search screen.
//!
//! Each search gets a sequence number; a result only lands if it belongs to the most
//! recently started search, so a slow early lookup can never overwrite a later one.

use anyhow::Result;
use weather_core::CurrentConditions;

use crate::client::WeatherSource;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading { city: String },
    Success(CurrentConditions),
    Error(String),
}

/// Handle for one started search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    city: String,
}

impl SearchTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct ClientView {
    state: ViewState,
    latest_seq: u64,
}

impl Default for ClientView {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientView {
    pub fn new() -> Self {
        Self { state: ViewState::Idle, latest_seq: 0 }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    /// Start a search for `input`.
    ///
    /// Returns `None` without touching the state for blank input, or when the same
    /// city is already in flight. A different city supersedes the pending search.
    pub fn begin(&mut self, input: &str) -> Option<SearchTicket> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }

        if matches!(&self.state, ViewState::Loading { city: pending } if pending == city) {
            return None;
        }

        self.latest_seq += 1;
        self.state = ViewState::Loading { city: city.to_string() };

        Some(SearchTicket { seq: self.latest_seq, city: city.to_string() })
    }

    /// Record the outcome of `ticket`. Returns false if a newer search has started
    /// since, in which case the outcome is dropped.
    pub fn complete(&mut self, ticket: SearchTicket, outcome: Result<CurrentConditions>) -> bool {
        if ticket.seq != self.latest_seq {
            return false;
        }

        self.state = match outcome {
            Ok(conditions) => ViewState::Success(conditions),
            Err(err) => ViewState::Error(err.to_string()),
        };
        true
    }

    /// Run one search to completion against `source`.
    pub async fn search(&mut self, source: &dyn WeatherSource, input: &str) -> bool {
        let Some(ticket) = self.begin(input) else {
            return false;
        };

        let outcome = source.fetch(ticket.city()).await;
        self.complete(ticket, outcome)
    }
}
