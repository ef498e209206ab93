use crate::client::PredictionClient;
use crate::error::{AnalysisError, SessionError};
use crate::types::PredictionResponse;
use crate::validator::validate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading,
    Success(PredictionResponse),
    Failure(String),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// Identifies one request cycle so a late outcome cannot overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(Uuid);

impl fmt::Display for SubmissionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    in_flight: Option<SubmissionTicket>,
    abandoned: Option<SubmissionTicket>,
    updated_at: DateTime<Utc>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            in_flight: None,
            abandoned: None,
            updated_at: Utc::now(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Enters `Loading`, discarding any previous result or error.
    ///
    /// Refuses to start a second cycle while one is still in flight, including
    /// a cycle abandoned by [`reset`](Self::reset) that has not settled yet.
    pub fn begin(&mut self) -> Result<SubmissionTicket, SessionError> {
        if self.state.is_loading() || self.abandoned.is_some() {
            return Err(SessionError::ConcurrentSubmission);
        }
        let ticket = SubmissionTicket(Uuid::new_v4());
        self.in_flight = Some(ticket);
        self.transition(SessionState::Loading);
        Ok(ticket)
    }

    /// Applies the outcome of the cycle identified by `ticket`. Returns
    /// `false` and leaves the state alone when the ticket is stale.
    pub fn finish(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResponse, AnalysisError>,
    ) -> bool {
        if self.abandoned == Some(ticket) {
            log::debug!("Abandoned submission {ticket} settled");
            self.abandoned = None;
            return false;
        }
        if self.in_flight != Some(ticket) {
            log::debug!("Discarding outcome of stale submission {ticket}");
            return false;
        }
        self.in_flight = None;
        let next = match outcome {
            Ok(response) => SessionState::Success(response),
            Err(err) => SessionState::Failure(err.to_string()),
        };
        self.transition(next);
        true
    }

    /// Back to `Idle`. An in-flight cycle's outcome will be discarded, and no
    /// new cycle can begin until that outcome arrives.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            self.abandoned = Some(ticket);
        }
        self.transition(SessionState::Idle);
    }

    fn transition(&mut self, next: SessionState) {
        self.state = next;
        self.updated_at = Utc::now();
    }
}

fn lock(session: &Mutex<SessionController>) -> MutexGuard<'_, SessionController> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Settles a cycle as cancelled if its future is dropped before the outcome
/// is applied.
struct PendingCycle<'a> {
    session: &'a Mutex<SessionController>,
    ticket: SubmissionTicket,
    settled: bool,
}

impl PendingCycle<'_> {
    fn settle(mut self, outcome: Result<PredictionResponse, AnalysisError>) {
        self.settled = true;
        lock(self.session).finish(self.ticket, outcome);
    }
}

impl Drop for PendingCycle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("Submission {} cancelled before completion", self.ticket);
            lock(self.session).finish(self.ticket, Err(AnalysisError::Cancelled));
        }
    }
}

/// Runs one request cycle against a shared session: `Loading`, validation,
/// at most one call to the prediction service, then `Success` or `Failure`.
///
/// The lock is released while the request is in flight so the `Loading`
/// state stays observable.
pub async fn submit(
    session: &Mutex<SessionController>,
    client: &PredictionClient,
    raw_text: &str,
) -> Result<SubmissionTicket, SessionError> {
    let ticket = lock(session).begin()?;
    log::info!("Submission {ticket} started");
    let pending = PendingCycle {
        session,
        ticket,
        settled: false,
    };

    let outcome = match validate(raw_text) {
        Ok(payload) => client.submit(&payload).await.map_err(AnalysisError::from),
        Err(err) => {
            log::warn!("Submission {ticket} rejected: {err}");
            Err(err.into())
        }
    };

    match &outcome {
        Ok(response) => log::info!(
            "Submission {ticket} succeeded: {} ({:.1}%)",
            response.prediction,
            response.confidence * 100.0
        ),
        Err(err) => log::info!("Submission {ticket} failed: {err}"),
    }

    pending.settle(outcome);
    Ok(ticket)
}

/// Runs `f` against the current session under the lock.
pub fn with_session<T>(
    session: &Mutex<SessionController>,
    f: impl FnOnce(&SessionController) -> T,
) -> T {
    f(&lock(session))
}

/// Clears the session back to `Idle`.
pub fn reset(session: &Mutex<SessionController>) {
    lock(session).reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SubmissionError;
    use crate::types::{FeatureImportance, PredictionLabel};
    use crate::validator::ValidationError;

    fn response() -> PredictionResponse {
        PredictionResponse {
            prediction: PredictionLabel::Exoplanet,
            confidence: 0.9,
            cnn_confidence: 0.88,
            lgb_confidence: 0.92,
            feature_importance: [("transit_depth", 0.35)]
                .into_iter()
                .collect::<FeatureImportance>(),
            key_features: vec!["transit_depth".into()],
            visualizations: None,
            error: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn starts_idle() {
        let controller = SessionController::new();
        assert_eq!(controller.state(), &SessionState::Idle);
    }

    #[test]
    fn begin_enters_loading() {
        let mut controller = SessionController::new();
        controller.begin().unwrap();
        assert_eq!(controller.state(), &SessionState::Loading);
    }

    #[test]
    fn success_outcome_is_stored() {
        let mut controller = SessionController::new();
        let ticket = controller.begin().unwrap();
        assert!(controller.finish(ticket, Ok(response())));
        assert_eq!(controller.state(), &SessionState::Success(response()));
    }

    #[test]
    fn failure_outcome_keeps_only_the_message() {
        let mut controller = SessionController::new();
        let ticket = controller.begin().unwrap();
        controller.finish(ticket, Err(SubmissionError::ApiError("boom".into()).into()));
        assert_eq!(
            controller.state(),
            &SessionState::Failure("API Error: boom".into())
        );
    }

    #[test]
    fn new_cycle_clears_previous_result() {
        let mut controller = SessionController::new();
        let first = controller.begin().unwrap();
        controller.finish(first, Ok(response()));

        let second = controller.begin().unwrap();
        assert_eq!(controller.state(), &SessionState::Loading);

        controller.finish(second, Err(ValidationError::InvalidConfidenceRange.into()));
        assert_eq!(
            controller.state(),
            &SessionState::Failure("Confidence must be a number between 0 and 1".into())
        );

        controller.begin().unwrap();
        assert_eq!(controller.state(), &SessionState::Loading);
    }

    #[test]
    fn rejects_begin_while_loading() {
        let mut controller = SessionController::new();
        let ticket = controller.begin().unwrap();
        assert_eq!(controller.begin(), Err(SessionError::ConcurrentSubmission));
        assert_eq!(controller.state(), &SessionState::Loading);

        assert!(controller.finish(ticket, Ok(response())));
    }

    #[test]
    fn stale_ticket_is_ignored_after_reset() {
        let mut controller = SessionController::new();
        let stale = controller.begin().unwrap();
        controller.reset();
        assert_eq!(controller.state(), &SessionState::Idle);

        assert!(!controller.finish(stale, Ok(response())));
        assert_eq!(controller.state(), &SessionState::Idle);

        let fresh = controller.begin().unwrap();
        assert!(!controller.finish(stale, Ok(response())));
        assert!(controller.finish(fresh, Ok(response())));
    }

    #[test]
    fn reset_blocks_begin_until_abandoned_cycle_settles() {
        let mut controller = SessionController::new();
        let abandoned = controller.begin().unwrap();
        controller.reset();

        assert_eq!(controller.begin(), Err(SessionError::ConcurrentSubmission));
        assert_eq!(controller.state(), &SessionState::Idle);

        assert!(!controller.finish(abandoned, Err(AnalysisError::Cancelled)));
        assert_eq!(controller.state(), &SessionState::Idle);
        assert!(controller.begin().is_ok());
    }

    #[test]
    fn reset_while_idle_does_not_block() {
        let mut controller = SessionController::new();
        controller.reset();
        assert!(controller.begin().is_ok());
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let json = serde_json::to_value(SessionState::Failure("nope".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failure", "data": "nope"}));

        let json = serde_json::to_value(SessionState::Idle).unwrap();
        assert_eq!(json, serde_json::json!({"status": "idle"}));
    }
}
