pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod sample;
pub mod session;
pub mod state;
pub mod types;
pub mod validator;

pub use crate::client::{PredictionClient, SubmissionError};
pub use crate::config::Config;
pub use crate::error::{AnalysisError, SessionError};
pub use crate::sample::{sample_test_data, sample_test_json};
pub use crate::session::{SessionController, SessionState, SubmissionTicket};
pub use crate::state::AppState;
pub use crate::types::*;
pub use crate::validator::{ValidationError, validate};

pub use actix_web;
pub use log;
pub use reqwest;
