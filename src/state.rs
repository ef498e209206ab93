use crate::client::PredictionClient;
use crate::config::Config;
use crate::session::SessionController;
use reqwest::Client;
use std::sync::Mutex;

pub struct AppState {
    pub config: Config,
    pub client: PredictionClient,
    pub session: Mutex<SessionController>,
}

impl AppState {
    pub fn new(config: Config, http: Client) -> Self {
        let client = PredictionClient::new(http, &config.api_base_url);
        Self {
            config,
            client,
            session: Mutex::new(SessionController::new()),
        }
    }
}
