use crate::error::SessionError;
use crate::render::{DashboardView, render_dashboard};
use crate::sample::sample_test_json;
use crate::session::{self, SessionController};
use crate::state::AppState;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, http::header, web};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub payload: String,
}

fn dashboard_page(
    state: &AppState,
    input: &str,
    notice: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    let html = session::with_session(&state.session, |controller| {
        render_dashboard(&DashboardView {
            state: controller.state(),
            updated_at: controller.updated_at(),
            input,
            api_base_url: &state.config.api_base_url,
            notice,
        })
    });
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-cache"))
        .body(html)
}

fn session_json(controller: &SessionController) -> serde_json::Value {
    let mut json = serde_json::to_value(controller.state()).unwrap_or_default();
    json["updated_at"] = serde_json::json!(
        controller
            .updated_at()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    );
    json
}

pub async fn dashboard(state: web::Data<AppState>) -> impl Responder {
    dashboard_page(&state, "", None, StatusCode::OK)
}

pub async fn load_sample(state: web::Data<AppState>) -> impl Responder {
    log::debug!("Loading sample prediction into the form");
    dashboard_page(&state, &sample_test_json(), None, StatusCode::OK)
}

pub async fn analyze(state: web::Data<AppState>, form: web::Form<AnalyzeForm>) -> impl Responder {
    let raw_text = form.into_inner().payload;
    if raw_text.trim().is_empty() {
        return dashboard_page(&state, "", None, StatusCode::OK);
    }
    if state.config.debug {
        log::debug!("Form payload ({} chars):\n{}", raw_text.len(), raw_text);
    }

    match session::submit(&state.session, &state.client, &raw_text).await {
        Ok(_) => dashboard_page(&state, &raw_text, None, StatusCode::OK),
        Err(err @ SessionError::ConcurrentSubmission) => {
            log::warn!("Rejected form submission: {err}");
            dashboard_page(&state, &raw_text, Some(&err.to_string()), StatusCode::CONFLICT)
        }
    }
}

pub async fn reset(state: web::Data<AppState>) -> impl Responder {
    session::reset(&state.session);
    log::info!("Session cleared");
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

pub async fn session_state(state: web::Data<AppState>) -> impl Responder {
    let json = session::with_session(&state.session, session_json);
    HttpResponse::Ok().json(json)
}

pub async fn analyze_api(state: web::Data<AppState>, body: String) -> impl Responder {
    if body.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing payload"
        }));
    }
    if state.config.debug {
        log::debug!("API payload ({} chars):\n{}", body.len(), body);
    }

    match session::submit(&state.session, &state.client, &body).await {
        Ok(_) => {
            let json = session::with_session(&state.session, session_json);
            HttpResponse::Ok().json(json)
        }
        Err(err @ SessionError::ConcurrentSubmission) => {
            log::warn!("Rejected API submission: {err}");
            HttpResponse::Conflict().json(serde_json::json!({
                "error": err.to_string()
            }))
        }
    }
}

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "apiBaseUrl": state.config.api_base_url
    }))
}

/// Registers every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(dashboard)))
        .service(web::resource("/sample").route(web::get().to(load_sample)))
        .service(web::resource("/analyze").route(web::post().to(analyze)))
        .service(web::resource("/reset").route(web::post().to(reset)))
        .service(web::resource("/api/session").route(web::get().to(session_state)))
        .service(web::resource("/api/analyze").route(web::post().to(analyze_api)))
        .service(web::resource("/health").route(web::get().to(health)));
}
