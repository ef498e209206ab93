use crate::session::SessionState;
use crate::types::PredictionResponse;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Everything the dashboard page needs for one render.
pub struct DashboardView<'a> {
    pub state: &'a SessionState,
    pub updated_at: DateTime<Utc>,
    pub input: &'a str,
    pub api_base_url: &'a str,
    pub notice: Option<&'a str>,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `transit_depth` -> `Transit depth`
pub fn humanize_feature(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn render_dashboard(view: &DashboardView<'_>) -> String {
    let loading = view.state.is_loading();
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Cosmic Lens Detect</title>\n</head>\n<body>\n\
         <header><h1>Cosmic Lens Detect</h1>\
         <p>Exoplanet detection from ensemble model output.</p></header>\n",
    );

    html.push_str("<section id=\"input\">\n<h2>Model Prediction Input</h2>\n");
    if let Some(notice) = view.notice {
        let _ = writeln!(html, "<p class=\"notice\">{}</p>", escape_html(notice));
    }
    let disabled = if loading { " disabled" } else { "" };
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/analyze\">\n\
         <label for=\"payload\">Prediction Data (JSON)</label>\n\
         <textarea id=\"payload\" name=\"payload\" rows=\"20\" cols=\"80\"{disabled}>{}</textarea>\n\
         <button type=\"submit\"{disabled}>{}</button>\n\
         <a href=\"/sample\">Load Sample</a>\n</form>\n",
        escape_html(view.input),
        if loading { "Processing..." } else { "Analyze Prediction" },
    );
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/reset\"><button type=\"submit\">Clear</button></form>\n\
         <p class=\"backend\">Backend: <code>{}</code></p>\n</section>\n",
        escape_html(view.api_base_url)
    );

    html.push_str("<section id=\"results\">\n");
    match view.state {
        SessionState::Idle => html.push_str(
            "<p>Submit your ML model predictions to see detailed analysis and visualizations</p>\n",
        ),
        SessionState::Loading => {
            html.push_str("<p class=\"loading\">Analyzing prediction data...</p>\n")
        }
        SessionState::Failure(message) => {
            let _ = writeln!(
                html,
                "<div class=\"error\"><strong>Error:</strong> {}</div>",
                escape_html(message)
            );
        }
        SessionState::Success(result) => render_result(&mut html, result),
    }
    let _ = writeln!(
        html,
        "<p class=\"updated\">Updated {}</p>\n</section>",
        view.updated_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    );

    html.push_str("</body>\n</html>\n");
    html
}

fn render_result(html: &mut String, result: &PredictionResponse) {
    let _ = write!(
        html,
        "<div class=\"detection\">\n<h2>Detection Result <span class=\"badge\">{}</span></h2>\n\
         <p>Overall Confidence: <strong>{}</strong></p>\n\
         <p>CNN Model: {}</p>\n<p>LightGBM Model: {}</p>\n</div>\n",
        escape_html(result.prediction.as_str()),
        percent(result.confidence),
        percent(result.cnn_confidence),
        percent(result.lgb_confidence),
    );

    html.push_str("<div class=\"importance\">\n<h2>Feature Importance</h2>\n<ol>\n");
    for (feature, weight) in result.feature_importance.ranked() {
        let _ = writeln!(
            html,
            "<li>{}: {}</li>",
            escape_html(&humanize_feature(feature)),
            percent(weight)
        );
    }
    html.push_str("</ol>\n");
    if !result.key_features.is_empty() {
        let names: Vec<String> = result
            .key_features
            .iter()
            .map(|name| escape_html(name))
            .collect();
        let _ = writeln!(html, "<p>Key features: {}</p>", names.join(", "));
    }
    html.push_str("</div>\n");

    if let Some(visualizations) = &result.visualizations {
        let _ = write!(
            html,
            "<div class=\"visualizations\">\n\
             <figure><figcaption>Light Curve Analysis</figcaption>\
             <img src=\"{}\" alt=\"Light Curve\"></figure>\n\
             <figure><figcaption>SHAP Feature Analysis</figcaption>\
             <img src=\"{}\" alt=\"SHAP Plot\"></figure>\n</div>\n",
            escape_html(&visualizations.light_curve),
            escape_html(&visualizations.shap_plot),
        );
    }
}
