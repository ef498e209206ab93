use crate::types::{
    FeatureImportance, LightCurveData, PredictionLabel, PredictionRequest, ShapValues,
};
use once_cell::sync::Lazy;

static SAMPLE_TEST_DATA: Lazy<PredictionRequest> = Lazy::new(|| PredictionRequest {
    prediction: PredictionLabel::Exoplanet,
    confidence: 0.85,
    cnn_confidence: Some(0.82),
    lgb_confidence: Some(0.88),
    feature_importance: Some(
        [
            ("transit_depth", 0.35),
            ("duration", 0.28),
            ("period", 0.22),
            ("snr", 0.15),
        ]
        .into_iter()
        .collect::<FeatureImportance>(),
    ),
    key_features: Some(
        ["transit_depth", "duration", "period", "snr"]
            .map(String::from)
            .to_vec(),
    ),
    light_curve_data: Some(LightCurveData {
        x: (0..13).map(f64::from).collect(),
        y: vec![
            1.0, 0.99, 0.98, 0.85, 0.82, 0.8, 0.84, 0.97, 0.99, 1.0, 0.99, 1.0, 0.98,
        ],
    }),
    shap_values: Some(ShapValues {
        values: vec![0.35, 0.28, 0.22, 0.15, -0.05],
        features: ["transit_depth", "duration", "period", "snr", "noise_level"]
            .map(String::from)
            .to_vec(),
    }),
    extra: serde_json::Map::new(),
});

/// Canonical example payload used to prefill the input form.
pub fn sample_test_data() -> &'static PredictionRequest {
    &SAMPLE_TEST_DATA
}

pub fn sample_test_json() -> String {
    serde_json::to_string_pretty(sample_test_data()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    #[test]
    fn sample_json_passes_validation() {
        let parsed = validate(&sample_test_json()).unwrap();
        assert_eq!(&parsed, sample_test_data());
    }

    #[test]
    fn sample_keeps_feature_order() {
        let json = sample_test_json();
        let depth = json.find("\"transit_depth\": 0.35").unwrap();
        let snr = json.find("\"snr\": 0.15").unwrap();
        assert!(depth < snr);
    }

    #[test]
    fn sample_light_curve_has_thirteen_points() {
        let curve = sample_test_data().light_curve_data.as_ref().unwrap();
        assert_eq!(curve.x.len(), 13);
        assert_eq!(curve.y.len(), 13);
        assert_eq!(curve.y[5], 0.8);
    }
}
