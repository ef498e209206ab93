use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionLabel {
    #[serde(rename = "Exoplanet")]
    Exoplanet,
    #[serde(rename = "Not Exoplanet")]
    NotExoplanet,
}

impl PredictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Exoplanet => "Exoplanet",
            PredictionLabel::NotExoplanet => "Not Exoplanet",
        }
    }

    pub fn from_literal(value: &str) -> Option<Self> {
        match value {
            "Exoplanet" => Some(PredictionLabel::Exoplanet),
            "Not Exoplanet" => Some(PredictionLabel::NotExoplanet),
            _ => None,
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature name to weight, kept in the order the keys appeared in the JSON.
///
/// A repeated key keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureImportance(Vec<(String, f64)>);

impl FeatureImportance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, weight: f64) {
        let feature = feature.into();
        match self.0.iter_mut().find(|(name, _)| *name == feature) {
            Some(entry) => entry.1 = weight,
            None => self.0.push((feature, weight)),
        }
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, weight)| *weight)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    /// Entries sorted by weight, highest first. Ties keep insertion order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureImportance {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut importance = FeatureImportance::new();
        for (feature, weight) in iter {
            importance.insert(feature, weight);
        }
        importance
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (feature, weight) in &self.0 {
            map.serialize_entry(feature, weight)?;
        }
        map.end()
    }
}

struct FeatureImportanceVisitor;

impl<'de> Visitor<'de> for FeatureImportanceVisitor {
    type Value = FeatureImportance;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of feature names to numeric weights")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut importance = FeatureImportance::new();
        while let Some((feature, weight)) = access.next_entry::<String, f64>()? {
            importance.insert(feature, weight);
        }
        Ok(importance)
    }
}

impl<'de> Deserialize<'de> for FeatureImportance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FeatureImportanceVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapValues {
    pub values: Vec<f64>,
    pub features: Vec<String>,
}

/// Model output submitted to the prediction service.
///
/// Only `prediction` and `confidence` are required; the remaining fields are
/// forwarded as entered and omitted when absent. Unknown keys ride along in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub prediction: PredictionLabel,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnn_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lgb_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<FeatureImportance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_curve_data: Option<LightCurveData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shap_values: Option<ShapValues>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualizations {
    pub light_curve: String,
    pub shap_plot: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: PredictionLabel,
    pub confidence: f64,
    pub cnn_confidence: f64,
    pub lgb_confidence: f64,
    #[serde(default)]
    pub feature_importance: FeatureImportance,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub visualizations: Option<Visualizations>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
