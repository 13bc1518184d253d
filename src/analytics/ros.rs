//! Return-on-sell bands used to colour profitability.

use serde::{Deserialize, Serialize};

/// A half-open range `[min, max)` of ROS percentages. Either bound may be
/// left open.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RosBand {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl RosBand {
    pub fn new(id: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            min,
            max,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value < max)
    }

    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Low below 12%, mid up to 20%, high from 20%.
pub fn default_bands() -> Vec<RosBand> {
    vec![
        RosBand {
            label: Some("Low".into()),
            ..RosBand::new("low", None, Some(12.0))
        },
        RosBand {
            label: Some("Mid".into()),
            ..RosBand::new("mid", Some(12.0), Some(20.0))
        },
        RosBand {
            label: Some("High".into()),
            ..RosBand::new("high", Some(20.0), None)
        },
    ]
}

/// First band containing `value`.
pub fn ros_band(value: Option<f64>, bands: Option<&[RosBand]>) -> Option<&RosBand> {
    let value = value.filter(|v| v.is_finite())?;
    bands?.iter().find(|band| band.contains(value))
}

/// Margin as a percentage of sell; `None` when there is no sell.
pub fn ros_percent(sell: f64, margin: f64) -> Option<f64> {
    if sell == 0.0 || !sell.is_finite() || !margin.is_finite() {
        return None;
    }
    Some(margin / sell * 100.0)
}
