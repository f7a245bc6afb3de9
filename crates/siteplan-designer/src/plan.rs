//! Plan-generation boundary.
//!
//! Layouts are produced by an external solver. This module only defines the
//! request and response shapes and the [`PlanGenerator`] seam; the editor
//! consumes a [`PlanResult`] by replacing its whole element collection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Element, Ring};

/// Setback distances from the parcel edge, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setbacks {
    pub front_ft: f64,
    pub side_ft: f64,
    pub rear_ft: f64,
}

impl Default for Setbacks {
    fn default() -> Self {
        Self {
            front_ft: 25.0,
            side_ft: 10.0,
            rear_ft: 20.0,
        }
    }
}

/// Design goals the solver should aim for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignTargets {
    pub building_count: Option<u32>,
    pub stories: Option<u32>,
    pub target_far: Option<f64>,
    pub min_open_space_pct: Option<f64>,
}

/// Zoning limits and targets sent with a plan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    pub setbacks: Setbacks,
    /// Maximum floor-area ratio.
    pub max_far: f64,
    /// Maximum building coverage, percent of parcel area.
    pub max_coverage_pct: f64,
    /// Required parking spaces per 1000 sq ft of built area.
    pub parking_ratio: f64,
    #[serde(default)]
    pub targets: DesignTargets,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            setbacks: Setbacks::default(),
            max_far: 1.0,
            max_coverage_pct: 50.0,
            parking_ratio: 4.0,
            targets: DesignTargets::default(),
        }
    }
}

/// Raw parcel geometry plus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Parcel boundary in its source space (degrees or metres).
    pub parcel: Ring,
    pub config: PlanConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthwork {
    pub cut_cubic_yards: f64,
    pub fill_cubic_yards: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl Earthwork {
    /// Positive when there is more cut than fill.
    pub fn net_cubic_yards(&self) -> f64 {
        self.cut_cubic_yards - self.fill_cubic_yards
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    pub achieved_far: f64,
    pub site_coverage_pct: f64,
    pub parking_ratio: f64,
    pub total_built_area_sqft: f64,
    pub open_space_pct: f64,
    pub zoning_compliant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earthwork: Option<Earthwork>,
}

/// Solver output: elements in local feet plus derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub elements: Vec<Element>,
    pub metrics: PlanMetrics,
}

impl PlanResult {
    /// Decodes a solver response. Elements that break the footprint rules
    /// are rejected as a whole-response error.
    pub fn from_json(input: &str) -> Result<Self, PlanError> {
        let result: PlanResult =
            serde_json::from_str(input).map_err(|e| PlanError::InvalidResponse(e.to_string()))?;
        for element in &result.elements {
            element
                .validate()
                .map_err(|e| PlanError::InvalidResponse(format!("element {}: {}", element.id, e)))?;
        }
        Ok(result)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("Plan request rejected: {0}")]
    Rejected(String),

    #[error("Invalid plan response: {0}")]
    InvalidResponse(String),

    #[error("Plan generator unavailable: {0}")]
    Unavailable(String),
}

/// External layout solver.
pub trait PlanGenerator {
    fn generate(&self, request: &PlanRequest) -> Result<PlanResult, PlanError>;
}
