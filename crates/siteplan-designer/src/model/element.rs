//! Site-plan elements.
//!
//! Elements are immutable values. Every edit produces a replacement carrying
//! the same id; the [`crate::element_store::ElementStore`] swaps it in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use siteplan_core::GeometryError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::Ring;

/// Well-known property: accumulated rotation in degrees.
pub const PROP_ROTATION: &str = "rotation";
/// Well-known property: footprint area in square feet.
pub const PROP_AREA: &str = "area";
/// Well-known property: number of floors.
pub const PROP_STORIES: &str = "stories";
/// Well-known property: display name.
pub const PROP_NAME: &str = "name";

/// Minimum number of distinct vertices for an element footprint.
pub const MIN_ELEMENT_VERTICES: usize = 4;

/// Element category. Also fixes paint and hit-test precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    Building,
    Parking,
    ParkingBay,
    ParkingAisle,
    Circulation,
    Greenspace,
}

impl ElementType {
    /// Paint rank: lower ranks are painted first and hit last.
    pub fn paint_rank(self) -> u8 {
        match self {
            ElementType::Greenspace => 0,
            ElementType::ParkingAisle => 1,
            ElementType::Circulation => 2,
            ElementType::Parking | ElementType::ParkingBay => 3,
            ElementType::Building => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Building => "building",
            ElementType::Parking => "parking",
            ElementType::ParkingBay => "parking-bay",
            ElementType::ParkingAisle => "parking-aisle",
            ElementType::Circulation => "circulation",
            ElementType::Greenspace => "greenspace",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "building" => Ok(ElementType::Building),
            "parking" => Ok(ElementType::Parking),
            "parking-bay" => Ok(ElementType::ParkingBay),
            "parking-aisle" => Ok(ElementType::ParkingAisle),
            "circulation" => Ok(ElementType::Circulation),
            "greenspace" => Ok(ElementType::Greenspace),
            other => Err(GeometryError::UnsupportedShape {
                kind: other.to_string(),
            }),
        }
    }
}

/// Where an element came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementSource {
    UserDrawn,
    Template,
    #[default]
    Generated,
}

/// Property value stored on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            PropertyValue::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source: ElementSource,
}

impl ElementMetadata {
    pub fn new(source: ElementSource) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            source,
        }
    }
}

impl Default for ElementMetadata {
    fn default() -> Self {
        Self::new(ElementSource::default())
    }
}

/// A polygon element of the site plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub geometry: Ring,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub metadata: ElementMetadata,
}

impl Element {
    /// Creates an element, rejecting footprints with fewer than four
    /// distinct vertices.
    pub fn new(
        id: impl Into<String>,
        element_type: ElementType,
        geometry: Ring,
        source: ElementSource,
    ) -> Result<Self, GeometryError> {
        let element = Self {
            id: id.into(),
            element_type,
            geometry,
            properties: Properties::new(),
            metadata: ElementMetadata::new(source),
        };
        element.validate()?;
        Ok(element)
    }

    /// Checks the footprint invariants. Used on decoded solver output.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.geometry.is_empty() {
            return Err(GeometryError::EmptyCoordinates);
        }
        if let Some(bad) = self.geometry.points().iter().find(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidCoordinate {
                reason: format!("non-finite vertex ({}, {}) in {}", bad.x, bad.y, self.id),
            });
        }
        let distinct = self.geometry.distinct_count();
        if distinct < MIN_ELEMENT_VERTICES {
            return Err(GeometryError::DegenerateRing {
                distinct,
                required: MIN_ELEMENT_VERTICES,
            });
        }
        Ok(())
    }

    pub fn is_building(&self) -> bool {
        self.element_type == ElementType::Building
    }

    /// Stored rotation in degrees; zero when absent.
    pub fn rotation_degrees(&self) -> f64 {
        self.properties
            .get(PROP_ROTATION)
            .and_then(PropertyValue::as_f64)
            .unwrap_or(0.0)
    }

    pub fn stories(&self) -> Option<u32> {
        self.properties
            .get(PROP_STORIES)
            .and_then(PropertyValue::as_f64)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.round() as u32)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get(PROP_NAME).and_then(PropertyValue::as_str)
    }

    pub fn with_geometry(&self, geometry: Ring) -> Self {
        let mut next = self.clone();
        next.geometry = geometry;
        next.metadata.updated_at = Utc::now();
        next
    }

    pub fn with_property(&self, key: &str, value: impl Into<PropertyValue>) -> Self {
        let mut next = self.clone();
        next.properties.insert(key.to_string(), value.into());
        next.metadata.updated_at = Utc::now();
        next
    }

    pub fn with_rotation(&self, degrees: f64) -> Self {
        self.with_property(PROP_ROTATION, degrees)
    }

    /// Same element under a new id, stamped as freshly created.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.id = id.into();
        next.metadata = ElementMetadata::new(self.metadata.source);
        next
    }
}
