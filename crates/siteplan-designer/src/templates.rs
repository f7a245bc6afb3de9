//! Default footprints for the draw tools.
//!
//! A draw tool drops an axis-aligned rectangle of a fixed size centred on
//! the clicked point. Sizes come from [`FootprintSettings`].

use serde::{Deserialize, Serialize};
use siteplan_core::GeometryError;
use siteplan_settings::{Footprint, FootprintSettings};

use crate::model::{Element, ElementSource, ElementType, Point, Ring, PROP_AREA, PROP_ROTATION};

/// Element kinds that can be drawn with a single click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTool {
    Building,
    Parking,
    Greenspace,
}

impl DrawTool {
    pub fn element_type(self) -> ElementType {
        match self {
            DrawTool::Building => ElementType::Building,
            DrawTool::Parking => ElementType::Parking,
            DrawTool::Greenspace => ElementType::Greenspace,
        }
    }

    /// Get tool as string
    pub fn as_str(self) -> &'static str {
        match self {
            DrawTool::Building => "building",
            DrawTool::Parking => "parking",
            DrawTool::Greenspace => "greenspace",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "building" => Some(DrawTool::Building),
            "parking" => Some(DrawTool::Parking),
            "greenspace" => Some(DrawTool::Greenspace),
            _ => None,
        }
    }

    pub fn footprint(self, footprints: &FootprintSettings) -> Footprint {
        match self {
            DrawTool::Building => footprints.building,
            DrawTool::Parking => footprints.parking,
            DrawTool::Greenspace => footprints.greenspace,
        }
    }

    /// Builds the default rectangle for this tool centred on `center`.
    pub fn instantiate(
        self,
        id: impl Into<String>,
        center: Point,
        footprints: &FootprintSettings,
    ) -> Result<Element, GeometryError> {
        let Footprint { width_ft, depth_ft } = self.footprint(footprints);
        let ring = Ring::rectangle(center, width_ft, depth_ft);
        Ok(
            Element::new(id, self.element_type(), ring, ElementSource::UserDrawn)?
                .with_property(PROP_AREA, width_ft * depth_ft)
                .with_property(PROP_ROTATION, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{bounds_of, centroid};

    #[test]
    fn test_default_footprints() {
        let footprints = FootprintSettings::default();
        let cases = [
            (DrawTool::Building, 60.0, 40.0),
            (DrawTool::Parking, 120.0, 80.0),
            (DrawTool::Greenspace, 60.0, 60.0),
        ];
        for (tool, w, d) in cases {
            let el = tool
                .instantiate("x", Point::new(100.0, 50.0), &footprints)
                .expect("instantiate");
            let b = bounds_of(&el).expect("bounds");
            assert_eq!(b.width(), w);
            assert_eq!(b.height(), d);
            assert_eq!(centroid(&el), Some(Point::new(100.0, 50.0)));
            assert_eq!(el.element_type, tool.element_type());
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for tool in [DrawTool::Building, DrawTool::Parking, DrawTool::Greenspace] {
            assert_eq!(DrawTool::parse(tool.as_str()), Some(tool));
        }
        assert_eq!(DrawTool::parse("tree"), None);
    }
}
