use std::sync::OnceLock;

use xmltree::Element;

use crate::error::{CavewrightError, Result};
use crate::feature::{AttrMap, Feature};
use crate::schema::{FieldDef, Schema};
use crate::validator::Validator;
use crate::value::ValueKind;
use crate::xml;

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Orientation part of a placement.
///
/// `rotation_mode` selects the node shape: `Axis` carries an axis vector and
/// angle, `LookAt` a target point, `Normal` a face normal. The default mode
/// `"None"` emits nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    attrs: AttrMap,
}

fn rotation_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "Rotation",
            vec![
                FieldDef::optional(
                    "rotation_mode",
                    Validator::options(&["None", "Axis", "LookAt", "Normal"]),
                )
                .with_default("None"),
                FieldDef::optional(
                    "rotation_vector",
                    Validator::IsNumericIterable {
                        required_length: Some(3),
                    },
                ),
                FieldDef::optional(
                    "up_vector",
                    Validator::IsNumericIterable {
                        required_length: Some(3),
                    },
                )
                .with_default([0.0, 1.0, 0.0]),
                FieldDef::optional("rotation_angle", Validator::IsNumeric).with_default(0.0),
            ],
        )
    })
}

impl Rotation {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(rotation_schema()),
        }
    }

    /// An axis rotation, the most common authored form.
    pub fn axis(vector: [f64; 3], angle: f64) -> Result<Self> {
        let mut rotation = Self::new();
        rotation.set("rotation_mode", "Axis")?;
        rotation.set("rotation_vector", vector)?;
        rotation.set("rotation_angle", angle)?;
        Ok(rotation)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for Rotation {
    fn schema() -> &'static Schema {
        rotation_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mode = self.attrs.get_text("rotation_mode")?;
        if mode == "None" {
            if self.is_set("rotation_vector") || self.is_set("rotation_angle") {
                return Err(CavewrightError::MalformedXml(
                    "rotation vector or angle set without a rotation mode".to_string(),
                ));
            }
            return Ok(());
        }

        let mut node = Element::new(mode);
        if self.is_set("rotation_vector") {
            let attr = if mode == "LookAt" { "target" } else { "rotation" };
            node.attributes.insert(
                attr.to_string(),
                xml::tuple_to_text(self.attrs.get_tuple("rotation_vector")?),
            );
        }
        node.attributes.insert(
            "angle".to_string(),
            xml::number_to_text(self.attrs.get_number("rotation_angle")?),
        );
        xml::append_child(parent, node);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut rotation = Rotation::new();
        rotation.set("rotation_mode", node.name.as_str())?;
        let vector = node
            .attributes
            .get("rotation")
            .or_else(|| node.attributes.get("target"));
        if let Some(text) = vector {
            rotation.set("rotation_vector", xml::text_to_tuple(text)?)?;
        }
        if let Some(text) = node.attributes.get("angle") {
            rotation.set("rotation_angle", xml::text_to_number(text, "rotation angle")?)?;
        }
        Ok(rotation)
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Position and orientation of something in the virtual space.
///
/// Positions are relative to the center of the space or to one of its walls.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    attrs: AttrMap,
}

fn placement_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "Placement",
            vec![
                FieldDef::optional(
                    "relative_to",
                    Validator::options(&[
                        "Center",
                        "FrontWall",
                        "LeftWall",
                        "RightWall",
                        "FloorWall",
                    ]),
                )
                .with_default("Center"),
                FieldDef::optional(
                    "position",
                    Validator::IsNumericIterable {
                        required_length: Some(3),
                    },
                )
                .with_default([0.0, 0.0, 0.0]),
                FieldDef::optional("rotation", Validator::CheckType(ValueKind::Rotation))
                    .with_default(Rotation::new()),
            ],
        )
    })
}

impl Placement {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(placement_schema()),
        }
    }

    pub fn at(position: [f64; 3]) -> Result<Self> {
        let mut placement = Self::new();
        placement.set("position", position)?;
        Ok(placement)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for Placement {
    fn schema() -> &'static Schema {
        placement_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut place = Element::new("Placement");

        let mut rel = Element::new("RelativeTo");
        xml::set_text(&mut rel, self.attrs.get_text("relative_to")?);
        xml::append_child(&mut place, rel);

        if !self.is_default("position") {
            let mut pos = Element::new("Position");
            xml::set_text(&mut pos, xml::tuple_to_text(self.attrs.get_tuple("position")?));
            xml::append_child(&mut place, pos);
        }
        if !self.is_default("rotation") {
            self.attrs.get_rotation("rotation")?.to_xml(&mut place)?;
        }
        xml::append_child(parent, place);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut placement = Placement::new();
        if let Some(rel) = node.get_child("RelativeTo") {
            if let Some(text) = xml::node_text(rel) {
                placement.set("relative_to", text)?;
            }
        }
        if let Some(pos) = node.get_child("Position") {
            if let Some(text) = xml::node_text(pos) {
                placement.set("position", xml::text_to_tuple(&text)?)?;
            }
        }
        for mode in ["Axis", "LookAt", "Normal"] {
            if let Some(rot) = node.get_child(mode) {
                placement.set("rotation", Rotation::from_xml(rot)?)?;
                break;
            }
        }
        Ok(placement)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn serialize(placement: &Placement) -> Element {
        let mut parent = Element::new("Movement");
        placement.to_xml(&mut parent).unwrap();
        parent.get_child("Placement").unwrap().clone()
    }

    #[test]
    fn fresh_placement_uses_defaults() {
        let placement = Placement::new();
        assert_eq!(placement.get("relative_to").unwrap(), &Value::from("Center"));
        assert!(placement.is_default("position"));
        assert!(placement.is_default("rotation"));
    }

    #[test]
    fn relative_to_is_always_emitted() {
        let node = serialize(&Placement::new());
        let rel = node.get_child("RelativeTo").unwrap();
        assert_eq!(xml::node_text(rel).as_deref(), Some("Center"));
        assert!(node.get_child("Position").is_none());
    }

    #[test]
    fn placement_round_trip() {
        let mut placement = Placement::at([1.0, 2.0, 3.0]).unwrap();
        placement.set("relative_to", "LeftWall").unwrap();
        placement
            .set("rotation", Rotation::axis([0.0, 1.0, 0.0], 90.0).unwrap())
            .unwrap();

        let node = serialize(&placement);
        assert_eq!(Placement::from_xml(&node).unwrap(), placement);
    }

    #[test]
    fn position_accepts_wrapped_tuples() {
        let mut node = Element::new("Placement");
        let mut pos = Element::new("Position");
        xml::set_text(&mut pos, "(1.0, 2.0, 3.0)");
        xml::append_child(&mut node, pos);

        let placement = Placement::from_xml(&node).unwrap();
        assert_eq!(
            placement.get("position").unwrap(),
            &Value::from([1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn bad_relative_to_is_rejected() {
        let mut node = Element::new("Placement");
        let mut rel = Element::new("RelativeTo");
        xml::set_text(&mut rel, "Ceiling");
        xml::append_child(&mut node, rel);

        assert!(matches!(
            Placement::from_xml(&node).unwrap_err(),
            CavewrightError::InvalidAttribute { key: "relative_to", .. }
        ));
    }

    #[test]
    fn rotation_vector_without_mode_fails_serialization() {
        let mut rotation = Rotation::new();
        rotation
            .set("rotation_vector", [1.0, 0.0, 0.0])
            .unwrap();
        let mut parent = Element::new("Placement");
        assert!(rotation.to_xml(&mut parent).is_err());
    }

    #[test]
    fn look_at_uses_target_attribute() {
        let mut rotation = Rotation::new();
        rotation.set("rotation_mode", "LookAt").unwrap();
        rotation.set("rotation_vector", [0.0, 0.0, 1.0]).unwrap();

        let mut parent = Element::new("Placement");
        rotation.to_xml(&mut parent).unwrap();
        let node = parent.get_child("LookAt").unwrap();
        assert_eq!(node.attributes.get("target").map(String::as_str), Some("0,0,1"));
        assert!(node.attributes.get("rotation").is_none());

        assert_eq!(Rotation::from_xml(node).unwrap(), rotation);
    }

    #[test]
    fn default_rotation_emits_nothing() {
        let mut parent = Element::new("Placement");
        Rotation::new().to_xml(&mut parent).unwrap();
        assert!(parent.children.is_empty());
    }
}
