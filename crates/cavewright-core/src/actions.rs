//! Actions: discrete changes in elements of the virtual space.
//!
//! Each action kind carries its own attribute schema and XML shape. The
//! `Action` enum is the closed set of kinds; `Action::from_xml` is the
//! factory that dispatches an XML node to the matching kind by tag.

use std::sync::OnceLock;

use xmltree::Element;

use crate::error::{CavewrightError, Result};
use crate::feature::{AttrMap, Feature};
use crate::placement::Placement;
use crate::schema::{FieldDef, Schema};
use crate::validator::Validator;
use crate::value::ValueKind;
use crate::xml;

// ---------------------------------------------------------------------------
// Shared wire tables
// ---------------------------------------------------------------------------

/// link_change literal ↔ `<LinkChange>` child tag.
const LINK_XML_TAGS: [(&str, &str); 4] = [
    ("Enable", "link_on"),
    ("Disable", "link_off"),
    ("Activate", "activate"),
    ("Activate if enabled", "activate_if_on"),
];

/// sound_change literal ↔ `<Sound>` `action` attribute value.
const SOUND_XML_ACTIONS: [(&str, &str); 2] = [("Play Sound", "Start"), ("Stop Sound", "Stop")];

/// TimelineAction change literal ↔ `<TimerChange>` child tag.
const TIMELINE_XML_TAGS: [(&str, &str); 4] = [
    ("Start", "start"),
    ("Stop", "stop"),
    ("Continue", "continue"),
    ("Start if not started", "start_if_not_started"),
];

fn forward(table: &'static [(&'static str, &'static str)], literal: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == literal)
        .map(|(_, to)| *to)
}

fn backward(table: &'static [(&'static str, &'static str)], wire: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, to)| *to == wire)
        .map(|(from, _)| *from)
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

fn require_set(attrs: &AttrMap, key: &'static str) -> Result<()> {
    if attrs.is_set(key) || attrs.is_default(key) {
        Ok(())
    } else {
        Err(CavewrightError::Consistency(format!(
            "{} must have '{}' set before it can be serialized",
            attrs.schema().type_name(),
            key
        )))
    }
}

fn required_text<'a>(attrs: &'a AttrMap, key: &'static str) -> Result<&'a str> {
    require_set(attrs, key)?;
    attrs.get_text(key)
}

fn required_bool(attrs: &AttrMap, key: &'static str) -> Result<bool> {
    require_set(attrs, key)?;
    attrs.get_bool(key)
}

fn required_placement<'a>(attrs: &'a AttrMap, key: &'static str) -> Result<&'a Placement> {
    require_set(attrs, key)?;
    attrs.get_placement(key)
}

// ---------------------------------------------------------------------------
// Transition block (shared by ObjectAction and GroupAction)
// ---------------------------------------------------------------------------

/// Optional attributes shared by the object and group transition schemas.
fn transition_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::optional("duration", Validator::IsNumeric).with_default(1.0),
        FieldDef::optional("visible", Validator::CheckType(ValueKind::Bool)),
        FieldDef::optional(
            "placement",
            Validator::AlwaysValid {
                help: "position and orientation for movement".to_string(),
            },
        ),
        FieldDef::optional("move_relative", Validator::CheckType(ValueKind::Bool))
            .with_default(false),
        FieldDef::optional(
            "color",
            Validator::IsNumericIterable {
                required_length: Some(3),
            },
        ),
        FieldDef::optional("scale", Validator::IsNumeric),
        FieldDef::optional("sound_change", Validator::options(&["Play Sound", "Stop Sound"])),
        FieldDef::optional(
            "link_change",
            Validator::options(&["Enable", "Disable", "Activate", "Activate if enabled"]),
        ),
    ]
}

fn write_transition(attrs: &AttrMap, parent: &mut Element) -> Result<()> {
    let mut trans = Element::new("Transition");
    trans.attributes.insert(
        "duration".to_string(),
        xml::number_to_text(attrs.get_number("duration")?),
    );

    if attrs.is_set("visible") {
        let mut node = Element::new("Visible");
        xml::set_text(&mut node, xml::bool_to_text(attrs.get_bool("visible")?));
        xml::append_child(&mut trans, node);
    }
    if attrs.is_set("placement") {
        let tag = if attrs.get_bool("move_relative")? {
            "MoveRel"
        } else {
            "Movement"
        };
        let mut node = Element::new(tag);
        attrs.get_placement("placement")?.to_xml(&mut node)?;
        xml::append_child(&mut trans, node);
    }
    if attrs.is_set("color") {
        let mut node = Element::new("Color");
        xml::set_text(&mut node, xml::tuple_to_text(attrs.get_tuple("color")?));
        xml::append_child(&mut trans, node);
    }
    if attrs.is_set("scale") {
        let mut node = Element::new("Scale");
        xml::set_text(&mut node, xml::number_to_text(attrs.get_number("scale")?));
        xml::append_child(&mut trans, node);
    }
    if attrs.is_set("sound_change") {
        let literal = attrs.get_text("sound_change")?;
        let wire = forward(&SOUND_XML_ACTIONS, literal).ok_or_else(|| {
            CavewrightError::Consistency(format!("unmapped sound_change literal '{literal}'"))
        })?;
        let mut node = Element::new("Sound");
        node.attributes.insert("action".to_string(), wire.to_string());
        xml::append_child(&mut trans, node);
    }
    if attrs.is_set("link_change") {
        let literal = attrs.get_text("link_change")?;
        let tag = forward(&LINK_XML_TAGS, literal).ok_or_else(|| {
            CavewrightError::Consistency(format!("unmapped link_change literal '{literal}'"))
        })?;
        let mut node = Element::new("LinkChange");
        xml::append_child(&mut node, Element::new(tag));
        xml::append_child(&mut trans, node);
    }

    xml::append_child(parent, trans);
    Ok(())
}

fn read_transition(attrs: &mut AttrMap, action_node: &Element) -> Result<()> {
    let trans = xml::required_child(action_node, "Transition")?;

    if let Some(text) = trans.attributes.get("duration") {
        attrs.set("duration", xml::text_to_number(text, "transition duration")?)?;
    }
    if let Some(visible) = trans.get_child("Visible") {
        match xml::node_text(visible) {
            Some(text) => attrs.set("visible", xml::text_to_bool(&text)?)?,
            None => {
                return Err(CavewrightError::MalformedXml(
                    "Visible node must contain boolean text".to_string(),
                ))
            }
        }
    }

    let movement = if let Some(node) = trans.get_child("MoveRel") {
        attrs.set("move_relative", true)?;
        Some(node)
    } else if let Some(node) = trans.get_child("Movement") {
        attrs.set("move_relative", false)?;
        Some(node)
    } else {
        None
    };
    if let Some(node) = movement {
        let place = xml::required_child(node, "Placement")?;
        attrs.set("placement", Placement::from_xml(place)?)?;
    }

    if let Some(color) = trans.get_child("Color") {
        match xml::node_text(color).as_deref().and_then(parse_color) {
            Some(rgb) => attrs.set("color", rgb)?,
            None => {
                tracing::warn!("unreadable Color text, substituting 255,255,255");
                attrs.set("color", [255.0, 255.0, 255.0])?;
            }
        }
    }
    if let Some(scale) = trans.get_child("Scale") {
        let value = match xml::node_text(scale).map(|t| t.parse::<f64>()) {
            Some(Ok(v)) => v,
            _ => {
                tracing::warn!("missing or unreadable Scale text, substituting 1");
                1.0
            }
        };
        attrs.set("scale", value)?;
    }
    if let Some(sound) = trans.get_child("Sound") {
        let wire = xml::required_attr(sound, "action")?;
        let literal = backward(&SOUND_XML_ACTIONS, wire).ok_or_else(|| {
            CavewrightError::MalformedXml(format!(
                "bad value \"{wire}\" for action attribute of Sound node"
            ))
        })?;
        attrs.set("sound_change", literal)?;
    }
    if let Some(link) = trans.get_child("LinkChange") {
        for (literal, tag) in LINK_XML_TAGS {
            if link.get_child(tag).is_some() {
                attrs.set("link_change", literal)?;
                break;
            }
        }
    }

    Ok(())
}

/// Parse `<Color>` text as three integers; anything else is unreadable and
/// triggers the white fallback.
fn parse_color(text: &str) -> Option<Vec<f64>> {
    let inner = text
        .trim()
        .trim_matches(|c| matches!(c, '(' | ')' | '[' | ']'));
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 3 {
        return None;
    }
    parts
        .iter()
        .map(|p| p.trim().parse::<i64>().ok().map(|n| n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// ObjectAction
// ---------------------------------------------------------------------------

/// Changes one scene object: visibility, placement, color, scale, its sound,
/// or its click link.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectAction {
    attrs: AttrMap,
}

fn object_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let mut fields = vec![FieldDef::required(
            "object_name",
            Validator::CheckType(ValueKind::Text),
        )];
        fields.extend(transition_fields());
        Schema::new("ObjectAction", fields)
    })
}

impl ObjectAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(object_schema()),
        }
    }
}

impl Feature for ObjectAction {
    fn schema() -> &'static Schema {
        object_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut change = Element::new("ObjectChange");
        change.attributes.insert(
            "name".to_string(),
            required_text(&self.attrs, "object_name")?.to_string(),
        );
        write_transition(&self.attrs, &mut change)?;
        xml::append_child(parent, change);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut attrs = AttrMap::new(object_schema());
        attrs.set("object_name", xml::required_attr(node, "name")?)?;
        read_transition(&mut attrs, node)?;
        Ok(Self { attrs })
    }
}

// ---------------------------------------------------------------------------
// GroupAction
// ---------------------------------------------------------------------------

/// Changes every object in a group, or one chosen at random.
///
/// Same transition block as `ObjectAction`, plus the `choose_random` flag
/// carried as the `random` attribute (emitted only when non-default).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAction {
    attrs: AttrMap,
}

fn group_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let mut fields = vec![
            FieldDef::required("group_name", Validator::CheckType(ValueKind::Text)),
            FieldDef::optional("choose_random", Validator::CheckType(ValueKind::Bool))
                .with_default(false),
        ];
        fields.extend(transition_fields());
        Schema::new("GroupAction", fields)
    })
}

impl GroupAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(group_schema()),
        }
    }
}

impl Feature for GroupAction {
    fn schema() -> &'static Schema {
        group_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut change = Element::new("GroupRef");
        change.attributes.insert(
            "name".to_string(),
            required_text(&self.attrs, "group_name")?.to_string(),
        );
        if !self.attrs.is_default("choose_random") {
            change.attributes.insert(
                "random".to_string(),
                xml::bool_to_text(self.attrs.get_bool("choose_random")?).to_string(),
            );
        }
        write_transition(&self.attrs, &mut change)?;
        xml::append_child(parent, change);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut attrs = AttrMap::new(group_schema());
        attrs.set("group_name", xml::required_attr(node, "name")?)?;
        if let Some(text) = node.attributes.get("random") {
            attrs.set("choose_random", xml::text_to_bool(text)?)?;
        }
        read_transition(&mut attrs, node)?;
        Ok(Self { attrs })
    }
}

// ---------------------------------------------------------------------------
// TimelineAction
// ---------------------------------------------------------------------------

/// Starts, stops, or continues a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineAction {
    attrs: AttrMap,
}

fn timeline_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "TimelineAction",
            vec![
                FieldDef::required("timeline_name", Validator::CheckType(ValueKind::Text)),
                FieldDef::required(
                    "change",
                    Validator::options(&["Start", "Stop", "Continue", "Start if not started"]),
                ),
            ],
        )
    })
}

impl TimelineAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(timeline_schema()),
        }
    }
}

impl Feature for TimelineAction {
    fn schema() -> &'static Schema {
        timeline_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut change_root = Element::new("TimerChange");
        change_root.attributes.insert(
            "name".to_string(),
            required_text(&self.attrs, "timeline_name")?.to_string(),
        );
        let literal = required_text(&self.attrs, "change")?;
        let tag = forward(&TIMELINE_XML_TAGS, literal).ok_or_else(|| {
            CavewrightError::Consistency(format!("unmapped timeline change literal '{literal}'"))
        })?;
        xml::append_child(&mut change_root, Element::new(tag));
        xml::append_child(parent, change_root);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut attrs = AttrMap::new(timeline_schema());
        attrs.set("timeline_name", xml::required_attr(node, "name")?)?;
        for (literal, tag) in TIMELINE_XML_TAGS {
            if node.get_child(tag).is_some() {
                attrs.set("change", literal)?;
                break;
            }
        }
        if !attrs.is_set("change") {
            return Err(CavewrightError::MalformedXml(
                "TimerChange node must have child specifying timeline change".to_string(),
            ));
        }
        Ok(Self { attrs })
    }
}

// ---------------------------------------------------------------------------
// SoundAction
// ---------------------------------------------------------------------------

/// Starts or stops a sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundAction {
    attrs: AttrMap,
}

fn sound_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "SoundAction",
            vec![
                FieldDef::required("sound_name", Validator::CheckType(ValueKind::Text)),
                FieldDef::optional("change", Validator::options(&["Start", "Stop"]))
                    .with_default("Start"),
            ],
        )
    })
}

impl SoundAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(sound_schema()),
        }
    }
}

impl Feature for SoundAction {
    fn schema() -> &'static Schema {
        sound_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut sound_root = Element::new("SoundRef");
        sound_root.attributes.insert(
            "name".to_string(),
            required_text(&self.attrs, "sound_name")?.to_string(),
        );
        if !self.attrs.is_default("change") {
            sound_root.attributes.insert(
                "action".to_string(),
                self.attrs.get_text("change")?.to_string(),
            );
        }
        xml::append_child(parent, sound_root);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut attrs = AttrMap::new(sound_schema());
        attrs.set("sound_name", xml::required_attr(node, "name")?)?;
        if let Some(change) = node.attributes.get("action") {
            attrs.set("change", change.as_str())?;
        }
        Ok(Self { attrs })
    }
}

// ---------------------------------------------------------------------------
// EventTriggerAction
// ---------------------------------------------------------------------------

/// Enables or disables an event trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTriggerAction {
    attrs: AttrMap,
}

fn event_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "EventTriggerAction",
            vec![
                FieldDef::required("trigger_name", Validator::CheckType(ValueKind::Text)),
                FieldDef::required("enable", Validator::CheckType(ValueKind::Bool)),
            ],
        )
    })
}

impl EventTriggerAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(event_schema()),
        }
    }
}

impl Feature for EventTriggerAction {
    fn schema() -> &'static Schema {
        event_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut event = Element::new("Event");
        event.attributes.insert(
            "name".to_string(),
            required_text(&self.attrs, "trigger_name")?.to_string(),
        );
        event.attributes.insert(
            "enable".to_string(),
            xml::bool_to_text(required_bool(&self.attrs, "enable")?).to_string(),
        );
        xml::append_child(parent, event);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut attrs = AttrMap::new(event_schema());
        attrs.set("trigger_name", xml::required_attr(node, "name")?)?;
        attrs.set("enable", xml::text_to_bool(xml::required_attr(node, "enable")?)?)?;
        Ok(Self { attrs })
    }
}

// ---------------------------------------------------------------------------
// MoveCaveAction
// ---------------------------------------------------------------------------

/// Moves the entire space to a new placement, absolutely or relative to
/// where it currently is.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCaveAction {
    attrs: AttrMap,
}

fn move_cave_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "MoveCaveAction",
            vec![
                FieldDef::required("relative", Validator::CheckType(ValueKind::Bool)),
                FieldDef::required(
                    "placement",
                    Validator::AlwaysValid {
                        help: "position and orientation to move the space to".to_string(),
                    },
                ),
                FieldDef::optional("duration", Validator::IsNumeric).with_default(0.0),
            ],
        )
    })
}

impl MoveCaveAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(move_cave_schema()),
        }
    }
}

impl Feature for MoveCaveAction {
    fn schema() -> &'static Schema {
        move_cave_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        let mut move_root = Element::new("MoveCave");
        if !self.attrs.is_default("duration") {
            move_root.attributes.insert(
                "duration".to_string(),
                xml::number_to_text(self.attrs.get_number("duration")?),
            );
        }
        let tag = if required_bool(&self.attrs, "relative")? {
            "Relative"
        } else {
            "Absolute"
        };
        xml::append_child(&mut move_root, Element::new(tag));
        required_placement(&self.attrs, "placement")?.to_xml(&mut move_root)?;
        xml::append_child(parent, move_root);
        Ok(())
    }

    fn from_xml(node: &Element) -> Result<Self> {
        let mut attrs = AttrMap::new(move_cave_schema());
        if let Some(text) = node.attributes.get("duration") {
            attrs.set("duration", xml::text_to_number(text, "MoveCave duration")?)?;
        }
        if node.get_child("Relative").is_some() {
            attrs.set("relative", true)?;
        } else if node.get_child("Absolute").is_some() {
            attrs.set("relative", false)?;
        } else {
            return Err(CavewrightError::MalformedXml(
                "MoveCave node must contain either Absolute or Relative child".to_string(),
            ));
        }
        let place = xml::required_child(node, "Placement")?;
        attrs.set("placement", Placement::from_xml(place)?)?;
        Ok(Self { attrs })
    }
}

// ---------------------------------------------------------------------------
// CaveResetAction
// ---------------------------------------------------------------------------

/// Resets the space to its initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct CaveResetAction {
    attrs: AttrMap,
}

fn reset_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| Schema::new("CaveResetAction", Vec::new()))
}

impl CaveResetAction {
    pub fn new() -> Self {
        Self {
            attrs: AttrMap::new(reset_schema()),
        }
    }
}

impl Feature for CaveResetAction {
    fn schema() -> &'static Schema {
        reset_schema()
    }

    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    fn to_xml(&self, parent: &mut Element) -> Result<()> {
        xml::append_child(parent, Element::new("Restart"));
        Ok(())
    }

    fn from_xml(_node: &Element) -> Result<Self> {
        Ok(Self::new())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The closed set of action kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Object(ObjectAction),
    Group(GroupAction),
    Timeline(TimelineAction),
    Sound(SoundAction),
    EventTrigger(EventTriggerAction),
    MoveCave(MoveCaveAction),
    Reset(CaveResetAction),
}

/// Every XML tag the factory recognizes, in dispatch order.
pub const ACTION_TAGS: [&str; 7] = [
    "ObjectChange",
    "GroupRef",
    "TimerChange",
    "SoundRef",
    "Event",
    "MoveCave",
    "Restart",
];

pub fn schema_for_tag(tag: &str) -> Option<&'static Schema> {
    match tag {
        "ObjectChange" => Some(object_schema()),
        "GroupRef" => Some(group_schema()),
        "TimerChange" => Some(timeline_schema()),
        "SoundRef" => Some(sound_schema()),
        "Event" => Some(event_schema()),
        "MoveCave" => Some(move_cave_schema()),
        "Restart" => Some(reset_schema()),
        _ => None,
    }
}

impl Action {
    /// The XML tag this action serializes under.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Object(_) => "ObjectChange",
            Action::Group(_) => "GroupRef",
            Action::Timeline(_) => "TimerChange",
            Action::Sound(_) => "SoundRef",
            Action::EventTrigger(_) => "Event",
            Action::MoveCave(_) => "MoveCave",
            Action::Reset(_) => "Restart",
        }
    }

    /// Append this action's node to `parent`.
    pub fn to_xml(&self, parent: &mut Element) -> Result<()> {
        match self {
            Action::Object(action) => action.to_xml(parent),
            Action::Group(action) => action.to_xml(parent),
            Action::Timeline(action) => action.to_xml(parent),
            Action::Sound(action) => action.to_xml(parent),
            Action::EventTrigger(action) => action.to_xml(parent),
            Action::MoveCave(action) => action.to_xml(parent),
            Action::Reset(action) => action.to_xml(parent),
        }
    }

    /// Factory: build the matching action kind from an XML node's tag.
    pub fn from_xml(node: &Element) -> Result<Self> {
        tracing::debug!(tag = %node.name, "deserializing action");
        match node.name.as_str() {
            "ObjectChange" => Ok(Action::Object(ObjectAction::from_xml(node)?)),
            "GroupRef" => Ok(Action::Group(GroupAction::from_xml(node)?)),
            "TimerChange" => Ok(Action::Timeline(TimelineAction::from_xml(node)?)),
            "SoundRef" => Ok(Action::Sound(SoundAction::from_xml(node)?)),
            "Event" => Ok(Action::EventTrigger(EventTriggerAction::from_xml(node)?)),
            "MoveCave" => Ok(Action::MoveCave(MoveCaveAction::from_xml(node)?)),
            "Restart" => Ok(Action::Reset(CaveResetAction::from_xml(node)?)),
            other => Err(CavewrightError::UnknownTag(other.to_string())),
        }
    }

    /// Hand this action to a downstream stage. Call only on a fully
    /// constructed action: every required attribute set and validated.
    pub fn apply(&self, target: &mut dyn ActionVisitor) -> Result<()> {
        match self {
            Action::Object(action) => target.object_change(action),
            Action::Group(action) => target.group_change(action),
            Action::Timeline(action) => target.timeline_change(action),
            Action::Sound(action) => target.sound_change(action),
            Action::EventTrigger(action) => target.trigger_change(action),
            Action::MoveCave(action) => target.cave_move(action),
            Action::Reset(action) => target.cave_reset(action),
        }
    }
}

impl From<ObjectAction> for Action {
    fn from(action: ObjectAction) -> Self {
        Action::Object(action)
    }
}

impl From<GroupAction> for Action {
    fn from(action: GroupAction) -> Self {
        Action::Group(action)
    }
}

impl From<TimelineAction> for Action {
    fn from(action: TimelineAction) -> Self {
        Action::Timeline(action)
    }
}

impl From<SoundAction> for Action {
    fn from(action: SoundAction) -> Self {
        Action::Sound(action)
    }
}

impl From<EventTriggerAction> for Action {
    fn from(action: EventTriggerAction) -> Self {
        Action::EventTrigger(action)
    }
}

impl From<MoveCaveAction> for Action {
    fn from(action: MoveCaveAction) -> Self {
        Action::MoveCave(action)
    }
}

impl From<CaveResetAction> for Action {
    fn from(action: CaveResetAction) -> Self {
        Action::Reset(action)
    }
}

/// Per-variant hook for the code-generation stage that turns authored
/// actions into scene-graph logic. Implementations live downstream; the
/// data model only guarantees the action is validated before the call.
pub trait ActionVisitor {
    fn object_change(&mut self, action: &ObjectAction) -> Result<()>;
    fn group_change(&mut self, action: &GroupAction) -> Result<()>;
    fn timeline_change(&mut self, action: &TimelineAction) -> Result<()>;
    fn sound_change(&mut self, action: &SoundAction) -> Result<()>;
    fn trigger_change(&mut self, action: &EventTriggerAction) -> Result<()>;
    fn cave_move(&mut self, action: &MoveCaveAction) -> Result<()>;
    fn cave_reset(&mut self, action: &CaveResetAction) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
