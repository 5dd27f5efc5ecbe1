use crate::validator::Validator;
use crate::value::Value;

// ---------------------------------------------------------------------------
// FieldDef
// ---------------------------------------------------------------------------

/// One attribute in a feature's schema: name, requiredness, validator, and
/// optional default.
///
/// Required fields are enforced at serialization time, not at construction:
/// a record may be built up incrementally, but it cannot be written to XML
/// until every required attribute has been set.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub required: bool,
    pub validator: Validator,
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn required(name: &'static str, validator: Validator) -> Self {
        Self {
            name,
            required: true,
            validator,
            default: None,
        }
    }

    pub fn optional(name: &'static str, validator: Validator) -> Self {
        Self {
            name,
            required: false,
            validator,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// The full field table for one feature type.
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(type_name: &'static str, fields: Vec<FieldDef>) -> Self {
        debug_assert!(
            fields
                .iter()
                .all(|f| fields.iter().filter(|g| g.name == f.name).count() == 1),
            "duplicate field name in {type_name} schema"
        );
        debug_assert!(
            fields
                .iter()
                .all(|f| f.default.as_ref().map_or(true, |d| f.validator.check(d))),
            "default value fails its own validator in {type_name} schema"
        );
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn default(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(|f| f.default.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
