use std::collections::BTreeMap;

use xmltree::Element;

use crate::error::{CavewrightError, Result};
use crate::placement::{Placement, Rotation};
use crate::schema::Schema;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Result of looking an attribute up without collapsing defaults.
///
/// Callers that need to distinguish "explicitly set" from "falling back to
/// the schema default" (serializers do) match on this instead of `get`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Explicitly set on the record.
    Set(&'a Value),
    /// Not set; the schema supplies this default.
    Default(&'a Value),
    /// Not set and no default exists.
    Unset,
}

// ---------------------------------------------------------------------------
// AttrMap
// ---------------------------------------------------------------------------

/// Validated attribute storage shared by every feature record.
///
/// The only mutation path is `set`, which rejects keys outside the schema and
/// values that fail the key's validator. A failed `set` leaves the map
/// untouched.
#[derive(Debug, Clone)]
pub struct AttrMap {
    schema: &'static Schema,
    values: BTreeMap<&'static str, Value>,
}

impl AttrMap {
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let field =
            self.schema
                .field(key)
                .ok_or_else(|| CavewrightError::UnknownAttribute {
                    feature: self.schema.type_name(),
                    key: key.to_string(),
                })?;
        if !field.validator.check(&value) {
            return Err(CavewrightError::InvalidAttribute {
                key: field.name,
                help: field.validator.help(),
            });
        }
        self.values.insert(field.name, value);
        Ok(())
    }

    /// Stored value, or the schema default when unset.
    pub fn get(&self, key: &str) -> Result<&Value> {
        if self.schema.field(key).is_none() {
            return Err(CavewrightError::UnknownAttribute {
                feature: self.schema.type_name(),
                key: key.to_string(),
            });
        }
        match self.lookup(key) {
            Lookup::Set(value) | Lookup::Default(value) => Ok(value),
            Lookup::Unset => Err(CavewrightError::AttributeUnset {
                feature: self.schema.type_name(),
                key: key.to_string(),
            }),
        }
    }

    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        if let Some(value) = self.values.get(key) {
            return Lookup::Set(value);
        }
        match self.schema.default(key) {
            Some(default) => Lookup::Default(default),
            None => Lookup::Unset,
        }
    }

    /// Applies `set` pair by pair. Not atomic: pairs applied before a
    /// failure stay applied.
    pub fn update<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.set(key.as_ref(), value)?;
        }
        Ok(())
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True iff the key is unset and the schema has a default for it.
    pub fn is_default(&self, key: &str) -> bool {
        !self.values.contains_key(key) && self.schema.default(key).is_some()
    }

    // -----------------------------------------------------------------------
    // Typed getters
    // -----------------------------------------------------------------------
    // Schemas guarantee the stored kind, so a mismatch here is a programming
    // error in a schema table, reported as a consistency error.

    pub fn get_text(&self, key: &str) -> Result<&str> {
        self.get(key)?
            .as_text()
            .ok_or_else(|| self.kind_mismatch(key, "text"))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| self.kind_mismatch(key, "boolean"))
    }

    pub fn get_number(&self, key: &str) -> Result<f64> {
        self.get(key)?
            .to_number()
            .ok_or_else(|| self.kind_mismatch(key, "number"))
    }

    pub fn get_tuple(&self, key: &str) -> Result<&[f64]> {
        self.get(key)?
            .as_tuple()
            .ok_or_else(|| self.kind_mismatch(key, "numeric tuple"))
    }

    pub fn get_placement(&self, key: &str) -> Result<&Placement> {
        self.get(key)?
            .as_placement()
            .ok_or_else(|| self.kind_mismatch(key, "placement"))
    }

    pub fn get_rotation(&self, key: &str) -> Result<&Rotation> {
        self.get(key)?
            .as_rotation()
            .ok_or_else(|| self.kind_mismatch(key, "rotation"))
    }

    fn kind_mismatch(&self, key: &str, wanted: &str) -> CavewrightError {
        CavewrightError::Consistency(format!(
            "attribute '{}' on {} does not hold a {}",
            key,
            self.schema.type_name(),
            wanted
        ))
    }
}

/// Equality compares effective attribute values: a value explicitly set to
/// its schema default equals the unset default. This is the equivalence the
/// serialization round trip preserves, since defaults are omitted from XML
/// and re-derived from the schema on read.
impl PartialEq for AttrMap {
    fn eq(&self, other: &Self) -> bool {
        if !std::ptr::eq(self.schema, other.schema) {
            return false;
        }
        self.schema.fields().iter().all(|field| {
            match (self.lookup(field.name), other.lookup(field.name)) {
                (Lookup::Unset, Lookup::Unset) => true,
                (Lookup::Set(a) | Lookup::Default(a), Lookup::Set(b) | Lookup::Default(b)) => {
                    a == b
                }
                _ => false,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// A schema-validated, XML-serializable record.
///
/// Implementors supply the schema, access to the attribute map, and the two
/// sides of the XML contract; the attribute operations are provided.
/// `from_xml` is the left inverse of `to_xml` for every attribute that was
/// explicitly set.
pub trait Feature: Sized {
    fn schema() -> &'static Schema;

    fn attrs(&self) -> &AttrMap;

    fn attrs_mut(&mut self) -> &mut AttrMap;

    /// Append this record's node to `parent`.
    fn to_xml(&self, parent: &mut Element) -> Result<()>;

    /// Reconstruct a record from its node.
    fn from_xml(node: &Element) -> Result<Self>;

    fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.attrs_mut().set(key, value)
    }

    fn get(&self, key: &str) -> Result<&Value> {
        self.attrs().get(key)
    }

    fn lookup(&self, key: &str) -> Lookup<'_> {
        self.attrs().lookup(key)
    }

    fn update<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.attrs_mut().update(pairs)
    }

    fn is_set(&self, key: &str) -> bool {
        self.attrs().is_set(key)
    }

    fn is_default(&self, key: &str) -> bool {
        self.attrs().is_default(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use crate::validator::Validator;
    use crate::value::ValueKind;
    use std::sync::OnceLock;

    fn probe_schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(
                "Probe",
                vec![
                    FieldDef::required("name", Validator::CheckType(ValueKind::Text)),
                    FieldDef::optional("duration", Validator::IsNumeric).with_default(1.0),
                    FieldDef::optional("visible", Validator::CheckType(ValueKind::Bool)),
                ],
            )
        })
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut attrs = AttrMap::new(probe_schema());
        let err = attrs.set("bogus", true).unwrap_err();
        assert!(matches!(err, CavewrightError::UnknownAttribute { .. }));
        assert!(!attrs.is_set("bogus"));
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut attrs = AttrMap::new(probe_schema());
        let err = attrs.set("duration", "soon").unwrap_err();
        assert!(matches!(err, CavewrightError::InvalidAttribute { .. }));
        assert!(!attrs.is_set("duration"));
    }

    #[test]
    fn set_succeeds_iff_validator_accepts() {
        let mut attrs = AttrMap::new(probe_schema());
        for (key, value, legal) in [
            ("duration", Value::from(2.0), true),
            ("duration", Value::from("2.5"), true),
            ("duration", Value::from(false), false),
            ("visible", Value::from(true), true),
            ("visible", Value::from("true"), false),
        ] {
            let validator = &probe_schema().field(key).unwrap().validator;
            assert_eq!(validator.check(&value), legal);
            assert_eq!(attrs.set(key, value).is_ok(), legal);
        }
    }

    #[test]
    fn get_falls_back_to_default() {
        let mut attrs = AttrMap::new(probe_schema());
        assert_eq!(attrs.get("duration").unwrap(), &Value::Number(1.0));
        assert!(attrs.is_default("duration"));

        attrs.set("duration", 3.0).unwrap();
        assert_eq!(attrs.get("duration").unwrap(), &Value::Number(3.0));
        assert!(!attrs.is_default("duration"));
    }

    #[test]
    fn get_without_default_is_an_error() {
        let attrs = AttrMap::new(probe_schema());
        let err = attrs.get("name").unwrap_err();
        assert!(matches!(err, CavewrightError::AttributeUnset { .. }));
    }

    #[test]
    fn lookup_distinguishes_set_from_default() {
        let mut attrs = AttrMap::new(probe_schema());
        assert_eq!(attrs.lookup("duration"), Lookup::Default(&Value::Number(1.0)));
        assert_eq!(attrs.lookup("visible"), Lookup::Unset);

        attrs.set("duration", 1.0).unwrap();
        assert_eq!(attrs.lookup("duration"), Lookup::Set(&Value::Number(1.0)));
    }

    #[test]
    fn update_is_not_atomic() {
        let mut attrs = AttrMap::new(probe_schema());
        let result = attrs.update([
            ("name", Value::from("Table")),
            ("duration", Value::from(false)),
            ("visible", Value::from(true)),
        ]);
        assert!(result.is_err());
        // The pair before the failure is applied, the one after is not.
        assert!(attrs.is_set("name"));
        assert!(!attrs.is_set("visible"));
    }

    #[test]
    fn equality_collapses_defaults() {
        let mut explicit = AttrMap::new(probe_schema());
        explicit.set("duration", 1.0).unwrap();
        let implicit = AttrMap::new(probe_schema());
        assert_eq!(explicit, implicit);

        let mut different = AttrMap::new(probe_schema());
        different.set("duration", 2.0).unwrap();
        assert_ne!(explicit, different);
    }

    #[test]
    fn typed_getters_convert_numeric_text() {
        let mut attrs = AttrMap::new(probe_schema());
        attrs.set("duration", "2.5").unwrap();
        assert_eq!(attrs.get_number("duration").unwrap(), 2.5);
    }
}
