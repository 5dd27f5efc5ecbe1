use std::collections::BTreeSet;

use crate::value::{Value, ValueKind};

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Checks whether a candidate value is legal for one named attribute.
///
/// A validator never fails: an illegal value yields `false`, and `help()`
/// describes the legal domain for diagnostics and editor integration.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Value must be one of a fixed set of literal strings.
    OptionList(BTreeSet<String>),
    /// Value must be convertible to a floating-point number.
    IsNumeric,
    /// Value must be a numeric tuple, optionally of an exact length.
    IsNumericIterable { required_length: Option<usize> },
    /// Accepts anything; used where the value is an opaque collaborator.
    AlwaysValid { help: String },
    /// Value's kind must match exactly.
    CheckType(ValueKind),
}

impl Validator {
    pub fn options(options: &[&str]) -> Self {
        Validator::OptionList(options.iter().map(|o| o.to_string()).collect())
    }

    pub fn check(&self, value: &Value) -> bool {
        match self {
            Validator::OptionList(options) => value
                .as_text()
                .map(|text| options.contains(text))
                .unwrap_or(false),
            Validator::IsNumeric => value.to_number().is_some(),
            Validator::IsNumericIterable { required_length } => match value.as_tuple() {
                // Elements are numbers by construction; only the shape is open.
                Some(items) => required_length.map_or(true, |len| items.len() == len),
                None => false,
            },
            Validator::AlwaysValid { .. } => true,
            Validator::CheckType(kind) => value.kind() == *kind,
        }
    }

    /// Human-readable description of the legal domain.
    pub fn help(&self) -> String {
        match self {
            Validator::OptionList(options) => {
                let listed: Vec<&str> = options.iter().map(String::as_str).collect();
                format!("value must be one of {}", listed.join(", "))
            }
            Validator::IsNumeric => "value must be numeric".to_string(),
            Validator::IsNumericIterable { required_length } => match required_length {
                Some(len) => format!("value must be a sequence of {len} numbers"),
                None => "value must be a sequence of numbers".to_string(),
            },
            Validator::AlwaysValid { help } => help.clone(),
            Validator::CheckType(kind) => format!("value must be of type {kind}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_list_membership() {
        let v = Validator::options(&["Start", "Stop"]);
        assert!(v.check(&Value::from("Start")));
        assert!(v.check(&Value::from("Stop")));
        assert!(!v.check(&Value::from("Pause")));
        assert!(!v.check(&Value::from(true)));
    }

    #[test]
    fn option_list_order_is_irrelevant() {
        assert_eq!(
            Validator::options(&["Stop", "Start"]),
            Validator::options(&["Start", "Stop"])
        );
    }

    #[test]
    fn numeric_accepts_numbers_and_numeric_text() {
        assert!(Validator::IsNumeric.check(&Value::from(0.25)));
        assert!(Validator::IsNumeric.check(&Value::from("2")));
        assert!(!Validator::IsNumeric.check(&Value::from("two")));
        assert!(!Validator::IsNumeric.check(&Value::from(false)));
    }

    #[test]
    fn numeric_iterable_checks_shape() {
        let any_len = Validator::IsNumericIterable {
            required_length: None,
        };
        let triple = Validator::IsNumericIterable {
            required_length: Some(3),
        };
        assert!(any_len.check(&Value::from(vec![1.0])));
        assert!(triple.check(&Value::from([1.0, 2.0, 3.0])));
        assert!(!triple.check(&Value::from(vec![1.0, 2.0])));
        assert!(!triple.check(&Value::from(1.0)));
        assert!(!triple.check(&Value::from("1,2,3")));
    }

    #[test]
    fn check_type_is_exact() {
        let v = Validator::CheckType(ValueKind::Bool);
        assert!(v.check(&Value::from(true)));
        assert!(!v.check(&Value::from("true")));
        assert!(!v.check(&Value::from(1.0)));
    }

    #[test]
    fn always_valid_accepts_everything() {
        let v = Validator::AlwaysValid {
            help: "anything goes".to_string(),
        };
        assert!(v.check(&Value::from(false)));
        assert!(v.check(&Value::from(vec![])));
        assert_eq!(v.help(), "anything goes");
    }

    #[test]
    fn help_names_the_domain() {
        assert!(Validator::options(&["Enable", "Disable"])
            .help()
            .contains("Enable"));
        assert!(Validator::IsNumericIterable {
            required_length: Some(3)
        }
        .help()
        .contains('3'));
        assert!(Validator::CheckType(ValueKind::Bool)
            .help()
            .contains("boolean"));
    }
}
