use crate::output::{print_json, print_table};
use cavewright_core::actions::{schema_for_tag, ACTION_TAGS};
use cavewright_core::value::Value;
use cavewright_core::xml;
use serde::Serialize;

#[derive(Serialize)]
struct SchemaReport {
    tag: String,
    r#type: String,
    attributes: Vec<AttributeReport>,
}

#[derive(Serialize)]
struct AttributeReport {
    name: String,
    required: bool,
    default: Option<String>,
    help: String,
}

pub fn run(tag: Option<&str>, json: bool) -> anyhow::Result<()> {
    let tags: Vec<&str> = match tag {
        Some(t) => {
            if schema_for_tag(t).is_none() {
                anyhow::bail!("unknown action tag '{t}'");
            }
            vec![t]
        }
        None => ACTION_TAGS.to_vec(),
    };

    let reports: Vec<SchemaReport> = tags
        .iter()
        .filter_map(|t| schema_for_tag(t).map(|s| (t, s)))
        .map(|(tag, schema)| SchemaReport {
            tag: tag.to_string(),
            r#type: schema.type_name().to_string(),
            attributes: schema
                .fields()
                .iter()
                .map(|field| AttributeReport {
                    name: field.name.to_string(),
                    required: field.required,
                    default: field.default.as_ref().map(default_text),
                    help: field.validator.help(),
                })
                .collect(),
        })
        .collect();

    if json {
        return print_json(&reports);
    }

    for report in &reports {
        println!("{} ({})", report.tag, report.r#type);
        if report.attributes.is_empty() {
            println!("  no attributes");
        } else {
            let rows: Vec<Vec<String>> = report
                .attributes
                .iter()
                .map(|a| {
                    vec![
                        a.name.clone(),
                        if a.required { "required" } else { "optional" }.to_string(),
                        a.default.clone().unwrap_or_default(),
                        a.help.clone(),
                    ]
                })
                .collect();
            print_table(&["ATTRIBUTE", "", "DEFAULT", "LEGAL VALUES"], &rows);
        }
        println!();
    }
    Ok(())
}

fn default_text(value: &Value) -> String {
    match value {
        Value::Bool(b) => xml::bool_to_text(*b).to_string(),
        Value::Number(n) => xml::number_to_text(*n),
        Value::Text(s) => s.clone(),
        Value::Tuple(items) => xml::tuple_to_text(items),
        Value::Placement(_) => "(placement)".to_string(),
        Value::Rotation(_) => "(rotation)".to_string(),
    }
}
