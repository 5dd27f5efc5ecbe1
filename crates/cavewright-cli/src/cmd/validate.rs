use crate::output::{print_json, print_table};
use anyhow::Context;
use cavewright_core::actions::Action;
use serde::Serialize;
use std::path::Path;
use xmltree::Element;

#[derive(Serialize)]
struct Report {
    file: String,
    actions: usize,
    errors: Vec<NodeError>,
}

#[derive(Serialize)]
struct NodeError {
    index: usize,
    tag: String,
    message: String,
}

pub fn run(file: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let root = Element::parse(data.as_bytes())
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut actions = 0;
    for (index, node) in root
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .enumerate()
    {
        match Action::from_xml(node) {
            Ok(_) => {
                actions += 1;
                rows.push(vec![index.to_string(), node.name.clone(), "ok".to_string()]);
            }
            Err(e) => {
                rows.push(vec![index.to_string(), node.name.clone(), e.to_string()]);
                errors.push(NodeError {
                    index,
                    tag: node.name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if json {
        print_json(&Report {
            file: file.display().to_string(),
            actions,
            errors,
        })?;
    } else {
        print_table(&["#", "NODE", "STATUS"], &rows);
    }

    if rows.is_empty() {
        anyhow::bail!("{} contains no action nodes", file.display());
    }
    let failed = rows.len() - actions;
    if failed > 0 {
        anyhow::bail!("{failed} of {} action nodes failed validation", rows.len());
    }
    Ok(())
}
