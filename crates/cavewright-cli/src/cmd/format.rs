use anyhow::Context;
use cavewright_core::actions::Action;
use std::path::Path;
use xmltree::{Element, EmitterConfig};

/// Round-trip a document through the data model: every node is validated,
/// defaults are re-derived, and text forms come out canonical.
pub fn run(file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let root = Element::parse(data.as_bytes())
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let mut normalized = Element::new(&root.name);
    for (index, node) in root
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .enumerate()
    {
        let action = Action::from_xml(node)
            .with_context(|| format!("invalid {} node at index {index}", node.name))?;
        action
            .to_xml(&mut normalized)
            .with_context(|| format!("failed to re-serialize {} node", node.name))?;
    }

    let mut buffer: Vec<u8> = Vec::new();
    let config = EmitterConfig::new().perform_indent(true);
    normalized
        .write_with_config(&mut buffer, config)
        .context("failed to write normalized document")?;
    let text = String::from_utf8(buffer).context("normalized document is not UTF-8")?;

    match output {
        Some(path) => std::fs::write(path, text.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}
