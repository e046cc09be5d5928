use super::*;

mod events_dispatch;

fn id(doc: &Document, id: &str) -> Result<NodeId> {
    doc.get_element_by_id(id)
        .ok_or_else(|| Error::InvalidNode(format!("missing #{id}")))
}

fn ids(doc: &Document, nodes: &[NodeId]) -> Result<Vec<String>> {
    nodes
        .iter()
        .map(|node| Ok(doc.get_attribute(*node, "id")?.unwrap_or_default()))
        .collect()
}
