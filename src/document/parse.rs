//! SVG markup parsing into the node arena.

use quick_xml::Reader;
use quick_xml::escape::EscapeError;
use quick_xml::events::{BytesRef, BytesStart, Event};

use super::{Node, NodeId, NodeKind};

/// Parses markup into an arena of nodes plus the top-level node handles.
///
/// The whole document is kept, not just the `<svg>` subtree, so wrapper
/// markup around the root graphic does not break loading. Declarations,
/// processing instructions, and comments are dropped; they have no bearing
/// on rendering and keeping them out simplifies re-serialization.
pub(crate) fn parse_forest(markup: &str) -> Result<(Vec<Node>, Vec<NodeId>), quick_xml::Error> {
    let mut reader = Reader::from_str(markup);
    let mut nodes: Vec<Node> = Vec::new();
    let mut top_level: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let id = push_element(&mut nodes, &mut top_level, &stack, &start)?;
                stack.push(id);
            }
            Event::Empty(start) => {
                push_element(&mut nodes, &mut top_level, &stack, &start)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let content = text.xml_content().map_err(quick_xml::Error::from)?;
                push_text(&mut nodes, &stack, &content);
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(&reference, reader.buffer_position())?;
                push_text(&mut nodes, &stack, &resolved);
            }
            Event::CData(cdata) => {
                let raw = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                push_text(&mut nodes, &stack, &raw);
            }
            Event::Eof => break,
            // Decl, DocType, PI, Comment
            _ => {}
        }
    }

    Ok((nodes, top_level))
}

fn push_element(
    nodes: &mut Vec<Node>,
    top_level: &mut Vec<NodeId>,
    stack: &[NodeId],
    start: &BytesStart<'_>,
) -> Result<NodeId, quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attrs.push((key, value));
    }

    let id = NodeId(nodes.len());
    let parent = stack.last().copied();
    nodes.push(Node {
        parent,
        children: Vec::new(),
        kind: NodeKind::Element { name, attrs },
    });

    match parent {
        Some(p) => nodes[p.0].children.push(id),
        None => top_level.push(id),
    }
    Ok(id)
}

/// Resolves an entity reference event to its literal text.
///
/// Character references and the five predefined XML entities are supported;
/// anything needing a DTD is an error, not silent data loss.
fn resolve_reference(
    reference: &BytesRef<'_>,
    position: u64,
) -> Result<String, quick_xml::Error> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch.to_string());
    }

    let name = reference.decode().map_err(quick_xml::Error::from)?;
    let literal = match name.as_ref() {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        _ => {
            let at = position as usize;
            return Err(EscapeError::UnrecognizedEntity(at..at, name.into_owned()).into());
        }
    };
    Ok(literal.to_string())
}

fn push_text(nodes: &mut Vec<Node>, stack: &[NodeId], text: &str) {
    if text.is_empty() {
        return;
    }
    // Text outside any element has nowhere to attach.
    let Some(&parent) = stack.last() else {
        return;
    };

    // Fragments split around entity references continue the open text run.
    if let Some(&last) = nodes[parent.0].children.last() {
        if let NodeKind::Text(existing) = &mut nodes[last.0].kind {
            existing.push_str(text);
            return;
        }
    }
    // Formatting whitespace between elements carries no content.
    if text.trim().is_empty() {
        return;
    }

    let id = NodeId(nodes.len());
    nodes.push(Node {
        parent: Some(parent),
        children: Vec::new(),
        kind: NodeKind::Text(text.to_string()),
    });
    nodes[parent.0].children.push(id);
}
