//! Arena serialization back to SVG markup.

use quick_xml::escape::escape;

use super::{Illustration, NodeId, NodeKind, ViewBox};

/// Root attributes replaced when the output is stamped with fixed geometry.
const SIZED_ROOT_ATTRS: [&str; 3] = ["viewBox", "width", "height"];

/// Serializes the illustration's current state.
///
/// When `sized` is given, the root element is stamped with that viewBox and a
/// matching width/height so the output renders at its intrinsic proportions
/// regardless of what the on-screen container did to it.
pub(crate) fn write_markup(illustration: &Illustration, sized: Option<&ViewBox>) -> String {
    let mut out = String::new();
    write_node(illustration, illustration.root, sized, &mut out);
    out
}

fn write_node(illustration: &Illustration, id: NodeId, sized: Option<&ViewBox>, out: &mut String) {
    let node = &illustration.nodes[id.0];
    match &node.kind {
        NodeKind::Text(text) => {
            out.push_str(&escape(text.as_str()));
        }
        NodeKind::Element { name, attrs } => {
            let stamp = if id == illustration.root { sized } else { None };

            out.push('<');
            out.push_str(name);
            for (key, value) in attrs {
                if stamp.is_some() && SIZED_ROOT_ATTRS.contains(&key.as_str()) {
                    continue;
                }
                push_attr(out, key, value);
            }
            if let Some(vb) = stamp {
                push_attr(
                    out,
                    "viewBox",
                    &format!(
                        "{} {} {} {}",
                        fmt_coord(vb.x),
                        fmt_coord(vb.y),
                        fmt_coord(vb.width),
                        fmt_coord(vb.height)
                    ),
                );
                push_attr(out, "width", &fmt_coord(vb.width));
                push_attr(out, "height", &fmt_coord(vb.height));
            }

            if node.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for &child in &node.children {
                    write_node(illustration, child, sized, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Prints a coordinate without a trailing `.0` when it is integral.
fn fmt_coord(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FillPolicy;
    use crate::registry::IllustrationLoader;

    fn load(markup: &str) -> Illustration {
        IllustrationLoader::new(FillPolicy::Scoped)
            .load_str(markup)
            .unwrap()
    }

    #[test]
    fn round_trips_structure_and_attributes() {
        let ill = load(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><g id="fillable"><path fill="#ff0000" d="M0 0"/></g></svg>"##,
        );
        let out = ill.to_svg();
        assert!(out.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">"#));
        assert!(out.contains(r##"<g id="fillable"><path fill="#ff0000" d="M0 0"/></g>"##));
        assert!(out.ends_with("</svg>"));
    }

    #[test]
    fn escapes_attribute_values_and_text() {
        let ill = load(r#"<svg><text name="a &amp; b">x &lt; y</text></svg>"#);
        let out = ill.to_svg();
        assert!(out.contains(r#"name="a &amp; b""#));
        assert!(out.contains("x &lt; y"));
    }

    #[test]
    fn sized_output_stamps_root_geometry() {
        let ill = load(r##"<svg viewBox="0 0 800 600"><rect fill="#fff"/></svg>"##);
        let out = ill.to_svg_sized(&ViewBox::new(0.0, 0.0, 800.0, 600.0));
        assert!(out.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 600" width="800" height="600">"#
        ));
        // Only the root gets stamped.
        assert!(out.contains(r##"<rect fill="#fff"/>"##));
    }

    #[test]
    fn sized_output_replaces_existing_geometry_attrs() {
        let ill = load(r#"<svg viewBox="0 0 10 10"/>"#);
        let out = ill.to_svg_sized(&ViewBox::new(5.0, 5.0, 20.0, 30.5));
        assert_eq!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="5 5 20 30.5" width="20" height="30.5"/>"#
        );
    }

    #[test]
    fn coord_formatting() {
        assert_eq!(fmt_coord(800.0), "800");
        assert_eq!(fmt_coord(-4.0), "-4");
        assert_eq!(fmt_coord(30.5), "30.5");
    }
}
