//! Illustration loading: source resolution, parsing, and the colorable scan.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::{
    self, ColorableRecord, Illustration, NodeId, ViewBox, find_svg_root, local_name,
};
use crate::editor::FillPolicy;

/// The container id that marks the recolorable region under the scoped policy.
pub const FILLABLE_ID: &str = "fillable";

// ============================================================================
// SvgSource
// ============================================================================

/// A source for illustration markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// Raw SVG markup string.
    Raw(String),
    /// A file path to read markup from.
    Path(PathBuf),
}

impl SvgSource {
    /// Creates a source from raw SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Creates a source from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Resolves this source to markup, reading the file for `Path` sources.
    pub fn resolve(&self) -> Result<Cow<'_, str>, LoadError> {
        match self {
            Self::Raw(svg) => Ok(Cow::Borrowed(svg.as_str())),
            Self::Path(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

impl From<&str> for SvgSource {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_owned())
    }
}

impl From<String> for SvgSource {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

// ============================================================================
// LoadError
// ============================================================================

/// Errors raised while loading an illustration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a path-based source.
    #[error("failed to read illustration source {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The markup is not well-formed XML.
    #[error("failed to parse illustration markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document contains no recognizable `<svg>` root graphic.
    #[error("document contains no <svg> root")]
    NoSvgRoot,
}

// ============================================================================
// IllustrationLoader
// ============================================================================

/// Loads vector documents and prepares them for region recoloring.
///
/// Loading parses markup into the node arena, strips fixed pixel width/height
/// from the root so the document scales to its container, records the
/// intrinsic viewBox if one is declared, and scans for colorable nodes per
/// the configured [`FillPolicy`]. Every colorable node's original fill is
/// captured here, exactly once, before any edit can touch it.
///
/// # Example
///
/// ```
/// use sneaker_hues::{FillPolicy, IllustrationLoader};
///
/// let loader = IllustrationLoader::new(FillPolicy::Scoped);
/// let ill = loader
///     .load_str(r##"<svg viewBox="0 0 10 10"><g id="fillable"><path fill="#ff0000"/></g></svg>"##)
///     .unwrap();
/// assert_eq!(ill.colorable_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IllustrationLoader {
    policy: FillPolicy,
}

impl IllustrationLoader {
    /// Creates a loader with the given colorable-node scope policy.
    pub fn new(policy: FillPolicy) -> Self {
        Self { policy }
    }

    /// The policy illustrations will be loaded with.
    pub fn policy(&self) -> FillPolicy {
        self.policy
    }

    /// Loads one illustration from a source.
    pub fn load(&self, source: &SvgSource) -> Result<Illustration, LoadError> {
        let markup = source.resolve()?;
        self.load_str(&markup)
    }

    /// Loads one illustration from raw markup.
    pub fn load_str(&self, markup: &str) -> Result<Illustration, LoadError> {
        let (nodes, top_level) = document::parse_forest(markup)?;
        let root = find_svg_root(&nodes, &top_level).ok_or(LoadError::NoSvgRoot)?;

        let mut illustration = Illustration::from_parts(nodes, root, self.policy);
        illustration.strip_root_size();
        illustration.ensure_svg_namespace();

        let view_box = illustration.attr(root, "viewBox").and_then(ViewBox::parse);
        illustration.view_box = view_box;

        let colorable = match self.policy {
            FillPolicy::Scoped => scan_scoped(&illustration),
            FillPolicy::Attribute => scan_attribute(&illustration),
        };
        illustration.colorable = colorable;

        Ok(illustration)
    }

    /// Loads a whole slide deck, one illustration per source.
    ///
    /// A failed slide is recorded as `None` and logged; it must not take the
    /// rest of the deck down with it.
    pub fn load_all(&self, sources: &[SvgSource]) -> Vec<Option<Illustration>> {
        sources
            .iter()
            .enumerate()
            .map(|(i, source)| match self.load(source) {
                Ok(illustration) => Some(illustration),
                Err(err) => {
                    log::warn!("slide {} failed to load: {err}", i + 1);
                    None
                }
            })
            .collect()
    }
}

// ============================================================================
// Colorable scans
// ============================================================================

/// Scoped policy: only element descendants of the `#fillable` container are
/// colorable. Each records its logical region group, the nearest
/// ancestor-or-self `<g>` strictly inside the container. Without a fillable
/// container the illustration simply has no colorable nodes.
fn scan_scoped(illustration: &Illustration) -> Vec<ColorableRecord> {
    let root = illustration.root();
    let fillable = std::iter::once(root)
        .chain(illustration.element_descendants(root))
        .find(|&id| illustration.attr(id, "id") == Some(FILLABLE_ID));
    let Some(fillable) = fillable else {
        return Vec::new();
    };

    illustration
        .element_descendants(fillable)
        .into_iter()
        .map(|node| ColorableRecord {
            node,
            original_fill: explicit_fill(illustration, node),
            region: region_group(illustration, node, fillable),
        })
        .collect()
}

/// Attribute policy: any element carrying an explicit non-`none` fill,
/// anywhere in the document, is colorable individually.
fn scan_attribute(illustration: &Illustration) -> Vec<ColorableRecord> {
    let root = illustration.root();
    std::iter::once(root)
        .chain(illustration.element_descendants(root))
        .filter_map(|node| {
            explicit_fill(illustration, node).map(|fill| ColorableRecord {
                node,
                original_fill: Some(fill),
                region: None,
            })
        })
        .collect()
}

/// The node's explicit fill, with `none` treated as the transparent sentinel.
fn explicit_fill(illustration: &Illustration, node: NodeId) -> Option<String> {
    illustration
        .attr(node, "fill")
        .filter(|value| *value != "none")
        .map(String::from)
}

/// Nearest ancestor-or-self `<g>` of `node` that is a strict descendant of
/// the fillable container.
fn region_group(illustration: &Illustration, node: NodeId, fillable: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == fillable {
            return None;
        }
        if illustration
            .element_name(id)
            .is_some_and(|name| local_name(name) == "g")
        {
            return Some(id);
        }
        current = illustration.parent(id);
    }
    None
}
