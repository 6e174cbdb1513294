//! Fill application and reset.
//!
//! Both operations run against the arena built at load time and touch only
//! current fills; the originals recorded by the loader stay untouched so an
//! edit session is always reversible.

use serde::{Deserialize, Serialize};

use crate::document::{Illustration, NodeId};

// ============================================================================
// FillPolicy
// ============================================================================

/// Which nodes are colorable, and what a click on one of them recolors.
///
/// Deployments differ on this, so the policy is an explicit load-time
/// choice rather than a silent merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillPolicy {
    /// Only descendants of the `#fillable` container are colorable; a click
    /// recolors the node's nearest enclosing logical group.
    #[default]
    Scoped,
    /// Any element with an explicit non-`none` fill is colorable
    /// individually; no group propagation.
    Attribute,
}

// ============================================================================
// Fill application + reset
// ============================================================================

impl Illustration {
    /// Applies a color to the clicked node, or to its logical region under
    /// the scoped policy.
    ///
    /// Scoped: when the node belongs to a region group, every element
    /// descendant of that group takes the color; a node outside any group
    /// takes it alone. Attribute: exactly the clicked node takes the color.
    ///
    /// Handles that are not colorable are ignored. The color is assumed to be
    /// already normalized by [`color::normalize`](crate::color::normalize).
    pub fn apply_fill(&mut self, node: NodeId, color: &str) {
        if !self.is_colorable(node) {
            return;
        }

        match self.policy() {
            FillPolicy::Attribute => self.set_fill(node, color),
            FillPolicy::Scoped => match self.region_of(node) {
                Some(group) => {
                    for member in self.element_descendants(group) {
                        self.set_fill(member, color);
                    }
                }
                None => self.set_fill(node, color),
            },
        }
    }

    /// Restores every colorable node to its recorded original fill.
    ///
    /// Nodes whose original was the transparent sentinel get their fill
    /// attribute removed, not set to a sentinel string. Idempotent, and
    /// scoped to this illustration only.
    pub fn reset(&mut self) {
        for node in self.colorable_ids() {
            match self.original_fill(node).map(String::from) {
                Some(original) => self.set_fill(node, &original),
                None => self.remove_fill(node),
            }
        }
    }
}
