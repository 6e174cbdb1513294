//! Serializable session profile.
//!
//! A [`SessionProfile`] captures the editing session in a JSON-friendly
//! format so a frontend can persist its state and restore it later: the
//! active color, the current slide, and every slide's current fills keyed by
//! colorable position.
//!
//! # Example
//!
//! ```
//! use sneaker_hues::{Configurable, FillPolicy, IllustrationLoader, Studio, SvgSource};
//!
//! let loader = IllustrationLoader::new(FillPolicy::Scoped);
//! let mut studio = Studio::load(&loader, &[
//!     SvgSource::from_svg(r##"<svg viewBox="0 0 10 10"><g id="fillable"><path fill="#ff0000"/></g></svg>"##),
//! ]);
//!
//! let json = studio.export_profile().to_json().unwrap();
//! let restored = sneaker_hues::SessionProfile::from_json(&json).unwrap();
//! studio.apply_profile(&restored);
//! ```

use serde::{Deserialize, Serialize};

use crate::studio::Studio;

// ============================================================================
// SessionProfile
// ============================================================================

/// Current fill state of one slide, in colorable-node load order.
///
/// `None` entries mean the fill attribute is absent on that node. Blank
/// slides serialize with an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SlideFills {
    pub fills: Vec<Option<String>>,
}

/// A serializable snapshot of an editing session.
///
/// # JSON Format
///
/// ```json
/// {
///   "activeColor": "#00ff00",
///   "slideIndex": 1,
///   "slides": [
///     { "fills": ["#00ff00", null, "#ff0000"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub active_color: String,
    pub slide_index: usize,
    pub slides: Vec<SlideFills>,
}

impl SessionProfile {
    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Configurable
// ============================================================================

/// Trait for types whose state can round-trip through a [`SessionProfile`].
pub trait Configurable {
    /// Applies a profile's state to this instance.
    fn apply_profile(&mut self, profile: &SessionProfile);

    /// Exports the current state as a profile.
    fn export_profile(&self) -> SessionProfile;
}

impl Configurable for Studio {
    /// Restores active color, slide position, and per-slide fills.
    ///
    /// The active color is re-normalized on the way in, so a hand-edited
    /// profile cannot smuggle an invalid color into the session. Fill lists
    /// are matched positionally against each slide's colorable nodes; extra
    /// entries on either side are ignored, which keeps old profiles usable
    /// against a deck whose artwork has since changed.
    fn apply_profile(&mut self, profile: &SessionProfile) {
        self.set_active_color(&profile.active_color);
        self.go_to(profile.slide_index);

        for (index, slide_fills) in profile.slides.iter().enumerate() {
            let Some(illustration) = self.slide_mut(index) else {
                continue;
            };
            let nodes = illustration.colorable_ids();
            for (node, fill) in nodes.into_iter().zip(&slide_fills.fills) {
                match fill {
                    Some(value) => illustration.set_fill(node, value),
                    None => illustration.remove_fill(node),
                }
            }
        }
    }

    fn export_profile(&self) -> SessionProfile {
        let slides = (0..self.slide_count())
            .map(|index| match self.slide(index) {
                Some(illustration) => SlideFills {
                    fills: illustration
                        .colorable_ids()
                        .into_iter()
                        .map(|node| illustration.fill(node).map(String::from))
                        .collect(),
                },
                None => SlideFills::default(),
            })
            .collect();

        SessionProfile {
            active_color: self.active_color().to_string(),
            slide_index: self.slide_index(),
            slides,
        }
    }
}
