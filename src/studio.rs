//! Editing session state and interaction dispatch.
//!
//! The active color and slide index live in an explicit [`Studio`] that owns
//! the slide deck. UI chrome translates interactions into [`Action`]s and
//! hands them to [`Studio::dispatch`]; everything below that line is plain
//! library code.

use std::path::{Path, PathBuf};

use crate::color;
use crate::document::{Illustration, NodeId};
use crate::export::{self, ExportError};
use crate::registry::{IllustrationLoader, SvgSource};

// ============================================================================
// Action
// ============================================================================

/// One user interaction, as delivered by the surrounding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Color picker or hex field commit.
    SetColor(String),
    /// Eyedropper sample at a pixel of the current slide (intrinsic 1x
    /// coordinates).
    SampleColor { x: u32, y: u32 },
    /// Click on a colorable node of the current slide.
    Fill(NodeId),
    /// Restart the current slide.
    Reset,
    /// Export the current slide as a PNG into the given directory.
    Export(PathBuf),
    /// Next slide (right arrow / next button).
    Next,
    /// Previous slide (left arrow / prev button).
    Prev,
    /// Dot/index navigation.
    GoTo(usize),
}

// ============================================================================
// Studio
// ============================================================================

/// An editing session over a deck of illustrations.
///
/// Slides that failed to load stay in the deck as blanks: navigation still
/// reaches them, but fill, reset, sampling, and export are no-ops there.
/// Cross-slide state is fully partitioned; editing one slide never touches
/// another.
///
/// # Example
///
/// ```
/// use sneaker_hues::{Action, FillPolicy, IllustrationLoader, Studio, SvgSource};
///
/// let loader = IllustrationLoader::new(FillPolicy::Scoped);
/// let mut studio = Studio::load(&loader, &[
///     SvgSource::from_svg(r##"<svg viewBox="0 0 10 10"><g id="fillable"><path fill="#ff0000"/></g></svg>"##),
/// ]);
///
/// studio.set_active_color("00ff00");
/// let node = studio.current().unwrap().colorable_ids()[0];
/// studio.dispatch(Action::Fill(node)).unwrap();
/// assert_eq!(studio.current().unwrap().fill(node), Some("#00ff00"));
/// ```
#[derive(Debug, Clone)]
pub struct Studio {
    slides: Vec<Option<Illustration>>,
    active_color: String,
    slide_index: usize,
}

impl Studio {
    /// Creates a session over already-loaded slides.
    pub fn new(slides: Vec<Option<Illustration>>) -> Self {
        Self {
            slides,
            active_color: color::FALLBACK.to_string(),
            slide_index: 0,
        }
    }

    /// Loads every source through `loader` and opens a session on the deck.
    pub fn load(loader: &IllustrationLoader, sources: &[SvgSource]) -> Self {
        Self::new(loader.load_all(sources))
    }

    // ---- Session state ----

    /// The currently selected color, always in strict hex form.
    pub fn active_color(&self) -> &str {
        &self.active_color
    }

    /// Updates the active color from picker or text-field input.
    ///
    /// Invalid input lands on the fallback default rather than propagating.
    pub fn set_active_color(&mut self, input: &str) {
        self.active_color = color::normalize(input);
    }

    /// The current slide position.
    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    /// Number of slides in the deck, blanks included.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// The slide at `index`, `None` for blanks and out-of-range positions.
    pub fn slide(&self, index: usize) -> Option<&Illustration> {
        self.slides.get(index)?.as_ref()
    }

    /// Mutable access to the slide at `index`.
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Illustration> {
        self.slides.get_mut(index)?.as_mut()
    }

    /// The currently displayed illustration, `None` if that slide is blank.
    pub fn current(&self) -> Option<&Illustration> {
        self.slide(self.slide_index)
    }

    /// Mutable access to the current illustration.
    pub fn current_mut(&mut self) -> Option<&mut Illustration> {
        self.slide_mut(self.slide_index)
    }

    // ---- Editing ----

    /// Routes a click on a colorable node into the fill editor.
    pub fn fill_clicked(&mut self, node: NodeId) {
        let active = self.active_color.clone();
        if let Some(illustration) = self.current_mut() {
            illustration.apply_fill(node, &active);
        }
    }

    /// Restores the current slide to its load-time fills.
    pub fn reset_current(&mut self) {
        if let Some(illustration) = self.current_mut() {
            illustration.reset();
        }
    }

    /// Samples a pixel of the current slide (rendered at 1x intrinsic size)
    /// and makes it the active color.
    ///
    /// Out-of-bounds coordinates, blank slides, and render failures leave the
    /// active color unchanged and return `None`.
    pub fn sample_color(&mut self, x: u32, y: u32) -> Option<String> {
        let illustration = self.current()?;
        let image = export::rasterize_at(illustration, 1.0).ok()?;
        let pixel = image.get_pixel_checked(x, y)?;

        let sampled = color::from_rgb8(pixel[0], pixel[1], pixel[2]);
        self.active_color = sampled.clone();
        Some(sampled)
    }

    /// Exports the current slide as `sneaker-<N>.png` into `dir`.
    ///
    /// Returns `Ok(None)` when the current slide is blank.
    pub fn export_current(&self, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
        match self.current() {
            Some(illustration) => {
                export::export_to_dir(illustration, self.slide_index, dir).map(Some)
            }
            None => Ok(None),
        }
    }

    // ---- Navigation ----

    /// Jumps to a slide, clamping into `[0, slide_count - 1]`.
    pub fn go_to(&mut self, index: usize) {
        self.slide_index = index.min(self.slides.len().saturating_sub(1));
    }

    /// Advances to the next slide, saturating at the end of the deck.
    pub fn next(&mut self) {
        self.go_to(self.slide_index.saturating_add(1));
    }

    /// Steps back to the previous slide, saturating at the first.
    pub fn prev(&mut self) {
        self.go_to(self.slide_index.saturating_sub(1));
    }

    // ---- Dispatch ----

    /// The explicit dispatch table: routes an interaction to its handler.
    ///
    /// Only `Export` can fail; every other action runs to completion.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ExportError> {
        match action {
            Action::SetColor(input) => self.set_active_color(&input),
            Action::SampleColor { x, y } => {
                self.sample_color(x, y);
            }
            Action::Fill(node) => self.fill_clicked(node),
            Action::Reset => self.reset_current(),
            Action::Export(dir) => {
                self.export_current(&dir)?;
            }
            Action::Next => self.next(),
            Action::Prev => self.prev(),
            Action::GoTo(index) => self.go_to(index),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FillPolicy;

    const SLIDE_A: &str = r##"<svg viewBox="0 0 10 10"><g id="fillable"><rect id="a" x="0" y="0" width="10" height="10" fill="#ff0000"/></g></svg>"##;
    const SLIDE_B: &str = r##"<svg viewBox="0 0 10 10"><g id="fillable"><rect id="b" x="0" y="0" width="10" height="10" fill="#0000ff"/></g></svg>"##;

    fn studio() -> Studio {
        let loader = IllustrationLoader::new(FillPolicy::Scoped);
        Studio::load(
            &loader,
            &[SvgSource::from_svg(SLIDE_A), SvgSource::from_svg(SLIDE_B)],
        )
    }

    #[test]
    fn starts_with_fallback_color_and_first_slide() {
        let studio = studio();
        assert_eq!(studio.active_color(), color::FALLBACK);
        assert_eq!(studio.slide_index(), 0);
        assert_eq!(studio.slide_count(), 2);
    }

    #[test]
    fn set_active_color_normalizes_and_degrades() {
        let mut studio = studio();
        studio.set_active_color("ABC");
        assert_eq!(studio.active_color(), "#ABC");
        studio.set_active_color("not-a-color");
        assert_eq!(studio.active_color(), color::FALLBACK);
    }

    #[test]
    fn navigation_clamps_to_deck_bounds() {
        let mut studio = studio();
        studio.prev();
        assert_eq!(studio.slide_index(), 0);

        studio.next();
        assert_eq!(studio.slide_index(), 1);
        studio.next();
        assert_eq!(studio.slide_index(), 1);

        studio.go_to(99);
        assert_eq!(studio.slide_index(), 1);
        studio.go_to(0);
        assert_eq!(studio.slide_index(), 0);
    }

    #[test]
    fn fill_routes_to_current_slide_only() {
        let mut studio = studio();
        studio.set_active_color("#00ff00");

        let node = studio.current().unwrap().colorable_ids()[0];
        studio.fill_clicked(node);
        assert_eq!(studio.current().unwrap().fill(node), Some("#00ff00"));

        // Slide B is untouched.
        let b = studio.slide(1).unwrap();
        let b_node = b.colorable_ids()[0];
        assert_eq!(b.fill(b_node), Some("#0000ff"));
    }

    #[test]
    fn switching_slides_preserves_edit_state() {
        let mut studio = studio();
        studio.set_active_color("#00ff00");
        let node = studio.current().unwrap().colorable_ids()[0];
        studio.fill_clicked(node);

        studio.next();
        studio.reset_current();
        studio.prev();

        assert_eq!(studio.current().unwrap().fill(node), Some("#00ff00"));
    }

    #[test]
    fn blank_slides_are_navigable_noops() {
        let loader = IllustrationLoader::default();
        let mut studio = Studio::load(
            &loader,
            &[
                SvgSource::from_svg(SLIDE_A),
                SvgSource::from_svg("<not-svg-at-all"),
            ],
        );

        studio.next();
        assert_eq!(studio.slide_index(), 1);
        assert!(studio.current().is_none());

        // All of these are harmless on a blank slide.
        studio.reset_current();
        assert!(studio.sample_color(0, 0).is_none());
        let dir = tempfile::tempdir().unwrap();
        assert!(studio.export_current(dir.path()).unwrap().is_none());
    }

    #[test]
    fn sample_color_picks_pixel_and_sets_active() {
        let mut studio = studio();
        let sampled = studio.sample_color(5, 5).unwrap();
        assert_eq!(sampled, "#ff0000");
        assert_eq!(studio.active_color(), "#ff0000");
    }

    #[test]
    fn sample_out_of_bounds_leaves_color_unchanged() {
        let mut studio = studio();
        studio.set_active_color("#123456");
        assert!(studio.sample_color(500, 500).is_none());
        assert_eq!(studio.active_color(), "#123456");
    }

    #[test]
    fn dispatch_covers_the_interaction_table() {
        let mut studio = studio();
        let node = studio.current().unwrap().colorable_ids()[0];

        studio.dispatch(Action::SetColor("#00ff00".into())).unwrap();
        studio.dispatch(Action::Fill(node)).unwrap();
        assert_eq!(studio.current().unwrap().fill(node), Some("#00ff00"));

        studio.dispatch(Action::Reset).unwrap();
        assert_eq!(studio.current().unwrap().fill(node), Some("#ff0000"));

        studio.dispatch(Action::Next).unwrap();
        assert_eq!(studio.slide_index(), 1);
        studio.dispatch(Action::Prev).unwrap();
        assert_eq!(studio.slide_index(), 0);
        studio.dispatch(Action::GoTo(1)).unwrap();
        assert_eq!(studio.slide_index(), 1);

        studio.dispatch(Action::SampleColor { x: 2, y: 2 }).unwrap();
        assert_eq!(studio.active_color(), "#0000ff");

        let dir = tempfile::tempdir().unwrap();
        studio
            .dispatch(Action::Export(dir.path().to_path_buf()))
            .unwrap();
        assert!(dir.path().join("sneaker-2.png").exists());
    }
}
