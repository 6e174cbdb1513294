//! sneaker-hues: region-fill recoloring for vector sneaker illustrations.
//!
//! This crate is the editing core behind a "recolor the sneaker" widget:
//! load a small deck of SVG designs, let clicks on colorable regions apply
//! the active color, reset a design to how it loaded, and export the current
//! look as a 2x supersampled PNG.
//!
//! # Example
//!
//! ```
//! use sneaker_hues::{Action, FillPolicy, IllustrationLoader, Studio, SvgSource};
//!
//! let loader = IllustrationLoader::new(FillPolicy::Scoped);
//! let mut studio = Studio::load(&loader, &[
//!     SvgSource::from_svg(r##"<svg viewBox="0 0 10 10">
//!         <g id="fillable"><g><path fill="#ff0000"/><path/></g></g>
//!     </svg>"##),
//! ]);
//!
//! // Pick a color, click a region: the whole logical group takes the fill.
//! studio.dispatch(Action::SetColor("#00ff00".into())).unwrap();
//! let node = studio.current().unwrap().colorable_ids()[1];
//! studio.dispatch(Action::Fill(node)).unwrap();
//!
//! // Reset restores every region to its load-time fill.
//! studio.dispatch(Action::Reset).unwrap();
//! ```
//!
//! # Saved Sessions
//!
//! For frontend-backend communication, a whole session round-trips through
//! [`SessionProfile`] via the [`Configurable`] trait:
//!
//! ```
//! use sneaker_hues::{Configurable, Studio};
//!
//! let mut studio = Studio::new(Vec::new());
//! let json = studio.export_profile().to_json().unwrap();
//! ```

pub mod color;
mod document;
mod editor;
mod export;
mod profile;
mod registry;
mod studio;

pub use document::{Illustration, NodeId, ViewBox};
pub use editor::FillPolicy;
pub use export::{
    EXPORT_SCALE, ExportError, encode_png, export_file_name, export_to_dir, intrinsic_view_box,
    rasterize,
};
pub use profile::{Configurable, SessionProfile, SlideFills};
pub use registry::{FILLABLE_ID, IllustrationLoader, LoadError, SvgSource};
pub use studio::{Action, Studio};
