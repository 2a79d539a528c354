//! # Fuda
//!
//! Trailing badge icons for truncated text.
//!
//! ## Overview
//!
//! `Fuda` places a small icon right after the last visible character of a
//! text element. When the last line has no room for it, characters are cut
//! from the end of that line one at a time and an ellipsis is inserted, until
//! the shortened line, the ellipsis and the icon fit the available width.
//!
//! The host toolkit is reached through two traits: [`measure::TextMeasure`]
//! for pixel widths and [`surface::TextSurface`] for the text element itself.
//! [`surface::LayoutSurface`] implements the latter on top of the crate's own
//! line breaker, and [`FontSystem`] provides real font measurements.
//!
//! ## Usage
//!
//! ```rust
//! use fuda::{
//!     BadgeConfig, BadgeIcon, BadgeText, BadgeUpdate,
//!     measure::FixedAdvance,
//!     surface::{LayoutSurface, TextSurface},
//!     text::LineBreakConfig,
//! };
//!
//! // 1. A surface 125px wide showing a single line
//! let layout = LineBreakConfig {
//!     max_width: Some(125.0),
//!     max_lines: Some(1),
//!     ..Default::default()
//! };
//! let surface = LayoutSurface::new(FixedAdvance::new(10.0), layout, 14.0);
//!
//! // 2. Badge settings
//! let config = BadgeConfig {
//!     badge_icon: Some(BadgeIcon::new("@drawable/ic_new")),
//!     show_badge: true,
//!     ..Default::default()
//! };
//! let mut badge = BadgeText::new(surface, config);
//!
//! // 3. Fitting waits for the layout pass
//! assert_eq!(badge.set_text("Hello World").unwrap(), BadgeUpdate::Deferred);
//! badge.surface_mut().layout();
//! badge.on_layout().unwrap();
//!
//! assert_eq!(badge.surface().text(), "Hello Wor\u{2026}\u{25A0}");
//! ```
//!
//! ## Features
//!
//! *   **Bounded fitting**: the trimming loop stops after the empty prefix and
//!     reports a suffix that can never fit as an error.
//! *   **Grapheme aware**: cuts never split a user-perceived character.
//! *   **Layout aware**: text the layout already elided is restored before
//!     fitting, and the badge lands on the last visible line.
//! *   **Font backed**: measurement with `fontdb` faces parsed by `fontdue`.

pub mod badge_text;
pub mod config;
pub mod fit;
pub mod font_storage;
pub mod font_system;
pub mod line_metrics;
pub mod measure;
pub mod surface;
pub mod text;

// common re-exports
pub use badge_text::{BadgeError, BadgeText, BadgeUpdate, SkipReason};
pub use config::{BadgeConfig, BadgeIcon, ConfigError, IconAlign};
pub use fit::{BadgeSuffix, DecoratedText, FitError, FitResult, decorate, fit};
pub use font_storage::FontStorage;
pub use font_system::FontSystem;
pub use line_metrics::{LineMetrics, LineSpan, strip_elided};

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use parking_lot;
