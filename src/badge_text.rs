use crate::{
    config::{BadgeConfig, BadgeIcon, ConfigError},
    fit::{DecoratedText, FitError, decorate, fit},
    line_metrics::{split_last_line, strip_elided},
    surface::{InlineGlyph, TextSurface},
};

/// Why a recomputation left the text untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The badge is turned off.
    Hidden,
    /// The surface is not visible; retried on the next layout pass.
    Invisible,
    /// There is no text to put a badge after.
    EmptyText,
    /// No icon is configured.
    NoIcon,
}

/// What a call into [`BadgeText`] did to the displayed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BadgeUpdate {
    /// The badge was fitted and the decorated text is displayed.
    Applied(DecoratedText),
    /// The displayed text already is the decorated text.
    Unchanged,
    /// Waiting for the surface to be laid out; see [`BadgeText::on_layout`].
    Deferred,
    /// Nothing was done for the given reason.
    Skipped(SkipReason),
    /// Nothing was pending.
    Idle,
}

/// Errors returned by [`BadgeText`] operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BadgeError {
    /// The badge does not fit on the last line.
    #[error(transparent)]
    Fit(#[from] FitError),
    /// Host attributes could not be parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Text element that shows a badge icon after its last visible character.
///
/// The element is either *shown* or *hidden*. While shown, the last visible
/// line is re-truncated so that an ellipsis and the icon fit on it; hiding
/// restores the text exactly as it was set.
///
/// Fitting needs line metrics, which only exist after the surface has been
/// laid out. Requests made before that are remembered and carried out by
/// [`BadgeText::on_layout`], which the host calls after every layout pass.
pub struct BadgeText<S> {
    surface: S,
    config: BadgeConfig,
    /// Text as set by the user, without any decoration.
    raw_text: String,
    /// Last text pushed to the surface with a badge.
    last_applied: Option<DecoratedText>,
    pending: bool,
}

impl<S: TextSurface> BadgeText<S> {
    /// Wraps `surface`, taking its current text as the undecorated text.
    pub fn new(surface: S, config: BadgeConfig) -> Self {
        let raw_text = surface.text().to_string();
        Self {
            surface,
            pending: config.show_badge,
            config,
            raw_text,
            last_applied: None,
        }
    }

    /// Creates the element from host attribute pairs, see
    /// [`BadgeConfig::from_attributes`].
    pub fn from_attributes<'a, I>(surface: S, attrs: I) -> Result<Self, BadgeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let config = BadgeConfig::from_attributes(attrs)?;
        Ok(Self::new(surface, config))
    }

    /// Sets the text and, when the badge is shown, requests a new fit.
    ///
    /// Setting the text that is already displayed with a badge is a no-op so
    /// hosts that echo the displayed text back do not trigger another pass.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<BadgeUpdate, BadgeError> {
        let text = text.into();
        if self
            .last_applied
            .as_ref()
            .is_some_and(|applied| applied.text == text)
        {
            return Ok(BadgeUpdate::Unchanged);
        }

        self.raw_text = text;
        self.restore_raw_text();

        if self.config.show_badge {
            self.pending = true;
            self.recompute_badge()
        } else {
            Ok(BadgeUpdate::Skipped(SkipReason::Hidden))
        }
    }

    /// Shows or hides the badge. Hiding puts the undecorated text back.
    pub fn set_show_badge(&mut self, show: bool) -> Result<BadgeUpdate, BadgeError> {
        self.config.show_badge = show;

        if show {
            self.pending = true;
            return self.recompute_badge();
        }

        self.restore_raw_text();
        self.pending = false;
        Ok(BadgeUpdate::Skipped(SkipReason::Hidden))
    }

    /// Replaces the icon and fits the badge again.
    pub fn set_badge_icon(&mut self, icon: Option<BadgeIcon>) -> Result<BadgeUpdate, BadgeError> {
        self.config.badge_icon = icon;
        self.invalidate_badge()
    }

    /// Drops the current decoration and requests a new fit.
    ///
    /// Call after anything that changes the available width, such as a resize.
    pub fn invalidate_badge(&mut self) -> Result<BadgeUpdate, BadgeError> {
        self.restore_raw_text();
        if !self.config.show_badge {
            return Ok(BadgeUpdate::Skipped(SkipReason::Hidden));
        }
        self.pending = true;
        self.recompute_badge()
    }

    /// Post-layout hook: carries out a pending recomputation, if any.
    pub fn on_layout(&mut self) -> Result<BadgeUpdate, BadgeError> {
        if !self.pending {
            return Ok(BadgeUpdate::Idle);
        }
        self.recompute_badge()
    }

    /// Fits the badge onto the last visible line and displays the result.
    ///
    /// Must run after the surface has line metrics for its current text;
    /// otherwise the request stays pending and [`BadgeUpdate::Deferred`] is
    /// returned. When the suffix cannot fit at all the error is returned and
    /// the undecorated text stays on the surface.
    pub fn recompute_badge(&mut self) -> Result<BadgeUpdate, BadgeError> {
        if !self.config.show_badge {
            self.pending = false;
            return Ok(BadgeUpdate::Skipped(SkipReason::Hidden));
        }
        if !self.surface.is_visible() {
            // Retried on the next layout pass.
            return Ok(BadgeUpdate::Skipped(SkipReason::Invisible));
        }
        if self.raw_text.is_empty() {
            self.pending = false;
            return Ok(BadgeUpdate::Skipped(SkipReason::EmptyText));
        }
        let Some(icon) = &self.config.badge_icon else {
            self.pending = false;
            return Ok(BadgeUpdate::Skipped(SkipReason::NoIcon));
        };

        if self
            .last_applied
            .as_ref()
            .is_some_and(|applied| applied.text == self.surface.text())
        {
            self.pending = false;
            return Ok(BadgeUpdate::Unchanged);
        }

        if self.surface.text() != self.raw_text {
            // Someone else changed the surface; fit the text we own instead.
            self.surface.set_raw_text(&self.raw_text);
            self.surface.clear_inline_glyph();
        }

        let Some(metrics) = self.surface.line_metrics() else {
            log::debug!("Badge recomputation deferred until layout.");
            self.pending = true;
            return Ok(BadgeUpdate::Deferred);
        };

        let visible = strip_elided(self.surface.text(), metrics);
        let (head, last_line) = split_last_line(visible, metrics);
        let available_width = self.surface.available_width();
        let measure = |text: &str| self.surface.measure_width(text);

        let decorated = match fit(last_line, &self.config.suffix, available_width, &measure) {
            Ok(fitted) => decorate(head, &fitted, &self.config.suffix, metrics.is_elided()),
            Err(e) => {
                log::warn!("Badge does not fit, showing text without it: {}", e);
                self.pending = false;
                return Err(e.into());
            }
        };

        let glyph = InlineGlyph {
            range: decorated.glyph_range.clone(),
            resource: icon.resource.clone(),
            size: icon.size.unwrap_or_else(|| self.surface.text_size()),
            align: icon.align,
        };

        self.surface.set_raw_text(&decorated.text);
        self.surface.attach_inline_glyph(glyph);
        self.last_applied = Some(decorated.clone());
        self.pending = false;

        Ok(BadgeUpdate::Applied(decorated))
    }

    fn restore_raw_text(&mut self) {
        self.surface.set_raw_text(&self.raw_text);
        self.surface.clear_inline_glyph();
        self.last_applied = None;
    }
}

/// Accessors
impl<S> BadgeText<S> {
    /// The text as set, without decoration.
    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn is_show_badge(&self) -> bool {
        self.config.show_badge
    }

    pub fn badge_icon(&self) -> Option<&BadgeIcon> {
        self.config.badge_icon.as_ref()
    }

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// The decoration currently displayed, if any.
    pub fn decorated(&self) -> Option<&DecoratedText> {
        self.last_applied.as_ref()
    }

    /// Whether a recomputation waits for the next layout pass.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for the host, e.g. to run layout or resize.
    ///
    /// Changes to the width must be followed by
    /// [`BadgeText::invalidate_badge`].
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
