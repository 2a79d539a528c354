use crate::fit::BadgeSuffix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
/// Vertical placement of the icon glyph relative to the text line.
pub enum IconAlign {
    #[default]
    Center,
    Baseline,
}

/// The drawable shown as a badge.
#[derive(Clone, Debug, PartialEq)]
pub struct BadgeIcon {
    /// Host reference to the drawable, e.g. `@drawable/ic_new`.
    pub resource: String,
    /// Square size in pixels. `None` sizes the icon to the text size.
    pub size: Option<f32>,
    pub align: IconAlign,
}

impl BadgeIcon {
    /// Icon sized to the text and centered on the line.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            size: None,
            align: IconAlign::default(),
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_align(mut self, align: IconAlign) -> Self {
        self.align = align;
        self
    }
}

/// Settings of a [`BadgeText`](crate::BadgeText).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BadgeConfig {
    /// Without an icon the badge is never drawn and the text stays as set.
    pub badge_icon: Option<BadgeIcon>,
    pub show_badge: bool,
    pub suffix: BadgeSuffix,
}

/// Malformed host attribute.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("attribute `{key}` expects `true` or `false`, got {value:?}")]
    InvalidBool { key: String, value: String },
    #[error("attribute `{key}` expects a positive number, got {value:?}")]
    InvalidNumber { key: String, value: String },
    #[error("unknown icon alignment {0:?}, expected `center` or `baseline`")]
    UnknownAlign(String),
}

impl BadgeConfig {
    /// Builds a config from host attribute pairs.
    ///
    /// Recognized keys are `badgeIcon`, `showBadge`, `ellipsis`,
    /// `iconPlaceholder`, `iconAlign` and `iconSize`; a namespace prefix such
    /// as `app:` is ignored. Icon size and alignment only take effect when a
    /// `badgeIcon` is present. Unknown keys are skipped.
    pub fn from_attributes<'a, I>(attrs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        let mut icon_size = None;
        let mut icon_align = IconAlign::default();

        for (key, value) in attrs {
            let name = key.rsplit(':').next().unwrap_or(key);
            match name {
                "badgeIcon" => {
                    let resource = value.trim();
                    config.badge_icon = (!resource.is_empty()).then(|| BadgeIcon::new(resource));
                }
                "showBadge" => config.show_badge = parse_bool(key, value)?,
                "ellipsis" => config.suffix.ellipsis = value.to_string(),
                "iconPlaceholder" => config.suffix.placeholder = value.to_string(),
                "iconAlign" => icon_align = parse_align(value)?,
                "iconSize" => icon_size = Some(parse_size(key, value)?),
                _ => log::debug!("Ignoring unknown badge attribute `{}`.", key),
            }
        }

        if let Some(icon) = config.badge_icon.as_mut() {
            icon.size = icon_size;
            icon.align = icon_align;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_align(value: &str) -> Result<IconAlign, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "center" => Ok(IconAlign::Center),
        "baseline" => Ok(IconAlign::Baseline),
        _ => Err(ConfigError::UnknownAlign(value.to_string())),
    }
}

fn parse_size(key: &str, value: &str) -> Result<f32, ConfigError> {
    let raw = value.trim();
    let raw = raw.strip_suffix("px").unwrap_or(raw);
    match raw.parse::<f32>() {
        Ok(size) if size.is_finite() && size > 0.0 => Ok(size),
        _ => Err(ConfigError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
