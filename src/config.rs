//! Screen configuration types and builder

pub use crate::error::BuilderError;

/// Logical screen rotation relative to the framebuffer's native orientation
///
/// The rotation is the clockwise transform taking logical coordinates to
/// device coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rotation {
    /// No rotation
    #[default]
    None = 0,
    /// Rotate 90 degrees clockwise
    Rot90 = 1,
    /// Rotate 180 degrees
    Rot180 = 2,
    /// Rotate 270 degrees clockwise
    Rot270 = 3,
}

impl Rotation {
    /// All rotations, in ordinal order
    pub const ALL: [Self; 4] = [Self::None, Self::Rot90, Self::Rot180, Self::Rot270];

    /// Rotation from an angle in degrees
    ///
    /// Anything other than 0, 90, 180 or 270 falls back to [`Rotation::None`].
    pub const fn from_degrees(degrees: u32) -> Self {
        match degrees {
            90 => Self::Rot90,
            180 => Self::Rot180,
            270 => Self::Rot270,
            _ => Self::None,
        }
    }

    /// Rotation from its ordinal (0..=3); out of range falls back to `None`
    pub const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            1 => Self::Rot90,
            2 => Self::Rot180,
            3 => Self::Rot270,
            _ => Self::None,
        }
    }

    /// Rotation from a configuration token
    ///
    /// Accepts plain degrees (`"90"`) or a `rot` prefix in any case
    /// (`"Rot90"`, `"rot270"`). Malformed or unknown tokens yield `None`.
    ///
    /// ```
    /// use transformed_screen::Rotation;
    ///
    /// assert_eq!(Rotation::from_token("Rot90"), Rotation::Rot90);
    /// assert_eq!(Rotation::from_token("180"), Rotation::Rot180);
    /// assert_eq!(Rotation::from_token("sideways"), Rotation::None);
    /// ```
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        let digits = match token.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("rot") => &token[3..],
            _ => token,
        };
        digits
            .parse::<u32>()
            .map_or(Self::None, Self::from_degrees)
    }

    /// Clockwise angle in degrees
    pub const fn degrees(self) -> u32 {
        self as u32 * 90
    }

    /// Ordinal code 0..=3
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Whether logical and device extents are swapped
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Rot90 | Self::Rot270)
    }
}

/// How many rects of the combined dirty region a single blit copies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RectPolicy {
    /// Copy only the first rect of the combined region
    #[default]
    FirstOnly,
    /// Copy every rect of the combined region
    All,
}

/// Layout of a multi-panel (page flipped) framebuffer
///
/// The framebuffer holds `panel_count` full screens stacked vertically, each
/// `rows_per_panel` device rows tall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelGeometry {
    /// Device rows in one panel
    pub rows_per_panel: u32,
    /// Number of panels to alternate between
    pub panel_count: u32,
}

impl PanelGeometry {
    /// Create panel geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidPanelGeometry` if `rows_per_panel` is 0 or
    /// fewer than two panels are requested.
    pub const fn new(rows_per_panel: u32, panel_count: u32) -> Result<Self, BuilderError> {
        if rows_per_panel == 0 || panel_count < 2 {
            return Err(BuilderError::InvalidPanelGeometry {
                rows_per_panel,
                panel_count,
            });
        }
        Ok(Self {
            rows_per_panel,
            panel_count,
        })
    }

    /// Byte offset of a panel's first row for the given line stride
    pub const fn byte_offset(&self, panel: u32, linestep: usize) -> usize {
        panel as usize * self.rows_per_panel as usize * linestep
    }
}

/// Screen configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Initial rotation
    pub rotation: Rotation,
    /// Rect processing policy for rotated blits
    pub rect_policy: RectPolicy,
    /// Page flip geometry; `None` disables dual-panel output
    pub panels: Option<PanelGeometry>,
}

/// Builder for constructing screen configuration
///
/// # Example
///
/// ```
/// use transformed_screen::{Builder, PanelGeometry, RectPolicy, Rotation};
///
/// let panels = match PanelGeometry::new(864, 2) {
///     Ok(panels) => panels,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .rotation(Rotation::Rot270)
///     .rect_policy(RectPolicy::All)
///     .panels(panels)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.rotation, Rotation::Rot270);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    rotation: Rotation,
    rect_policy: RectPolicy,
    panels: Option<PanelGeometry>,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the rotation from a configuration token such as `"Rot90"`
    pub fn rotation_token(mut self, token: &str) -> Self {
        self.rotation = Rotation::from_token(token);
        self
    }

    /// Set how many rects one blit copies
    pub fn rect_policy(mut self, policy: RectPolicy) -> Self {
        self.rect_policy = policy;
        self
    }

    /// Enable dual-panel output with the given geometry
    pub fn panels(mut self, panels: PanelGeometry) -> Self {
        self.panels = Some(panels);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidPanelGeometry` if panel geometry was
    /// assembled by hand with zero rows or fewer than two panels.
    pub fn build(self) -> Result<Config, BuilderError> {
        if let Some(panels) = self.panels {
            PanelGeometry::new(panels.rows_per_panel, panels.panel_count)?;
        }
        Ok(Config {
            rotation: self.rotation,
            rect_policy: self.rect_policy,
            panels: self.panels,
        })
    }
}
