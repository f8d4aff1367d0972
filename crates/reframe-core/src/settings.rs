//! Transform settings and the single-owner settings model.
//!
//! [`TransformSettings`] is a plain `Copy` value: every submission takes a
//! snapshot of it, so nothing downstream can observe later edits.
//! [`SettingsModel`] owns the current snapshot and exposes one mutator per
//! field. Mutators clamp raw user input into range instead of failing.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "width": 400, "height": 0, "rotation": 90, "flip": "horizontal",
//!   "crop": {"x": 0, "y": 0, "width": 100, "height": 100},
//!   "cropEnabled": true
//! }
//! ```
//!
//! Every field is optional when deserializing; missing fields take their
//! default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::transform::{normalize_degrees, validate_crop, TransformError};

/// Mirror operation applied as the last pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    /// All variants in form order.
    pub const ALL: [Flip; 4] = [Flip::None, Flip::Horizontal, Flip::Vertical, Flip::Both];

    /// True if the flip swaps left and right.
    pub fn mirrors_horizontally(self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Both)
    }

    /// True if the flip swaps top and bottom.
    pub fn mirrors_vertically(self) -> bool {
        matches!(self, Flip::Vertical | Flip::Both)
    }

    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Flip::None => "none",
            Flip::Horizontal => "horizontal",
            Flip::Vertical => "vertical",
            Flip::Both => "both",
        }
    }
}

impl fmt::Display for Flip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flip {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flip::ALL
            .into_iter()
            .find(|flip| flip.as_str() == s)
            .ok_or_else(|| format!("unknown flip mode '{}'", s))
    }
}

/// Crop rectangle in source pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One field of [`CropRect`], for the field-scoped crop mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropField {
    X,
    Y,
    Width,
    Height,
}

impl CropField {
    /// Smallest value the field accepts at entry.
    fn minimum(self) -> i64 {
        match self {
            CropField::X | CropField::Y => 0,
            CropField::Width | CropField::Height => 1,
        }
    }
}

impl FromStr for CropField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(CropField::X),
            "y" => Ok(CropField::Y),
            "width" => Ok(CropField::Width),
            "height" => Ok(CropField::Height),
            other => Err(format!("unknown crop field '{}'", other)),
        }
    }
}

/// The requested transform.
///
/// `width`/`height` of 0 mean "keep the current size". `rotation` is in
/// clockwise degrees; any integer is accepted on the wire and normalized
/// into `[0, 360)` before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformSettings {
    pub width: u32,
    pub height: u32,
    pub rotation: i32,
    pub flip: Flip,
    pub crop: CropRect,
    pub crop_enabled: bool,
}

impl TransformSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Rotation in `[0, 360)`.
    pub fn normalized_rotation(&self) -> u32 {
        normalize_degrees(self.rotation)
    }

    /// The crop rectangle if cropping is enabled.
    pub fn active_crop(&self) -> Option<&CropRect> {
        self.crop_enabled.then_some(&self.crop)
    }

    /// Check the crop rectangle against known source dimensions.
    ///
    /// A no-op when cropping is disabled. Returns the same errors the crop
    /// stage would, so the client can refuse to submit a request the service
    /// is certain to reject.
    pub fn validate_against(&self, source_width: u32, source_height: u32) -> Result<(), TransformError> {
        match self.active_crop() {
            Some(rect) => validate_crop(rect, source_width, source_height),
            None => Ok(()),
        }
    }

    /// Serialize to the JSON settings part.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse the JSON settings part.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Clamp raw user input into `[min, u32::MAX]`.
fn clamp_u32(value: i64, min: i64) -> u32 {
    value.clamp(min, u32::MAX as i64) as u32
}

/// Single owner of the form's current settings.
///
/// Each mutator replaces the snapshot with a copy carrying exactly one
/// changed field. Dependent fields are never recomputed.
#[derive(Debug, Clone, Default)]
pub struct SettingsModel {
    current: TransformSettings,
}

impl SettingsModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current immutable snapshot.
    pub fn get(&self) -> TransformSettings {
        self.current
    }

    pub fn set_width(&mut self, value: i64) {
        self.current = TransformSettings {
            width: clamp_u32(value, 0),
            ..self.current
        };
    }

    pub fn set_height(&mut self, value: i64) {
        self.current = TransformSettings {
            height: clamp_u32(value, 0),
            ..self.current
        };
    }

    /// Set the rotation, clamped into `[0, 360]`.
    pub fn set_rotation(&mut self, value: i64) {
        self.current = TransformSettings {
            rotation: value.clamp(0, 360) as i32,
            ..self.current
        };
    }

    pub fn set_flip(&mut self, flip: Flip) {
        self.current = TransformSettings {
            flip,
            ..self.current
        };
    }

    pub fn set_crop_enabled(&mut self, enabled: bool) {
        self.current = TransformSettings {
            crop_enabled: enabled,
            ..self.current
        };
    }

    /// Set one crop field. `x`/`y` clamp to `>= 0`, `width`/`height` to `>= 1`.
    pub fn set_crop_field(&mut self, field: CropField, value: i64) {
        let value = clamp_u32(value, field.minimum());
        let mut crop = self.current.crop;
        match field {
            CropField::X => crop.x = value,
            CropField::Y => crop.y = value,
            CropField::Width => crop.width = value,
            CropField::Height => crop.height = value,
        }
        self.current = TransformSettings {
            crop,
            ..self.current
        };
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        self.current = TransformSettings::default();
    }
}

impl From<TransformSettings> for SettingsModel {
    fn from(current: TransformSettings) -> Self {
        Self { current }
    }
}
