//! Transform settings WASM bindings.
//!
//! Wraps the core [`SettingsModel`] so the form's number inputs can write
//! straight into it. JavaScript numbers arrive as `f64`; they are rounded and
//! then clamped by the model, so no setter ever throws.

use reframe_core::settings::{CropField, Flip, SettingsModel};
use wasm_bindgen::prelude::*;

/// Convert a JavaScript number to an integer for the clamping mutators.
///
/// NaN becomes 0 and infinities saturate.
pub(crate) fn js_number_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        0
    } else {
        value.round() as i64
    }
}

/// Transform settings wrapper for JavaScript
#[wasm_bindgen]
pub struct TransformSettings {
    model: SettingsModel,
}

#[wasm_bindgen]
impl TransformSettings {
    /// Create settings with default values
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            model: SettingsModel::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.model.get().width
    }

    /// Set target width (0 keeps the current width)
    #[wasm_bindgen(setter)]
    pub fn set_width(&mut self, value: f64) {
        self.model.set_width(js_number_to_i64(value));
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.model.get().height
    }

    /// Set target height (0 keeps the current height)
    #[wasm_bindgen(setter)]
    pub fn set_height(&mut self, value: f64) {
        self.model.set_height(js_number_to_i64(value));
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> i32 {
        self.model.get().rotation
    }

    /// Set clockwise rotation in degrees, clamped to 0..=360
    #[wasm_bindgen(setter)]
    pub fn set_rotation(&mut self, value: f64) {
        self.model.set_rotation(js_number_to_i64(value));
    }

    /// Flip mode: "none", "horizontal", "vertical" or "both"
    #[wasm_bindgen(getter)]
    pub fn flip(&self) -> String {
        self.model.get().flip.as_str().to_string()
    }

    /// Set flip mode. Unknown names fall back to "none".
    #[wasm_bindgen(setter)]
    pub fn set_flip(&mut self, value: String) {
        self.model.set_flip(value.parse().unwrap_or(Flip::None));
    }

    #[wasm_bindgen(getter, js_name = cropEnabled)]
    pub fn crop_enabled(&self) -> bool {
        self.model.get().crop_enabled
    }

    #[wasm_bindgen(setter, js_name = cropEnabled)]
    pub fn set_crop_enabled(&mut self, enabled: bool) {
        self.model.set_crop_enabled(enabled);
    }

    #[wasm_bindgen(getter)]
    pub fn crop_x(&self) -> u32 {
        self.model.get().crop.x
    }

    #[wasm_bindgen(getter)]
    pub fn crop_y(&self) -> u32 {
        self.model.get().crop.y
    }

    #[wasm_bindgen(getter)]
    pub fn crop_width(&self) -> u32 {
        self.model.get().crop.width
    }

    #[wasm_bindgen(getter)]
    pub fn crop_height(&self) -> u32 {
        self.model.get().crop.height
    }

    /// Set one crop field by name ("x", "y", "width", "height").
    pub fn set_crop_field(&mut self, field: &str, value: f64) -> Result<(), JsValue> {
        let field: CropField = field.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.model.set_crop_field(field, js_number_to_i64(value));
        Ok(())
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        self.model.get().is_default()
    }

    /// Restore every field to its default
    pub fn reset(&mut self) {
        self.model.reset();
    }

    /// Serialize to the wire object (`cropEnabled` in camelCase)
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.model.get()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from a wire object
    pub fn from_json(value: JsValue) -> Result<TransformSettings, JsValue> {
        let snapshot: reframe_core::TransformSettings =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformSettings {
    pub(crate) fn from_snapshot(snapshot: reframe_core::TransformSettings) -> Self {
        Self {
            model: SettingsModel::from(snapshot),
        }
    }

    /// Current immutable snapshot
    pub(crate) fn snapshot(&self) -> reframe_core::TransformSettings {
        self.model.get()
    }
}
