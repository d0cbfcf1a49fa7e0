//! Hard-coded settings of the demo clients
//!
//! None of the programs reads flags, files or environment variables; the binaries always run
//! with [`Config::default()`].

use crate::render::Color;

/// Settings shared by the three programs
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Initial logical size of every window
    pub size: (i32, i32),
    /// Clear color of the plain toplevel window and of the layer panel
    pub window_color: Color,
    /// Layer-shell panel settings
    pub layer: LayerConfig,
    /// Text-input window settings
    pub text_input: TextInputConfig,
}

/// Settings of the layer-shell panel and its sub-surface
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    /// Namespace given to the compositor for the layer surface
    pub namespace: String,
    /// Position of the sub-surface relative to the panel
    pub child_offset: (i32, i32),
    /// How much smaller than the panel the sub-surface is, on each axis
    pub child_inset: i32,
    /// Clear color of the sub-surface
    pub child_color: Color,
}

/// Settings of the text-input window
#[derive(Debug, Clone, PartialEq)]
pub struct TextInputConfig {
    /// Clear color while text input is disabled
    pub idle_color: Color,
    /// Clear color while text input is enabled
    pub active_color: Color,
    /// Side length of the square cursor surface
    pub cursor_size: i32,
    /// Clear color of the cursor surface
    pub cursor_color: Color,
    /// Cursor hotspot, in surface coordinates
    pub cursor_hotspot: (i32, i32),
    /// Rectangle reported to the input method as the text cursor
    pub cursor_rectangle: (i32, i32, i32, i32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: (300, 300),
            window_color: Color::rgb(0.0, 0.5, 1.0),
            layer: LayerConfig::default(),
            text_input: TextInputConfig::default(),
        }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            namespace: "example".into(),
            child_offset: (100, 100),
            child_inset: 40,
            child_color: Color::rgb(0.0, 1.0, 0.5),
        }
    }
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self {
            idle_color: Color::rgb(0.0, 0.2, 0.4),
            active_color: Color::rgb(0.2, 0.6, 1.0),
            cursor_size: 30,
            cursor_color: Color::rgb(1.0, 1.0, 1.0),
            cursor_hotspot: (10, 10),
            cursor_rectangle: (10, 10, 0, 20),
        }
    }
}

impl LayerConfig {
    /// Size of the sub-surface for a panel of the given size
    pub fn child_size(&self, (width, height): (i32, i32)) -> (i32, i32) {
        (width - self.child_inset, height - self.child_inset)
    }
}
