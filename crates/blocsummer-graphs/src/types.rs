//! Chart styling shared by the renderers.

use blocsummer_config::GraphsConfig;
use plotters::style::RGBColor;

/// Bar color of today's values.
pub const NEW_COLOR: RGBColor = RGBColor(0, 153, 0);

/// Bar color of yesterday's values.
pub const OLD_COLOR: RGBColor = RGBColor(255, 102, 102);

/// Legend entry of today's bars.
pub const NEW_LABEL: &str = "new";

/// Legend entry of yesterday's bars.
pub const OLD_LABEL: &str = "old";

/// Size and fonts of a composite chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Font used for every text element
    pub font_family: String,
    /// Venue title above the grid
    pub title_size: u32,
    /// Panel captions
    pub caption_size: u32,
    /// Axis labels and legend; also sets panel margins
    pub label_size: u32,
}

impl ChartStyle {
    /// Style for the configured image size, with font sizes scaled to its height.
    pub fn from_config(config: &GraphsConfig) -> Self {
        let scale = (config.height / 300).max(1);
        Self {
            width: config.width,
            height: config.height,
            font_family: config.font_family.clone(),
            title_size: 10 * scale,
            caption_size: 6 * scale,
            label_size: 3 * scale,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_config(&GraphsConfig::default())
    }
}
