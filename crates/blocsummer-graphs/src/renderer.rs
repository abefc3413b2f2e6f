//! Chart rendering trait and the venue comparison chart.

use crate::comparison::{PanelKind, PanelSeries, VenueComparison};
use crate::types::{ChartStyle, NEW_COLOR, NEW_LABEL, OLD_COLOR, OLD_LABEL};
use blocsummer_common::{BlocError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Half the width of one boulder slot taken by a single bar.
const BAR_WIDTH: f64 = 0.4;

/// Renders a chart into an image file.
pub trait ChartRenderer {
    /// Draw the chart and write it to `path`.
    fn render_to_file(&self, path: &Path) -> Result<()>;
}

/// Writes the chart of one venue comparison.
///
/// Called from a blocking task, one venue at a time.
pub trait ComparisonRenderer: Send + Sync + 'static {
    /// Draw `comparison` with `style` and write it to `path`.
    fn render(&self, comparison: &VenueComparison, style: &ChartStyle, path: &Path) -> Result<()>;
}

/// PNG output through plotters' bitmap backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRenderer;

impl ComparisonRenderer for BitmapRenderer {
    fn render(&self, comparison: &VenueComparison, style: &ChartStyle, path: &Path) -> Result<()> {
        VenueComparisonGraph::new(comparison, style).render_to_file(path)
    }
}

/// Which day a bar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    /// Left bar, green.
    Today,
    /// Right bar, red.
    Yesterday,
}

/// Horizontal extent of the bar of `day` in slot `index`.
///
/// Today's bar sits left of the slot center, yesterday's right of it.
#[allow(clippy::cast_precision_loss)]
pub fn bar_span(index: usize, day: Day) -> (f64, f64) {
    let center = index as f64;
    match day {
        Day::Today => (center - BAR_WIDTH, center),
        Day::Yesterday => (center, center + BAR_WIDTH),
    }
}

/// Upper bound of the y axis of a panel.
pub fn y_upper(panel: &PanelSeries) -> f64 {
    match panel.kind.fixed_range() {
        Some((_, upper)) => upper,
        None => (panel.max_value() * 1.1).max(1.0),
    }
}

/// Label of the slot at axis position `x`; blank between slots.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn slot_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if rounded < 0.0 || (x - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// The 3×3 composite comparing today with yesterday for one venue.
#[derive(Debug)]
pub struct VenueComparisonGraph<'a> {
    comparison: &'a VenueComparison,
    style: &'a ChartStyle,
}

impl<'a> VenueComparisonGraph<'a> {
    /// Chart of `comparison` drawn with `style`.
    pub const fn new(comparison: &'a VenueComparison, style: &'a ChartStyle) -> Self {
        Self { comparison, style }
    }

    /// Draw the composite onto any plotters backend.
    pub fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.comparison.panels.is_empty() {
            return Err(BlocError::graph(format!(
                "No panels to draw for {}",
                self.comparison.venue
            )));
        }

        root.fill(&WHITE)?;
        let title = self.comparison.venue.to_string();
        let body = root.titled(
            &title,
            (self.style.font_family.as_str(), self.style.title_size),
        )?;

        for (area, panel) in body.split_evenly((3, 3)).iter().zip(&self.comparison.panels) {
            self.draw_panel(area, panel)?;
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_panel<DB>(&self, area: &DrawingArea<DB, Shift>, panel: &PanelSeries) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let font = self.style.font_family.as_str();
        let slots = panel.labels.len();

        let mut chart = ChartBuilder::on(area)
            .caption(panel.title(), (font, self.style.caption_size))
            .margin(self.style.label_size)
            .x_label_area_size(self.style.label_size * 4)
            .y_label_area_size(self.style.label_size * 6)
            .build_cartesian_2d(-0.5..(slots as f64 - 0.5), 0.0..y_upper(panel))?;

        let labels = &panel.labels;
        let formatter = |x: &f64| slot_label(labels, *x);
        let y_ticks = if panel.kind == PanelKind::Reached { 11 } else { 10 };

        chart
            .configure_mesh()
            .x_labels(slots)
            .x_label_formatter(&formatter)
            .y_labels(y_ticks)
            .label_style((font, self.style.label_size))
            .light_line_style(BLACK.mix(0.05))
            .draw()?;

        for (day, values, color, label) in [
            (Day::Today, &panel.today, NEW_COLOR, NEW_LABEL),
            (Day::Yesterday, &panel.yesterday, OLD_COLOR, OLD_LABEL),
        ] {
            chart
                .draw_series(values.iter().enumerate().map(|(i, &value)| {
                    let (left, right) = bar_span(i, day);
                    Rectangle::new([(left, 0.0), (right, value)], color.filled())
                }))?
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((font, self.style.label_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

impl ChartRenderer for VenueComparisonGraph<'_> {
    fn render_to_file(&self, path: &Path) -> Result<()> {
        let root =
            BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        self.draw(&root)?;
        root.present()?;

        tracing::info!("Rendered {} chart to {}", self.comparison.venue, path.display());
        Ok(())
    }
}
