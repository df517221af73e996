use ratatui::style::Color;

use crate::aggregate::{BubblePlot, ModalityCounts, RadarCounts, YearCounts};
use crate::color::distinct_color;
use crate::labels::Labels;

/// Exclusive owner of one chart pane's drawing state. Each aggregation
/// cycle replaces the slot's model atomically; the previous model is
/// dropped before the pane is redrawn from the new one.
#[derive(Debug)]
pub struct ChartSlot<T> {
    current: Option<T>,
}

// Manual impl: an empty slot needs no `T: Default`.
impl<T> Default for ChartSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> ChartSlot<T> {
    pub fn replace(&mut self, model: T) {
        self.current = Some(model);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct BarModel {
    /// Display names for the shared modality axis.
    pub labels: Vec<String>,
    pub series: Vec<(SeriesStyle, Vec<u64>)>,
    pub max: u64,
}

#[derive(Debug, Clone)]
pub struct LineModel {
    pub years: Vec<String>,
    pub series: Vec<(SeriesStyle, Vec<u64>)>,
    pub max: u64,
}

#[derive(Debug, Clone)]
pub struct RadarModel {
    pub axes: Vec<String>,
    pub series: Vec<(SeriesStyle, Vec<f64>)>,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct BubbleMark {
    pub year_index: usize,
    pub modality_index: usize,
    pub count: u64,
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct BubbleModel {
    pub years: Vec<String>,
    pub modalities: Vec<String>,
    pub series: Vec<(SeriesStyle, Vec<BubbleMark>)>,
}

fn series_style(collection: &str) -> SeriesStyle {
    let (r, g, b) = distinct_color(collection).to_rgb();
    SeriesStyle {
        name: collection.to_string(),
        color: Color::Rgb(r, g, b),
    }
}

pub fn bar_model(counts: &ModalityCounts, labels: &Labels) -> BarModel {
    let max = counts
        .rows
        .iter()
        .flat_map(|row| row.values.iter().copied())
        .max()
        .unwrap_or(0);
    BarModel {
        labels: counts
            .modalities
            .iter()
            .map(|code| labels.modality_label(code))
            .collect(),
        series: counts
            .rows
            .iter()
            .map(|row| (series_style(row.collection.as_str()), row.values.clone()))
            .collect(),
        max,
    }
}

pub fn line_model(counts: &YearCounts) -> LineModel {
    let max = counts
        .rows
        .iter()
        .flat_map(|row| row.values.iter().copied())
        .max()
        .unwrap_or(0);
    LineModel {
        years: counts.years.clone(),
        series: counts
            .rows
            .iter()
            .map(|row| (series_style(row.collection.as_str()), row.values.clone()))
            .collect(),
        max,
    }
}

pub fn radar_model(counts: &RadarCounts, labels: &Labels) -> RadarModel {
    RadarModel {
        axes: counts
            .modalities
            .iter()
            .map(|code| labels.modality_label(code))
            .collect(),
        series: counts
            .rows
            .iter()
            .map(|row| (series_style(row.collection.as_str()), row.values.clone()))
            .collect(),
        max: counts.max_count.max(1) as f64,
    }
}

pub fn bubble_model(plot: &BubblePlot, labels: &Labels) -> BubbleModel {
    BubbleModel {
        years: plot.years.clone(),
        modalities: plot
            .modalities
            .iter()
            .map(|code| labels.modality_label(code))
            .collect(),
        series: plot
            .rows
            .iter()
            .map(|row| {
                (
                    series_style(row.collection.as_str()),
                    row.points
                        .iter()
                        .map(|point| BubbleMark {
                            year_index: point.year_index,
                            modality_index: point.modality_index,
                            count: point.count,
                            radius: point.radius,
                        })
                        .collect(),
                )
            })
            .collect(),
    }
}
