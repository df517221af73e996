use serde::Serialize;

use crate::domain::{CollectionId, SeriesBatch};

/// Strictly-positive stand-in for a zero count on the radar chart, so a
/// collection's polygon never collapses onto an axis. A visual choice, not
/// a numeric-precision one.
pub const RADAR_FLOOR: f64 = 0.001;

/// Radius assigned to the largest bubble in the current view; everything
/// else scales down by `sqrt(count / max_count)`.
pub const BUBBLE_SCALE: f64 = 25.0;

/// Per-collection values aligned to a shared category axis.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSeries<T> {
    pub collection: CollectionId,
    pub values: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModalityCounts {
    /// Union of modality codes across collections, in order of first
    /// appearance.
    pub modalities: Vec<String>,
    pub rows: Vec<CollectionSeries<u64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearCounts {
    /// Sorted union of the years seen.
    pub years: Vec<String>,
    pub rows: Vec<CollectionSeries<u64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarCounts {
    pub modalities: Vec<String>,
    /// True counts where positive, `RADAR_FLOOR` where the true count is
    /// zero. Never literal zero.
    pub rows: Vec<CollectionSeries<f64>>,
    /// Largest true count, for scaling the radial axis.
    pub max_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BubblePoint {
    pub year_index: usize,
    pub modality_index: usize,
    pub count: u64,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BubbleSeries {
    pub collection: CollectionId,
    pub points: Vec<BubblePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BubblePlot {
    pub years: Vec<String>,
    pub modalities: Vec<String>,
    pub max_count: u64,
    pub rows: Vec<BubbleSeries>,
}

fn bump(counts: &mut Vec<(String, u64)>, key: &str) {
    match counts.iter_mut().find(|(existing, _)| existing == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

fn union_in_order(rows: &[(CollectionId, Vec<(String, u64)>)]) -> Vec<String> {
    let mut union: Vec<String> = Vec::new();
    for (_, counts) in rows {
        for (key, _) in counts {
            if !union.contains(key) {
                union.push(key.clone());
            }
        }
    }
    union
}

fn aligned(counts: &[(String, u64)], axis: &[String]) -> Vec<u64> {
    axis.iter()
        .map(|key| {
            counts
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, count)| *count)
                .unwrap_or(0)
        })
        .collect()
}

/// Bar chart input: records per modality per collection.
pub fn modality_counts(batch: &SeriesBatch) -> ModalityCounts {
    let per_collection: Vec<(CollectionId, Vec<(String, u64)>)> = batch
        .iter()
        .map(|(collection, records)| {
            let mut counts = Vec::new();
            for record in records {
                bump(&mut counts, &record.modality);
            }
            (collection.clone(), counts)
        })
        .collect();

    let modalities = union_in_order(&per_collection);
    let rows = per_collection
        .iter()
        .map(|(collection, counts)| CollectionSeries {
            collection: collection.clone(),
            values: aligned(counts, &modalities),
        })
        .collect();

    ModalityCounts { modalities, rows }
}

/// Line chart input: records per year per collection. Dateless records are
/// skipped; with a modality filter active only matching records count.
pub fn year_counts(batch: &SeriesBatch, modality_filter: Option<&str>) -> YearCounts {
    let per_collection: Vec<(CollectionId, Vec<(String, u64)>)> = batch
        .iter()
        .map(|(collection, records)| {
            let mut counts = Vec::new();
            for record in records {
                let Some(year) = record.year() else {
                    continue;
                };
                if let Some(filter) = modality_filter {
                    if record.modality != filter {
                        continue;
                    }
                }
                bump(&mut counts, year);
            }
            (collection.clone(), counts)
        })
        .collect();

    let mut years = union_in_order(&per_collection);
    years.sort();
    let rows = per_collection
        .iter()
        .map(|(collection, counts)| CollectionSeries {
            collection: collection.clone(),
            values: aligned(counts, &years),
        })
        .collect();

    YearCounts { years, rows }
}

/// Radar chart input: the bar chart grouping with zeros lifted to
/// `RADAR_FLOOR`.
pub fn radar_counts(batch: &SeriesBatch) -> RadarCounts {
    let ModalityCounts { modalities, rows } = modality_counts(batch);
    let max_count = rows
        .iter()
        .flat_map(|row| row.values.iter().copied())
        .max()
        .unwrap_or(0);

    let rows = rows
        .into_iter()
        .map(|row| CollectionSeries {
            collection: row.collection,
            values: row
                .values
                .into_iter()
                .map(|count| if count == 0 { RADAR_FLOOR } else { count as f64 })
                .collect(),
        })
        .collect();

    RadarCounts {
        modalities,
        rows,
        max_count,
    }
}

/// Bubble chart input: one point per `(year, modality)` pair per
/// collection. Records with a missing date or an unknown modality are
/// excluded. With no qualifying records at all the plot is empty rather
/// than dividing by a zero max.
pub fn bubble_plot(batch: &SeriesBatch) -> BubblePlot {
    let per_collection: Vec<(CollectionId, Vec<((String, String), u64)>)> = batch
        .iter()
        .map(|(collection, records)| {
            let mut counts: Vec<((String, String), u64)> = Vec::new();
            for record in records {
                if record.modality == "Unknown" {
                    continue;
                }
                let Some(year) = record.year() else {
                    continue;
                };
                let key = (year.to_string(), record.modality.clone());
                match counts.iter_mut().find(|(existing, _)| *existing == key) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((key, 1)),
                }
            }
            (collection.clone(), counts)
        })
        .collect();

    let mut years: Vec<String> = Vec::new();
    let mut modalities: Vec<String> = Vec::new();
    for (_, counts) in &per_collection {
        for ((year, modality), _) in counts {
            if !years.contains(year) {
                years.push(year.clone());
            }
            if !modalities.contains(modality) {
                modalities.push(modality.clone());
            }
        }
    }
    years.sort();

    let max_count = per_collection
        .iter()
        .flat_map(|(_, counts)| counts.iter().map(|(_, count)| *count))
        .max()
        .unwrap_or(0);

    if max_count == 0 {
        return BubblePlot {
            years,
            modalities,
            max_count,
            rows: Vec::new(),
        };
    }

    let rows = per_collection
        .into_iter()
        .map(|(collection, counts)| BubbleSeries {
            collection,
            points: counts
                .into_iter()
                .map(|((year, modality), count)| BubblePoint {
                    year_index: years.iter().position(|y| *y == year).unwrap_or(0),
                    modality_index: modalities.iter().position(|m| *m == modality).unwrap_or(0),
                    count,
                    radius: (count as f64 / max_count as f64).sqrt() * BUBBLE_SCALE,
                })
                .collect(),
        })
        .collect();

    BubblePlot {
        years,
        modalities,
        max_count,
        rows,
    }
}
