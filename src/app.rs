use std::time::{Duration, Instant};

use serde::Serialize;

use crate::aggregate::{
    BubblePlot, ModalityCounts, RadarCounts, YearCounts, bubble_plot, modality_counts,
    radar_counts, year_counts,
};
use crate::catalog::load_catalog;
use crate::domain::{Collection, CollectionId, SeriesBatch};
use crate::error::DashError;
use crate::labels::Labels;
use crate::nbia::{NbiaClient, fetch_series_set};

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// All four chart datasets for one selection, recomputed from scratch every
/// cycle.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub modality: ModalityCounts,
    pub years: YearCounts,
    pub radar: RadarCounts,
    pub bubble: BubblePlot,
}

/// Outcome of one fetch-aggregate cycle. The batch is kept alongside the
/// data so a modality-filter change can re-aggregate the year chart without
/// touching the network.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub batch: SeriesBatch,
    pub data: DashboardData,
}

#[derive(Clone)]
pub struct App<C: NbiaClient> {
    client: C,
    labels: Labels,
}

impl<C: NbiaClient> App<C> {
    pub fn new(client: C, labels: Labels) -> Self {
        Self { client, labels }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn load_catalog(&self, sink: &dyn ProgressSink) -> Result<Vec<Collection>, DashError> {
        sink.event(ProgressEvent {
            message: "fetching collection catalog".to_string(),
            elapsed: None,
        });
        let started = Instant::now();
        let catalog = load_catalog(&self.client, &self.labels)?;
        sink.event(ProgressEvent {
            message: format!("catalog loaded: {} collections", catalog.len()),
            elapsed: Some(started.elapsed()),
        });
        Ok(catalog)
    }

    /// One full cycle: parallel per-collection series fetch, then all four
    /// aggregations. An empty selection yields empty charts without any
    /// network traffic.
    pub fn refresh(
        &self,
        collections: &[CollectionId],
        modality_filter: Option<&str>,
        sink: &dyn ProgressSink,
    ) -> Result<RefreshResult, DashError> {
        sink.event(ProgressEvent {
            message: format!("fetching series for {} collections", collections.len()),
            elapsed: None,
        });
        let started = Instant::now();
        let batch = fetch_series_set(&self.client, collections)?;
        let total: usize = batch.iter().map(|(_, records)| records.len()).sum();
        sink.event(ProgressEvent {
            message: format!("fetched {total} series records"),
            elapsed: Some(started.elapsed()),
        });

        let data = aggregate_all(&batch, modality_filter);
        Ok(RefreshResult { batch, data })
    }
}

/// Pure reduction from a fetched batch to chart data; also used when only
/// the modality filter changed.
pub fn aggregate_all(batch: &SeriesBatch, modality_filter: Option<&str>) -> DashboardData {
    DashboardData {
        modality: modality_counts(batch),
        years: year_counts(batch, modality_filter),
        radar: radar_counts(batch),
        bubble: bubble_plot(batch),
    }
}
