// Chart series derived from dashboard snapshots
use super::counts::ZoneReading;
use indexmap::IndexMap;
use rand::Rng;
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

pub const DEFAULT_WINDOW: usize = 20;
const BAR_DATASET_LABEL: &str = "Current Counts";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarDataset {
    pub label: String,
    pub data: Vec<i64>,
}

/// Current count per zone; replaced wholesale on every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub datasets: Vec<BarDataset>,
}

impl Default for BarChart {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            datasets: vec![BarDataset {
                label: BAR_DATASET_LABEL.to_string(),
                data: Vec::new(),
            }],
        }
    }
}

impl BarChart {
    pub fn replace(&mut self, labels: Vec<String>, counts: Vec<i64>) {
        self.labels = labels;
        self.datasets[0].data = counts;
    }

    pub fn counts(&self) -> &[i64] {
        &self.datasets[0].data
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub label: String,
    /// One slot per time label; `None` where the zone was not reported.
    pub data: VecDeque<Option<i64>>,
    pub border_color: String,
    pub fill: bool,
}

impl LineSeries {
    fn padded(label: String, border_color: String, gaps: usize) -> Self {
        Self {
            label,
            data: std::iter::repeat(None).take(gaps).collect(),
            border_color,
            fill: false,
        }
    }
}

/// Rolling time series of per-zone counts, keyed by zone label.
#[derive(Debug, Clone, Serialize)]
pub struct LineChart {
    #[serde(skip)]
    window: usize,
    labels: VecDeque<String>,
    #[serde(serialize_with = "series_in_order")]
    datasets: IndexMap<String, LineSeries>,
}

fn series_in_order<S: Serializer>(
    datasets: &IndexMap<String, LineSeries>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(datasets.values())
}

impl LineChart {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            labels: VecDeque::new(),
            datasets: IndexMap::new(),
        }
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn series(&self, label: &str) -> Option<&LineSeries> {
        self.datasets.get(label)
    }

    pub fn series_count(&self) -> usize {
        self.datasets.len()
    }

    /// Append one time point. The oldest point is evicted from the labels and
    /// every series first when the window is full.
    pub fn record(
        &mut self,
        time_label: String,
        readings: &[ZoneReading],
        mut pick_color: impl FnMut() -> String,
    ) {
        while self.labels.len() >= self.window {
            self.labels.pop_front();
            for series in self.datasets.values_mut() {
                series.data.pop_front();
            }
        }

        let earlier = self.labels.len();
        self.labels.push_back(time_label);
        let len = self.labels.len();

        for reading in readings {
            let series = self
                .datasets
                .entry(reading.label.clone())
                .or_insert_with(|| LineSeries::padded(reading.label.clone(), pick_color(), earlier));
            if series.data.len() == len {
                // Repeated label within one snapshot: last value wins.
                if let Some(slot) = series.data.back_mut() {
                    *slot = Some(reading.count);
                }
            } else {
                series.data.push_back(Some(reading.count));
            }
        }

        for series in self.datasets.values_mut() {
            while series.data.len() < len {
                series.data.push_back(None);
            }
        }

        self.datasets
            .retain(|_, series| series.data.iter().any(Option::is_some));
    }
}

/// Random `#rrggbb` display color.
pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
    format!("#{:06x}", value)
}
