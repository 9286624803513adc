//! Chart-ready views over a [`Dataset`].
//!
//! A `ChartView` is what the rendering side consumes: two stacked panels
//! (cumulative on a log scale, daily on a linear scale) with one series per
//! entity and an optional vertical event marker on each.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::EventDate;
use crate::process::{daily_deltas, Dataset};

/// Daily growth rate of the cumulative reference curve.
pub const REFERENCE_GROWTH: f64 = 1.33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub metric: String,
    pub date: NaiveDate,
    pub cutoff: f64,
    pub x_label: String,
    pub cumulative: Panel,
    pub daily: Panel,
    /// Legend entries for the event markers, e.g. `"France - lockdown"`.
    pub event_legend: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub y_scale: AxisScale,
    pub series: Vec<SeriesView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub entity: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Last value, shown in the legend. `None` for an empty series.
    pub last: Option<f64>,
    /// Event marker position on the x axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_x: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceCurve {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// `cutoff * growth^x` sampled at `0..len`.
pub fn growth_reference(cutoff: f64, growth: f64, len: usize) -> ReferenceCurve {
    let x: Vec<f64> = (0..len).map(|i| i as f64).collect();
    let y = x.iter().map(|&xi| cutoff * growth.powf(xi)).collect();
    ReferenceCurve {
        label: format!("{:.0}% daily growth", (growth - 1.0) * 100.0),
        x,
        y,
    }
}

impl ChartView {
    /// Build both panels for `entities`, in that order. Entities missing from
    /// the dataset are left out.
    pub fn build(
        dataset: &Dataset,
        metric: &str,
        cutoff: f64,
        entities: &[String],
        events: &BTreeMap<String, EventDate>,
        event_label: &str,
    ) -> Self {
        let date = dataset.date.format("%Y-%m-%d");
        let mut cumulative = Vec::with_capacity(entities.len());
        let mut daily = Vec::with_capacity(entities.len());
        let mut event_legend = Vec::new();

        for name in entities {
            let Some(ys) = dataset.series(name) else {
                continue;
            };
            let x: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
            let event = events.get(name);
            let event_x = event.and_then(|ev| dataset.project_event(name, ev.0));
            if let (Some(ev), Some(_)) = (event, event_x) {
                event_legend.push((*ev, format!("{} - {}", name, event_label)));
            }

            let deltas = daily_deltas(ys);
            cumulative.push(SeriesView {
                entity: name.clone(),
                x: x.clone(),
                y: ys.to_vec(),
                last: ys.last().copied(),
                event_x,
            });
            daily.push(SeriesView {
                entity: name.clone(),
                x,
                last: deltas.last().copied(),
                y: deltas,
                event_x,
            });
        }

        // chronological, ties keep entity order
        event_legend.sort_by_key(|(at, _)| *at);

        let longest = cumulative.iter().map(|s| s.x.len()).max().unwrap_or(0);
        Self {
            metric: metric.to_string(),
            date: dataset.date,
            cutoff,
            x_label: format!("Days from first {} confirmed cases", cutoff as i64),
            cumulative: Panel {
                title: format!("CoVid-19 - {} (cumulative) - {}", metric, date),
                y_scale: AxisScale::Log,
                series: cumulative,
                reference: Some(growth_reference(cutoff, REFERENCE_GROWTH, longest)),
            },
            daily: Panel {
                title: format!("CoVid-19 - {} (daily) - {}", metric, date),
                y_scale: AxisScale::Linear,
                series: daily,
                reference: None,
            },
            event_legend: event_legend.into_iter().map(|(_, label)| label).collect(),
        }
    }
}
