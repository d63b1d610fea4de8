//! SVG chart rendering

use crate::error::{PipelineError, Result};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;

const SIZE: (u32, u32) = (800, 600);

fn chart_err(e: impl Display) -> PipelineError {
    PipelineError::Diagnostics(e.to_string())
}

/// Pad a degenerate range so plotters gets a non-empty axis
fn axis_range(min: f64, max: f64) -> std::ops::Range<f64> {
    if !(min.is_finite() && max.is_finite()) {
        return 0.0..1.0;
    }
    if (max - min).abs() < 1e-12 {
        (min - 0.5)..(max + 0.5)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Equal-width histogram
pub fn histogram(path: &Path, title: &str, x_label: &str, values: &[f64], bins: usize) -> Result<()> {
    let bins = bins.max(1);
    let (lo, hi) = min_max(values);
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(axis_range(lo, lo + width * bins as f64), 0.0..max_count as f64 * 1.05)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Count")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &c)| {
            let x0 = lo + i as f64 * width;
            Rectangle::new([(x0, 0.0), (x0 + width, c as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Predicted against true values with the identity line
pub fn scatter_with_identity(path: &Path, title: &str, y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    let (lo_t, hi_t) = min_max(y_true);
    let (lo_p, hi_p) = min_max(y_pred);
    let range = axis_range(lo_t.min(lo_p), hi_t.max(hi_p));

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(range.clone(), range.clone())
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("True")
        .y_desc("Predicted")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            y_true
                .iter()
                .zip(y_pred)
                .map(|(&t, &p)| Circle::new((t, p), 3, BLUE.mix(0.5).filled())),
        )
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(vec![(range.start, range.start), (range.end, range.end)], &RED))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Horizontal bars, one per label, first label on top
pub fn bar_chart(path: &Path, title: &str, value_label: &str, labels: &[String], values: &[f64]) -> Result<()> {
    let n = labels.len().min(values.len());
    let max = values.iter().copied().fold(0.0f64, f64::max);
    let max = if max > 0.0 { max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(160)
        .build_cartesian_2d(0.0..max, (0..n as i32).into_segmented())
        .map_err(chart_err)?;

    let label_at = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) if (*i as usize) < n => labels[n - 1 - *i as usize].clone(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(value_label)
        .y_labels(n.max(1))
        .y_label_formatter(&label_at)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(values.iter().take(n).enumerate().map(|(i, &v)| {
            let row = (n - 1 - i) as i32;
            Rectangle::new(
                [(0.0, SegmentValue::Exact(row)), (v, SegmentValue::Exact(row + 1))],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
