use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

/// Index of the first maximum; a later value only wins if strictly greater.
pub fn argmax<T: PartialOrd>(values: impl IntoIterator<Item = T>) -> usize {
    let mut result: usize = 0;
    let mut best: Option<T> = None;
    for (i, v) in values.into_iter().enumerate() {
        let better = match &best {
            Some(b) => v > *b,
            None => true,
        };
        if better {
            best = Some(v);
            result = i;
        }
    }
    result
}

/// Largest value, or negative infinity for an empty input.
pub fn max(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .fold(f64::NEG_INFINITY, |acc, v| if v > acc { v } else { acc })
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window = window.max(1);
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = if aux + window < vector.len() {
            aux + window
        } else {
            vector.len()
        };
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / slice.len() as f64);
        aux = end;
    }
    result
}

/// Draws one line per series into `<dir>/<title>.png`.
pub fn plot_moving_average(
    values: &[Vec<f64>],
    colors: &[RGBColor],
    legends: &[&str],
    title: &str,
    dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let file_name = dir.join(format!("{}.png", title.replace(' ', "_")));
    let root = BitMapBackend::new(&file_name, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_len = values.iter().map(|v| v.len()).max().unwrap_or(0).max(2);
    let mut min_y = values
        .iter()
        .flatten()
        .fold(f64::INFINITY, |acc, v| acc.min(*v));
    let mut max_y = values
        .iter()
        .flatten()
        .fold(f64::NEG_INFINITY, |acc, v| acc.max(*v));
    if !min_y.is_finite() || !max_y.is_finite() {
        min_y = 0.0;
        max_y = 1.0;
    }
    if (max_y - min_y).abs() < f64::EPSILON {
        min_y -= 1.0;
        max_y += 1.0;
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(max_len - 1) as f64, min_y..max_y)?;
    chart.configure_mesh().draw()?;

    for ((series, color), legend) in values.iter().zip(colors.iter()).zip(legends.iter()) {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                series.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                color.stroke_width(2),
            ))?
            .label(*legend)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
