//! Chart drawing with plotters. Every chart is drawn into an in-memory SVG.

use crate::Result;
use crate::model::history::Segment;
use crate::model::{HistoryKind, HistoryView, LevelsView, Report, ScalingView, SetupTimersView, Style};
use crate::render::palette;
use plotters::coord::Shift;
use plotters::prelude::*;

const LABEL_FONT: (&str, i32) = ("sans-serif", 14);
const DESC_FONT: (&str, i32) = ("sans-serif", 17);

/// Draw `report` as an SVG document of the given pixel size.
pub fn render_svg(report: &Report, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        match report {
            Report::SetupTimers(v) => draw_setup_timers(&root, v)?,
            Report::StrongScaling(v) if v.style == Style::Scaling => draw_scaling(&root, v)?,
            Report::StrongScaling(v) => draw_stack(&root, v)?,
            Report::SolvePerLevel(v) => draw_levels(&root, v)?,
            Report::History(v) if v.kind == HistoryKind::Residual => draw_residuals(&root, v)?,
            Report::History(v) => draw_scalar_history(&root, v)?,
        }

        root.present()?;
    }
    Ok(svg)
}

/// Label for an integer position of a categorical axis; blank elsewhere.
fn index_label(labels: &[String], pos: f64) -> String {
    let k = pos.round();
    if (pos - k).abs() > 1e-6 || k < 0.0 {
        return String::new();
    }
    labels.get(k as usize).cloned().unwrap_or_default()
}

/// Room for the longest label at the tick font size.
fn label_area(labels: &[String]) -> u32 {
    let chars = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    (chars * 7 + 10).clamp(50, 600)
}

fn upper(max: f64, pad: f64) -> f64 {
    if max.is_finite() && max > 0.0 { max * pad } else { 1.0 }
}

fn draw_setup_timers<DB>(root: &DrawingArea<DB, Shift>, v: &SetupTimersView) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = v.timers.len().max(1);
    let x_max = upper(v.max_times.iter().flatten().copied().fold(0.0, f64::max), 1.05);

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(label_area(&v.timers))
        .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(2 * n + 1)
        .y_label_formatter(&|y: &f64| index_label(&v.timers, *y))
        .label_style(LABEL_FONT)
        .axis_desc_style(DESC_FONT)
        .x_desc("Time (s)")
        .draw()?;

    let comparison = v.is_comparison();
    for (run, column) in v.max_times.iter().enumerate() {
        let color = palette(run);
        // Side by side when comparing, otherwise one thick bar.
        let (lo, hi) = match (comparison, run) {
            (false, _) => (-0.4, 0.4),
            (true, 0) => (0.0, 0.4),
            (true, _) => (-0.4, 0.0),
        };
        let series = chart.draw_series(column.iter().enumerate().map(move |(k, &t)| {
            let y = k as f64;
            Rectangle::new([(0.0, y + lo), (t, y + hi)], color.filled())
        }))?;
        if comparison {
            series
                .label(v.sources[run].as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        }
    }

    if comparison {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

/// Process-count axis spanning every run, whatever the input order; a single
/// run still gets a non-empty range.
fn process_range(processes: &[f64]) -> (f64, f64) {
    let lo = processes.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = processes.iter().copied().fold(0.0, f64::max);
    let lo = if lo.is_finite() { lo.max(1.0) } else { 1.0 };
    if hi > lo { (lo, hi) } else { (lo * 0.5, lo * 2.0) }
}

fn draw_stack<DB>(root: &DrawingArea<DB, Shift>, v: &ScalingView) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let nruns = v.processes.len();

    // cumulative[k][j]: top of layer k at run j.
    let mut cumulative: Vec<Vec<f64>> = Vec::with_capacity(v.values.len());
    for row in &v.values {
        let below = cumulative.last().cloned().unwrap_or_else(|| vec![0.0; nruns]);
        cumulative.push(row.iter().zip(&below).map(|(x, b)| x + b).collect());
    }

    let y_max = match v.style {
        Style::StackPercent => 100.0,
        _ => upper(
            cumulative
                .last()
                .map(|top| top.iter().copied().fold(0.0, f64::max))
                .unwrap_or(0.0),
            1.05,
        ),
    };
    let (x_lo, x_hi) = process_range(&v.processes);

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(nruns.max(2))
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .y_label_formatter(&|y: &f64| match v.style {
            Style::StackPercent => format!("{:.0}%", y),
            _ => format!("{}", y),
        })
        .label_style(LABEL_FONT)
        .axis_desc_style(DESC_FONT)
        .x_desc("Number of cores")
        .y_desc(match v.style {
            Style::StackPercent => "Share of setup time",
            _ => "Time (seconds)",
        })
        .draw()?;

    // Top layer first, so lower layers are painted over it.
    for k in (0..cumulative.len()).rev() {
        let color = palette(k);
        chart
            .draw_series(
                AreaSeries::new(
                    v.processes.iter().copied().zip(cumulative[k].iter().copied()),
                    0.0,
                    color.filled(),
                )
                .border_style(BLACK.stroke_width(1)),
            )?
            .label(v.labels[k].as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_scaling<DB>(root: &DrawingArea<DB, Shift>, v: &ScalingView) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_lo, x_hi) = process_range(&v.processes);
    let ideal = v.ideal_speedup();
    let y_max = v
        .values
        .iter()
        .flatten()
        .copied()
        .filter(|s| s.is_finite())
        .fold(ideal, f64::max)
        * 1.1;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), 0.5..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(v.processes.len().max(2))
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .label_style(LABEL_FONT)
        .axis_desc_style(DESC_FONT)
        .x_desc("Number of cores")
        .y_desc("Scaling")
        .draw()?;

    for (k, row) in v.values.iter().enumerate() {
        let color = palette(k);
        let width = v.line_widths.get(k).copied().unwrap_or(2);
        chart
            .draw_series(LineSeries::new(
                v.processes
                    .iter()
                    .copied()
                    .zip(row.iter().copied())
                    .filter(|(_, s)| s.is_finite()),
                color.stroke_width(width),
            ))?
            .label(v.labels[k].as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
    }

    let (p0, pn) = match (v.processes.first(), v.processes.last()) {
        (Some(&p0), Some(&pn)) => (p0, pn),
        _ => (x_lo, x_hi),
    };
    chart
        .draw_series(LineSeries::new(
            vec![(p0, 1.0), (pn, ideal)],
            BLACK.stroke_width(1),
        ))?
        .label("ideal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(1)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_levels<DB>(root: &DrawingArea<DB, Shift>, v: &LevelsView) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let nlevels = v.levels.len().max(1);
    let y_max = upper(
        v.levels
            .iter()
            .map(|l| l.times.iter().sum::<f64>())
            .fold(0.0, f64::max),
        1.1,
    );

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-1.0..nlevels as f64, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(nlevels + 2)
        .x_label_formatter(&|x: &f64| {
            let k = x.round();
            if (x - k).abs() < 1e-6 && k >= 0.0 && (k as usize) < v.levels.len() {
                format!("{}", k as usize)
            } else {
                String::new()
            }
        })
        .label_style(LABEL_FONT)
        .axis_desc_style(DESC_FONT)
        .x_desc("Level")
        .y_desc("Time (s)")
        .draw()?;

    for (c, category) in v.categories.iter().enumerate() {
        let color = palette(c);
        let bars: Vec<[(f64, f64); 2]> = v
            .levels
            .iter()
            .map(|l| {
                let x = l.level as f64;
                let bottom: f64 = l.times[..c].iter().sum();
                [(x - 0.4, bottom), (x + 0.4, bottom + l.times[c])]
            })
            .collect();

        chart
            .draw_series(bars.iter().map(|&r| Rectangle::new(r, color.filled())))?
            .label(category.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        chart.draw_series(bars.iter().map(|&r| Rectangle::new(r, BLACK.stroke_width(1))))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_scalar_history<DB>(root: &DrawingArea<DB, Shift>, v: &HistoryView) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (values, ticks) = v.flatten();
    let mx = values.iter().copied().fold(0.0, f64::max);
    let (y_max, y_desc) = match v.kind {
        HistoryKind::Iterations => (mx + 1.0, "Number of linear iterations"),
        _ => (upper(mx, 1.05), "Solve time (s)"),
    };

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-1.0..ticks.len() as f64, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_labels(ticks.len() + 2)
        .x_label_formatter(&|x: &f64| index_label(&ticks, *x))
        .label_style(LABEL_FONT)
        .axis_desc_style(DESC_FONT)
        .x_desc("Nonlinear iterations index")
        .y_desc(y_desc)
        .draw()?;

    for Segment { color, points } in v.segments() {
        let color = palette(color);
        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
    }
    Ok(())
}

fn draw_residuals<DB>(root: &DrawingArea<DB, Shift>, v: &HistoryView) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (values, _) = v.flatten();
    let positive = values.iter().copied().filter(|r| *r > 0.0 && r.is_finite());
    let (lo, hi) = positive.fold((f64::INFINITY, 0.0f64), |(lo, hi), r| (lo.min(r), hi.max(r)));
    let (lo, hi) = if lo.is_finite() { (lo * 0.5, hi * 2.0) } else { (1e-10, 1.0) };

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..(values.len() + 1) as f64, (lo..hi).log_scale())?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .y_label_formatter(&|y: &f64| format!("{:.0e}", y))
        .label_style(LABEL_FONT)
        .axis_desc_style(DESC_FONT)
        .x_desc("Linear iterations index (cumulative)")
        .y_desc("Relative residual")
        .draw()?;

    for Segment { color, points } in v.segments() {
        let color = palette(color);
        let points: Vec<(f64, f64)> = points.into_iter().filter(|(_, r)| *r > 0.0).collect();
        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(1)))?;
        chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, 3, color.filled())))?;
    }
    Ok(())
}
