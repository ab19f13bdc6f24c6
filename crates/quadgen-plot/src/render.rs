//! Renders one question record to a PNG: the sampled parabola plus the
//! stated vertex, intercepts and axis of symmetry.
//!
//! The key features are annotation ground truth supplied independently
//! of the equation; a vertex that disagrees with the equation is logged
//! and trusted, not rejected (the `check` command surfaces mismatches).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::warn;

use quadgen_core::{
    plot_half_width, sample_curve, verify_vertex, Equation, KeyPoints, QuestionRecord,
    DEFAULT_SAMPLES,
};

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub samples: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples: DEFAULT_SAMPLES,
        }
    }
}

/// Render the graph for one question. `index` is 1-based and determines
/// the output file name (`graph_question_{index}.png`).
pub fn render_question(
    record: &QuestionRecord,
    index: usize,
    out_dir: &Path,
    options: &PlotOptions,
) -> Result<PathBuf> {
    let points = KeyPoints::from_features(&record.key_features)?;
    let equation = Equation::parse(&record.equation)?;

    if let Err(e) = verify_vertex(&equation, &points) {
        warn!("question {index}: {e}");
    }

    let half_width = plot_half_width(points.vertex.0, &points.x_intercepts);
    let curve = sample_curve(&equation, points.vertex.0, half_width, options.samples)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("graph_question_{index}.png"));

    draw_chart(&path, record, index, &points, &curve, options)
        .with_context(|| format!("rendering {}", path.display()))?;

    Ok(path)
}

fn draw_chart(
    path: &Path,
    record: &QuestionRecord,
    index: usize,
    points: &KeyPoints,
    curve: &[(f64, f64)],
    options: &PlotOptions,
) -> Result<()> {
    let (x_range, y_range) = view_ranges(points, curve);

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!("Q{index}: {}", record.question_choice);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()?;

    // Coordinate axes.
    if y_range.contains(&0.0) {
        chart.draw_series(LineSeries::new(
            [(x_range.start, 0.0), (x_range.end, 0.0)],
            BLACK.stroke_width(1),
        ))?;
    }
    if x_range.contains(&0.0) {
        chart.draw_series(LineSeries::new(
            [(0.0, y_range.start), (0.0, y_range.end)],
            BLACK.stroke_width(1),
        ))?;
    }

    // The parabola itself.
    chart
        .draw_series(LineSeries::new(
            curve.iter().copied(),
            BLUE.stroke_width(2),
        ))?
        .label(record.equation.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    // Axis of symmetry, dashed vertical line.
    chart
        .draw_series(DashedLineSeries::new(
            [
                (points.axis_of_symmetry, y_range.start),
                (points.axis_of_symmetry, y_range.end),
            ],
            4,
            4,
            RGBColor(128, 128, 128).into(),
        ))?
        .label("Axis of Symmetry")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(128, 128, 128))
        });

    chart
        .draw_series(std::iter::once(Circle::new(points.vertex, 5, RED.filled())))?
        .label("Vertex")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));

    chart
        .draw_series(std::iter::once(Circle::new(
            (0.0, points.y_intercept),
            5,
            GREEN.filled(),
        )))?
        .label("Y-Intercept")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, GREEN.filled()));

    if !points.x_intercepts.is_empty() {
        chart
            .draw_series(
                points
                    .x_intercepts
                    .iter()
                    .map(|&xi| Cross::new((xi, 0.0), 5, BLUE.stroke_width(2))),
            )?
            .label("X-Intercept")
            .legend(|(x, y)| Cross::new((x + 10, y), 4, BLUE.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// View ranges covering the sampled curve and every annotated point,
/// with a 10% margin on y.
fn view_ranges(
    points: &KeyPoints,
    curve: &[(f64, f64)],
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for &(x, y) in curve {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    // Annotated points must be visible: vertex, y-intercept at x = 0,
    // x-intercepts on the y = 0 line.
    for &x in std::iter::once(&points.vertex.0)
        .chain(points.x_intercepts.iter())
        .chain(std::iter::once(&0.0))
    {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
    }
    for &y in [points.vertex.1, points.y_intercept, 0.0].iter() {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let y_margin = 0.1 * (y_max - y_min).max(1.0);
    let x_margin = 0.02 * (x_max - x_min).max(1.0);
    (
        (x_min - x_margin)..(x_max + x_margin),
        (y_min - y_margin)..(y_max + y_margin),
    )
}
