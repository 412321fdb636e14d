// ============================================================
// Layer 6 — Training Plot
// ============================================================
// Draws the two learning curves side by side:
//
//   ┌────────────────────┬────────────────────┐
//   │ Training Loss      │ Test Accuracy      │
//   │ per Epoch          │ per Epoch          │
//   │  loss vs epoch     │  % vs epoch        │
//   └────────────────────┴────────────────────┘
//
// Uses the plotters SVG backend, which needs no system font
// libraries at build or run time.
//
// Reference: plotters crate documentation

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::{ArtifactSink, RunRecord};

const SIZE: (u32, u32) = (1000, 500);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

pub struct PlotWriter {
    path: PathBuf,
}

impl PlotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSink for PlotWriter {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, run: &RunRecord) -> Result<PathBuf> {
        draw(&self.path, run.metrics.train_losses(), run.metrics.test_accuracies())
            .map_err(|e| PipelineError::io(format!("cannot draw '{}': {e}", self.path.display())))?;
        println!("Training metrics plot saved to {}", self.path.display());
        Ok(self.path.clone())
    }
}

fn draw(
    path:       &Path,
    losses:     &[f64],
    accuracies: &[f64],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(500);

    let max_loss = losses.iter().copied().fold(0.0_f64, f64::max).max(1e-3) * 1.1;
    panel(&left, "Training Loss per Epoch", "Loss", "Training Loss", losses, 0.0..max_loss, BLUE)?;
    panel(&right, "Test Accuracy per Epoch", "Accuracy (%)", "Test Accuracy", accuracies, 0.0..105.0, ORANGE)?;

    root.present()?;
    Ok(())
}

/// One line-with-markers chart of `values` against epoch 1..=n.
fn panel<DB: DrawingBackend>(
    area:    &DrawingArea<DB, plotters::coord::Shift>,
    title:   &str,
    y_desc:  &str,
    label:   &str,
    values:  &[f64],
    y_range: std::ops::Range<f64>,
    color:   RGBColor,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let x_max = values.len().max(1) as f64 + 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(0.5..x_max, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc(y_desc)
        .draw()?;

    let points = values.iter().enumerate().map(|(i, &v)| (i as f64 + 1.0, v));
    chart
        .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(3))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::MetricsSeries;

    #[test]
    fn test_writes_svg_with_both_panels() {
        let dir = std::env::temp_dir().join(format!("iris_plot_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut metrics = MetricsSeries::new();
        metrics.record(1.05, 60.0);
        metrics.record(0.52, 90.0);
        let run = RunRecord {
            epochs:        2,
            batch_size:    16,
            learning_rate: 0.01,
            metrics,
            class_names:   vec!["a".into(), "b".into()],
            model_path:    dir.join("model.mpk"),
        };

        let writer = PlotWriter::new(dir.join("training_metrics.svg"));
        let path = writer.write(&run).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Training Loss per Epoch"));
        assert!(svg.contains("Test Accuracy per Epoch"));
    }
}
