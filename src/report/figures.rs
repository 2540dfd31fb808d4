//! Figure rendering
//!
//! Five summary figures, each rendered into an RGB buffer with `plotters`
//! and encoded to PNG and TIFF. Figures are independent: the caller
//! catches the error of one figure and still renders the rest.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::algorithm::regression::OddsRatioRow;
use crate::algorithm::statistics::CategoryRate;
use crate::error::{Result, StudyError};
use crate::utils::log_output_written;

/// Candidate font files, first readable one wins
const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
];

/// Register a system font under the family name the figures use
///
/// The bitmap backend carries no font of its own. When no candidate is
/// readable the figures fail individually at render time and the run
/// continues without them.
pub fn register_figure_font() -> bool {
    for path in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(path) {
            let leaked: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font("sans-serif", FontStyle::Normal, leaked).is_ok() {
                log::debug!("figure font registered from {path}");
                return true;
            }
        }
    }
    log::warn!("no usable system font found; figures may be skipped");
    false
}

fn fig_err<E: std::fmt::Display>(error: E) -> StudyError {
    StudyError::Figure(error.to_string())
}

/// Encode one rendered RGB buffer as PNG and TIFF next to each other
fn save_raster(buffer: &[u8], size: (u32, u32), base: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);
    for (ext, format) in [
        ("png", image::ImageFormat::Png),
        ("tiff", image::ImageFormat::Tiff),
    ] {
        let path = base.with_extension(ext);
        image::save_buffer_with_format(
            &path,
            buffer,
            size.0,
            size.1,
            image::ExtendedColorType::Rgb8,
            format,
        )
        .map_err(fig_err)?;
        log_output_written("figure", &path);
        written.push(path);
    }
    Ok(written)
}

/// Boxplot of the cohort age distribution
pub fn age_boxplot(ages: &[f64], dir: &Path, size: (u32, u32)) -> Result<()> {
    if ages.is_empty() {
        return Err(StudyError::Figure("no age values to plot".to_string()));
    }
    let quartiles = Quartiles::new(ages);
    let y_min = ages.iter().copied().fold(f64::INFINITY, f64::min) - 5.0;
    let y_max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 5.0;
    let labels: &[&str] = &["Age (years)"];

    let mut buffer = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(fig_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("Age distribution of the cohort", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(labels.into_segmented(), (y_min as f32)..(y_max as f32))
            .map_err(fig_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Years")
            .draw()
            .map_err(fig_err)?;
        chart
            .draw_series(vec![Boxplot::new_vertical(
                SegmentValue::CenterOf(&labels[0]),
                &quartiles,
            )])
            .map_err(fig_err)?;
        root.present().map_err(fig_err)?;
    }
    save_raster(&buffer, size, &dir.join("age_boxplot"))?;
    Ok(())
}

/// Bar chart of admission counts per procedure category
pub fn category_counts_bar(
    counts: &[(crate::algorithm::procedures::ProcedureCategory, usize)],
    dir: &Path,
    size: (u32, u32),
) -> Result<()> {
    if counts.is_empty() {
        return Err(StudyError::Figure("no categories to plot".to_string()));
    }
    let names: Vec<&str> = counts.iter().map(|(c, _)| c.display_name()).collect();
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0) as f64;

    let mut buffer = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(fig_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("Admissions per procedure group", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d((0..counts.len()).into_segmented(), 0.0..max * 1.15)
            .map_err(fig_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    names.get(*i).copied().unwrap_or_default().to_string()
                }
                SegmentValue::Last => String::new(),
            })
            .x_labels(counts.len())
            .y_desc("Admissions")
            .draw()
            .map_err(fig_err)?;
        chart
            .draw_series(counts.iter().enumerate().map(|(i, (_, n))| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), *n as f64),
                    ],
                    BLUE.mix(0.6).filled(),
                )
            }))
            .map_err(fig_err)?;
        root.present().map_err(fig_err)?;
    }
    save_raster(&buffer, size, &dir.join("procedure_counts"))?;
    Ok(())
}

/// Bar chart of per-category readmission rates with percentage labels
pub fn readmission_rates_bar(rates: &[CategoryRate], dir: &Path, size: (u32, u32)) -> Result<()> {
    if rates.is_empty() {
        return Err(StudyError::Figure("no rates to plot".to_string()));
    }
    let max = rates
        .iter()
        .map(|r| r.rate_percent)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let mut buffer = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(fig_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("30-day readmission rate by procedure group", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d((0..rates.len()).into_segmented(), 0.0..max * 1.2)
            .map_err(fig_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => rates
                    .get(*i)
                    .map(|r| r.category.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .x_labels(rates.len())
            .y_desc("Readmission rate (%)")
            .draw()
            .map_err(fig_err)?;
        chart
            .draw_series(rates.iter().enumerate().map(|(i, r)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), r.rate_percent),
                    ],
                    RED.mix(0.5).filled(),
                )
            }))
            .map_err(fig_err)?;
        chart
            .draw_series(rates.iter().enumerate().map(|(i, r)| {
                Text::new(
                    format!("{:.1}%", r.rate_percent),
                    (SegmentValue::CenterOf(i), r.rate_percent + max * 0.04),
                    ("sans-serif", 16),
                )
            }))
            .map_err(fig_err)?;
        root.present().map_err(fig_err)?;
    }
    save_raster(&buffer, size, &dir.join("readmission_rates"))?;
    Ok(())
}

/// Forest plot of odds ratios on a log-scaled axis
///
/// Error bars span the confidence interval; the vertical line marks the
/// null effect at OR = 1.
pub fn odds_ratio_forest(rows: &[OddsRatioRow], dir: &Path, size: (u32, u32)) -> Result<()> {
    if rows.is_empty() {
        return Err(StudyError::Figure("no odds ratios to plot".to_string()));
    }
    let x_min = rows
        .iter()
        .map(|r| r.ci_lower)
        .fold(f64::INFINITY, f64::min)
        .min(1.0)
        .max(1e-3)
        * 0.8;
    let x_max = rows
        .iter()
        .map(|r| r.ci_upper)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0)
        * 1.25;

    let mut buffer = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(fig_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("Adjusted odds ratios for 30-day readmission", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(220)
            .build_cartesian_2d((x_min..x_max).log_scale(), (0..rows.len()).into_segmented())
            .map_err(fig_err)?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    rows.get(*i).map(|r| r.term.clone()).unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .y_labels(rows.len())
            .x_desc("Odds ratio (log scale)")
            .draw()
            .map_err(fig_err)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (1.0, SegmentValue::Exact(0)),
                    (1.0, SegmentValue::Exact(rows.len())),
                ],
                BLACK.stroke_width(1),
            )))
            .map_err(fig_err)?;
        chart
            .draw_series(rows.iter().enumerate().map(|(i, r)| {
                ErrorBar::new_horizontal(
                    SegmentValue::CenterOf(i),
                    r.ci_lower,
                    r.odds_ratio,
                    r.ci_upper,
                    BLUE.filled(),
                    10,
                )
            }))
            .map_err(fig_err)?;
        root.present().map_err(fig_err)?;
    }
    save_raster(&buffer, size, &dir.join("odds_ratios_forest"))?;
    Ok(())
}

/// ROC curve of the fitted model with the AUC in the caption
pub fn roc_curve_figure(
    points: &[(f64, f64)],
    auc: f64,
    dir: &Path,
    size: (u32, u32),
) -> Result<()> {
    if points.len() < 2 {
        return Err(StudyError::Figure("too few ROC points to plot".to_string()));
    }

    let mut buffer = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(fig_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(format!("ROC curve (AUC = {auc:.3})"), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, 0.0..1.0)
            .map_err(fig_err)?;
        chart
            .configure_mesh()
            .x_desc("False positive rate")
            .y_desc("True positive rate")
            .draw()
            .map_err(fig_err)?;
        chart
            .draw_series(LineSeries::new(
                vec![(0.0, 0.0), (1.0, 1.0)],
                BLACK.mix(0.4).stroke_width(1),
            ))
            .map_err(fig_err)?;
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                BLUE.stroke_width(2),
            ))
            .map_err(fig_err)?;
        root.present().map_err(fig_err)?;
    }
    save_raster(&buffer, size, &dir.join("roc_curve"))?;
    Ok(())
}
