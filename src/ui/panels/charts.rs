// StashScope - ui/panels/charts.rs
//
// Charts tab. Shows the four live charts held by `app::charts::ChartSet`
// with egui_plot: stacked bars for the timeline and hourly activity,
// horizontal bars for action frequency and a pie for accounts.

use crate::app::charts::ChartKind;
use crate::app::state::AppState;
use crate::core::model::ChartData;
use crate::core::raster::slot_label;
use crate::ui::theme;
use egui::Stroke;
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, Polygon};
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

/// Largest arc drawn as one convex polygon when building pie slices.
const MAX_FAN_ANGLE: f64 = TAU / 16.0;

/// Points along the rim of each pie fan.
const FAN_RIM_POINTS: usize = 4;

/// Smallest height of the horizontal bar chart.
const MIN_HORIZONTAL_HEIGHT: f32 = 120.0;

/// Render the charts panel (central area, Charts tab).
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    if state.charts.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No charts yet.\nOpen a CSV file via File \u{2192} Open CSV.");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for &kind in ChartKind::all() {
                let Some(chart) = state.charts.get(kind) else {
                    continue;
                };
                ui.heading(kind.title());
                if chart.is_empty() {
                    ui.label(egui::RichText::new("No records match the current filters.").weak());
                } else {
                    match kind {
                        ChartKind::Timeline | ChartKind::Hourly => stacked_bars(ui, kind, chart),
                        ChartKind::Actions => horizontal_bars(ui, kind, chart),
                        ChartKind::Accounts => pie(ui, kind, chart),
                    }
                }
                ui.add_space(12.0);
                ui.separator();
            }
        });
}

/// Charts sit inside a scroll area, so they do not react to drag or wheel.
fn fixed(plot: Plot) -> Plot {
    plot.allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// =============================================================================
// Stacked vertical bars
// =============================================================================

fn stacked_bars(ui: &mut egui::Ui, kind: ChartKind, chart: &ChartData) {
    let mut layers: Vec<BarChart> = Vec::with_capacity(chart.series.len());
    for (series_idx, series) in chart.series.iter().enumerate() {
        let bars = chart
            .labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let value = series.values.get(idx).copied().unwrap_or(0);
                Bar::new(idx as f64, value as f64)
                    .name(label)
                    .width(theme::BAR_WIDTH)
            })
            .collect();
        let below: Vec<&BarChart> = layers.iter().collect();
        let layer = BarChart::new(bars)
            .name(&series.name)
            .color(theme::series_colour(series_idx))
            .stack_on(&below);
        layers.push(layer);
    }

    let labels = chart.labels.clone();
    fixed(Plot::new(kind.title()))
        .height(theme::CHART_HEIGHT)
        .legend(Legend::default())
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            slot_label(&labels, mark.value)
        })
        .show(ui, |plot_ui| {
            for layer in layers {
                plot_ui.bar_chart(layer);
            }
        });
}

// =============================================================================
// Horizontal bars
// =============================================================================

fn horizontal_bars(ui: &mut egui::Ui, kind: ChartKind, chart: &ChartData) {
    let Some(series) = chart.series.first() else {
        return;
    };

    // First-seen category on top.
    let top_down = top_down_labels(&chart.labels);
    let n = chart.labels.len();
    let bars = chart
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let value = series.values.get(idx).copied().unwrap_or(0);
            Bar::new((n - 1 - idx) as f64, value as f64)
                .name(label)
                .width(theme::BAR_WIDTH)
        })
        .collect();
    let bar_chart = BarChart::new(bars)
        .name(&series.name)
        .color(theme::series_colour(0))
        .horizontal();

    let height = ((theme::ROW_HEIGHT + 4.0) * n as f32).max(MIN_HORIZONTAL_HEIGHT);
    fixed(Plot::new(kind.title()))
        .height(height)
        .include_x(0.0)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            slot_label(&top_down, mark.value)
        })
        .show(ui, |plot_ui| plot_ui.bar_chart(bar_chart));
}

/// Labels indexed by bar position when the first label is drawn on top.
fn top_down_labels(labels: &[String]) -> Vec<String> {
    labels.iter().rev().cloned().collect()
}

// =============================================================================
// Pie
// =============================================================================

fn pie(ui: &mut egui::Ui, kind: ChartKind, chart: &ChartData) {
    let Some(series) = chart.series.first() else {
        return;
    };
    let total: u64 = series.values.iter().sum();
    if total == 0 {
        return;
    }

    let mut slices = Vec::new();
    let mut start = TAU / 4.0;
    for (idx, (label, &value)) in chart.labels.iter().zip(&series.values).enumerate() {
        if value == 0 {
            continue;
        }
        let sweep = value as f64 / total as f64 * TAU;
        let pct = value as f64 / total as f64 * 100.0;
        let name = format!("{label}: {value} ({pct:.1}%)");
        let colour = theme::series_colour(idx);
        for fan in slice_fans(start, sweep) {
            slices.push(
                Polygon::new(fan)
                    .name(&name)
                    .fill_color(colour)
                    .stroke(Stroke::new(0.0, colour)),
            );
        }
        start += sweep;
    }

    fixed(Plot::new(kind.title()))
        .height(theme::CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for slice in slices {
                plot_ui.polygon(slice);
            }
        });
}

/// One unit-circle pie slice as convex fans no wider than `MAX_FAN_ANGLE`.
/// Each fan starts at the centre.
fn slice_fans(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    // Tolerance keeps an exact multiple of MAX_FAN_ANGLE from gaining a sliver fan.
    let fans = (sweep / MAX_FAN_ANGLE - 1e-9).ceil().max(1.0) as usize;
    let step = sweep / fans as f64;
    (0..fans)
        .map(|i| {
            let a0 = start + step * i as f64;
            std::iter::once([0.0, 0.0])
                .chain((0..=FAN_RIM_POINTS).map(|k| {
                    let a = a0 + step * k as f64 / FAN_RIM_POINTS as f64;
                    [a.cos(), a.sin()]
                }))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_circle_splits_into_convex_fans() {
        let fans = slice_fans(0.0, TAU);
        assert_eq!(fans.len(), 16);
        assert!(fans.iter().all(|f| f[0] == [0.0, 0.0]));
        assert_eq!(fans[0].len(), FAN_RIM_POINTS + 2);
    }

    #[test]
    fn test_thin_slice_is_one_fan() {
        let fans = slice_fans(0.0, 0.01);
        assert_eq!(fans.len(), 1);
        let rim_end = fans[0].last().unwrap();
        assert!((rim_end[0] - 0.01f64.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_first_horizontal_label_sits_on_top() {
        let labels = vec!["added".to_string(), "removed".to_string(), "modified".to_string()];
        let top_down = top_down_labels(&labels);
        // Bar positions count up from the bottom; "added" has the highest.
        assert_eq!(slot_label(&top_down, 2.0), "added");
        assert_eq!(slot_label(&top_down, 0.0), "modified");
    }
}
