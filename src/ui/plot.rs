use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points, VLine,
};

use crate::color::curve_color;
use crate::data::analysis::spectrum_slices;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectrum view (central panel)
// ---------------------------------------------------------------------------

/// Render intensity vs. wavelength at the requested times.
pub fn spectrum_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(data) => data,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a TA export to view spectra  (File → Open TA export…)");
            });
            return;
        }
    };

    let slices = spectrum_slices(dataset, &state.spectrum);
    let y_label = if state.spectrum.mod_units { "mOD" } else { "ΔT/T" };

    Plot::new("spectrum_plot")
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            // Zero-crossing reference line under the curves.
            plot_ui.hline(HLine::new(0.0).color(Color32::BLACK).width(0.5));

            for (i, slice) in slices.iter().enumerate() {
                let points: PlotPoints = slice
                    .wavelengths
                    .iter()
                    .zip(slice.intensities.iter())
                    .map(|(&x, &y)| [x, y])
                    .collect();

                let line = Line::new(points)
                    .name(&slice.label)
                    .color(curve_color(i, slices.len()))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Kinetics view
// ---------------------------------------------------------------------------

/// Render the pinned traces plus the live preview on a log10 y-axis.
///
/// A log axis cannot show non-positive values; those samples are omitted
/// from the rendered line only, the underlying trace keeps every point.
pub fn bleach_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() && state.overlays.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a TA export to view kinetics  (File → Open TA export…)");
        });
        return;
    }

    let y_label = if state.bleach.mod_units { "ΔmOD" } else { "ΔT/T" };
    let n_curves = state.overlays.len() + 1;

    Plot::new("bleach_plot")
        .legend(Legend::default())
        .x_axis_label("Time (ns)")
        .y_axis_label(y_label)
        .y_axis_formatter(|mark: GridMark, _range| format!("{:.2e}", 10f64.powf(mark.value)))
        .show(ui, |plot_ui| {
            for (i, overlay) in state.overlays.iter().enumerate() {
                plot_ui.line(
                    trace_line(&overlay.trace.time, &overlay.trace.signal)
                        .name(&overlay.label)
                        .color(curve_color(i, n_curves))
                        .width(1.5),
                );
            }

            if let Some(preview) = &state.preview {
                plot_ui.line(
                    trace_line(&preview.time, &preview.signal)
                        .name("current")
                        .color(curve_color(state.overlays.len(), n_curves))
                        .width(1.5),
                );
            }
        });
}

/// Build a log10-y line, dropping samples a log axis cannot represent.
fn trace_line<'a>(time: &'a [f64], signal: &'a [f64]) -> Line<'a> {
    let points: PlotPoints = time
        .iter()
        .zip(signal.iter())
        .filter(|(_, &s)| s > 0.0)
        .map(|(&t, &s)| [t, s.log10()])
        .collect();
    Line::new(points)
}

// ---------------------------------------------------------------------------
// Pump diagnostics view
// ---------------------------------------------------------------------------

/// Render the pump sample scatter and the deviation histogram, each in its
/// own plot widget.
pub fn pump_plots(ui: &mut Ui, state: &AppState) {
    let stats = match &state.pump {
        Some(stats) => stats,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a raw instrument log  (File → Open pump log…)");
            });
            return;
        }
    };

    let half = (ui.available_height() - ui.spacing().item_spacing.y) / 2.0;

    let samples: PlotPoints = stats
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    Plot::new("pump_scatter")
        .height(half)
        .x_axis_label("Experimental Points Measured")
        .y_axis_label("Picolo Pump Power on Photodiode per spectrum")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(samples)
                    .color(Color32::from_rgba_unmultiplied(255, 0, 0, 102))
                    .radius(2.0),
            );
        });

    let bars: Vec<Bar> = stats
        .histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(stats.histogram.bin_center(i), count as f64)
                .width(stats.histogram.bin_width)
        })
        .collect();

    Plot::new("pump_deviation_hist")
        .height(half)
        .x_axis_label("Percentage Deviation from Mean")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars).color(Color32::from_rgba_unmultiplied(0, 0, 255, 128)),
            );

            for p in [stats.p5, stats.p95] {
                if p.is_finite() {
                    plot_ui.vline(
                        VLine::new(p)
                            .color(Color32::RED)
                            .style(LineStyle::Dashed { length: 6.0 })
                            .width(1.0),
                    );
                }
            }
        });
}
