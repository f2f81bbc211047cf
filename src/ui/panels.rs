use eframe::egui::{self, Color32, DragValue, RichText, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – analysis parameters for the active view
// ---------------------------------------------------------------------------

/// Render the parameter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Parameters");
    ui.separator();

    match state.view {
        View::Spectrum => spectrum_controls(ui, state),
        View::Kinetics => kinetics_controls(ui, state),
        View::PumpDiagnostics => pump_summary(ui, state),
    }
}

fn spectrum_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Wavelength window (nm)");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(DragValue::new(&mut state.spectrum.window[0]).speed(1.0));
        ui.label("–");
        ui.add(DragValue::new(&mut state.spectrum.window[1]).speed(1.0));
    });
    ui.add_space(4.0);

    ui.strong("Slice times (ns, comma separated)");
    if ui.text_edit_singleline(&mut state.times_text).changed() {
        state.apply_times_text();
    }
    ui.add_space(4.0);

    ui.checkbox(&mut state.spectrum.mod_units, "Data in mOD");
}

fn kinetics_controls(ui: &mut Ui, state: &mut AppState) {
    let mut changed = false;

    ui.strong("Averaging window (nm)");
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(DragValue::new(&mut state.bleach.window[0]).speed(1.0))
            .changed();
        ui.label("–");
        changed |= ui
            .add(DragValue::new(&mut state.bleach.window[1]).speed(1.0))
            .changed();
    });
    ui.add_space(4.0);

    changed |= ui
        .checkbox(&mut state.bleach.mod_units, "Keep signal in mOD")
        .changed();
    changed |= ui
        .checkbox(&mut state.bleach.from_peak, "Start at bleach peak (t = 0)")
        .changed();
    changed |= ui
        .checkbox(&mut state.bleach.normalise, "Normalise to maximum")
        .changed();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Baseline constant");
        changed |= ui
            .add(DragValue::new(&mut state.bleach.constant).speed(0.01))
            .changed();
    });

    if changed {
        state.refresh_preview();
    }

    ui.separator();
    ui.strong("Overlay");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Label");
        ui.text_edit_singleline(&mut state.trace_label);
    });
    ui.horizontal(|ui: &mut Ui| {
        let can_pin = state
            .preview
            .as_ref()
            .is_some_and(|trace| !trace.is_empty());
        if ui
            .add_enabled(can_pin, egui::Button::new("Pin trace"))
            .clicked()
        {
            state.pin_preview();
        }
        if ui
            .add_enabled(!state.overlays.is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            state.clear_overlays();
        }
    });

    if !state.overlays.is_empty() {
        ui.add_space(4.0);
        for overlay in &state.overlays {
            ui.label(format!(
                "{}  ({} points)",
                overlay.label,
                overlay.trace.len()
            ));
        }
    }
}

fn pump_summary(ui: &mut Ui, state: &AppState) {
    let Some(stats) = &state.pump else {
        ui.label("No pump log loaded.");
        return;
    };

    let worst = stats
        .deviations
        .iter()
        .fold(0.0f64, |acc, &d| if d.abs() > acc.abs() { d } else { acc });

    ui.label(format!("{} samples", stats.values.len()));
    ui.label(format!("mean  {:.4e}", stats.mean));
    ui.label(format!("p5    {:.2} %", stats.p5));
    ui.label(format!("p95   {:.2} %", stats.p95));
    ui.label(format!("worst {:.2} %", worst));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open TA export…").clicked() {
                open_ta_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open pump log…").clicked() {
                open_pump_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(
                    !state.overlays.is_empty(),
                    egui::Button::new("Export traces…"),
                )
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (view, label) in [
            (View::Spectrum, "Spectrum"),
            (View::Kinetics, "Kinetics"),
            (View::PumpDiagnostics, "Pump diagnostics"),
        ] {
            if ui.selectable_label(state.view == view, label).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if let Some(data) = &state.dataset {
            ui.label(format!(
                "{} timepoints × {} wavelengths",
                data.n_times(),
                data.n_wavelengths()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_ta_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Carpetview TA export")
        .add_filter("TA export", &["dat", "txt"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_ta(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} timepoints × {} wavelengths from {}",
                    dataset.n_times(),
                    dataset.n_wavelengths(),
                    path.display()
                );
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "dataset".to_string());
                state.set_dataset(name, dataset);
            }
            Err(e) => {
                log::error!("Failed to load TA export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn open_pump_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open raw instrument log")
        .add_filter("Instrument log", &["log", "txt"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_pump_log(&path) {
            Ok(values) => {
                log::info!("Extracted {} pump samples from {}", values.len(), path.display());
                state.set_pump_samples(values);
            }
            Err(e) => {
                log::error!("Failed to read pump log: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export pinned traces")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::export_traces(&path, &state.overlays) {
            Ok(()) => {
                log::info!("Exported {} traces to {}", state.overlays.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export traces: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
