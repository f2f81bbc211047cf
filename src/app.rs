use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TaExplorerApp {
    pub state: AppState,
}

impl Default for TaExplorerApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for TaExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: analysis parameters ----
        egui::SidePanel::left("parameter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the active view's plot(s) ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Spectrum => plot::spectrum_plot(ui, &self.state),
            View::Kinetics => plot::bleach_plot(ui, &self.state),
            View::PumpDiagnostics => plot::pump_plots(ui, &self.state),
        });
    }
}
