use crate::data::analysis::{bleach_trace, pump_stats};
use crate::data::model::{
    BleachParams, KineticTrace, LabeledTrace, PumpStats, SpectrumParams, TaMatrix,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central-panel view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Spectrum,
    Kinetics,
    PumpDiagnostics,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded TA matrix (None until the user opens an export).
    pub dataset: Option<TaMatrix>,

    /// File stem of the loaded export, used for default trace labels.
    pub dataset_name: Option<String>,

    /// Pump diagnostics from the last opened raw log.
    pub pump: Option<PumpStats>,

    /// Active central-panel view.
    pub view: View,

    /// Spectral-slice parameters.
    pub spectrum: SpectrumParams,

    /// Kinetic-trace parameters.
    pub bleach: BleachParams,

    /// Live trace for the current bleach parameters (recomputed on change).
    pub preview: Option<KineticTrace>,

    /// Traces pinned to the kinetics overlay; these are what export writes.
    pub overlays: Vec<LabeledTrace>,

    /// Label for the next pinned trace.
    pub trace_label: String,

    /// Comma-separated requested slice times, as typed.
    pub times_text: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            dataset_name: None,
            pump: None,
            view: View::Spectrum,
            spectrum: SpectrumParams::default(),
            bleach: BleachParams::default(),
            preview: None,
            overlays: Vec::new(),
            trace_label: String::new(),
            times_text: "1".to_string(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded TA matrix and refresh derived values.
    pub fn set_dataset(&mut self, name: String, dataset: TaMatrix) {
        self.dataset_name = Some(name);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_preview();
    }

    /// Ingest pump samples from a raw log and switch to the diagnostics view.
    pub fn set_pump_samples(&mut self, values: Vec<f64>) {
        self.pump = Some(pump_stats(values));
        self.view = View::PumpDiagnostics;
        self.status_message = None;
    }

    /// Recompute the kinetics preview for the current parameters.
    pub fn refresh_preview(&mut self) {
        self.preview = self
            .dataset
            .as_ref()
            .map(|data| bleach_trace(data, &self.bleach));
    }

    /// Re-parse the requested slice times from the text field. Tokens that do
    /// not parse are ignored.
    pub fn apply_times_text(&mut self) {
        self.spectrum.times = self
            .times_text
            .split(',')
            .filter_map(|tok| tok.trim().parse::<f64>().ok())
            .collect();
    }

    /// Pin the current preview to the overlay under the typed label (falling
    /// back to the dataset name, then to a running number).
    pub fn pin_preview(&mut self) {
        let Some(trace) = self.preview.clone() else {
            return;
        };
        let label = if !self.trace_label.trim().is_empty() {
            self.trace_label.trim().to_string()
        } else if let Some(name) = &self.dataset_name {
            name.clone()
        } else {
            format!("trace {}", self.overlays.len() + 1)
        };
        self.overlays.push(LabeledTrace { label, trace });
    }

    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_matrix() -> TaMatrix {
        TaMatrix {
            wavelengths: vec![760.0, 800.0],
            timepoints: vec![0.0, 1.0],
            intensities: vec![vec![-2.0, -2.0], vec![-1.0, -1.0]],
        }
    }

    #[test]
    fn set_dataset_refreshes_preview() {
        let mut state = AppState::default();
        assert!(state.preview.is_none());

        state.set_dataset("demo".to_string(), tiny_matrix());
        assert!(state.preview.is_some());
    }

    #[test]
    fn times_text_parses_loosely() {
        let mut state = AppState::default();
        state.times_text = "1, 10, oops, 100".to_string();
        state.apply_times_text();
        assert_eq!(state.spectrum.times, vec![1.0, 10.0, 100.0]);
    }

    #[test]
    fn pin_preview_falls_back_to_dataset_name() {
        let mut state = AppState::default();
        state.set_dataset("demo".to_string(), tiny_matrix());
        state.pin_preview();
        assert_eq!(state.overlays.len(), 1);
        assert_eq!(state.overlays[0].label, "demo");
    }
}
