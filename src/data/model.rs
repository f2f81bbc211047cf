use std::ops::Range;

use serde::Serialize;

// ---------------------------------------------------------------------------
// TaMatrix – one Carpetview export, fully parsed
// ---------------------------------------------------------------------------

/// A transient-absorption measurement: wavelength × time × intensity.
///
/// Invariant (enforced by the loader): `intensities.len() == timepoints.len()`
/// and every row has `wavelengths.len()` cells.
#[derive(Debug, Clone)]
pub struct TaMatrix {
    /// Wavelength axis in nm (order as exported, not necessarily sorted).
    pub wavelengths: Vec<f64>,
    /// Time axis, typically ns.
    pub timepoints: Vec<f64>,
    /// Intensity rows, one per timepoint, in the instrument's raw unit (mOD).
    pub intensities: Vec<Vec<f64>>,
}

impl TaMatrix {
    pub fn n_wavelengths(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn n_times(&self) -> usize {
        self.timepoints.len()
    }

    /// Intensity row for one timepoint.
    pub fn row(&self, time_idx: usize) -> &[f64] {
        &self.intensities[time_idx]
    }
}

// ---------------------------------------------------------------------------
// Axis resolution
// ---------------------------------------------------------------------------

/// Index of the axis value closest to `target` (minimum absolute difference).
///
/// Ties resolve to the numerically first index. An empty axis yields 0; the
/// loader guarantees both axes are non-empty.
pub fn nearest_index(axis: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &v) in axis.iter().enumerate() {
        let dist = (v - target).abs();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Resolve a `[lo, hi]` window to a half-open index range on `axis`.
///
/// Both bounds resolve independently via [`nearest_index`]; the upper index
/// is excluded. A reversed resolution (hi index ≤ lo index) yields an empty
/// range rather than an error.
pub fn window_range(axis: &[f64], window: [f64; 2]) -> Range<usize> {
    let lo = nearest_index(axis, window[0]);
    let hi = nearest_index(axis, window[1]);
    lo..hi.max(lo)
}

// ---------------------------------------------------------------------------
// Analysis parameters
// ---------------------------------------------------------------------------

/// Parameters for the spectral-slice view.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumParams {
    /// Wavelength window in nm, resolved by nearest match.
    pub window: [f64; 2],
    /// Requested slice times; each resolves to its nearest time row.
    pub times: Vec<f64>,
    /// Data still in mOD (axis label only; no conversion in this view).
    pub mod_units: bool,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            window: [500.0, 800.0],
            times: vec![1.0],
            mod_units: false,
        }
    }
}

/// Parameters for the kinetic ("bleach") trace.
#[derive(Debug, Clone, PartialEq)]
pub struct BleachParams {
    /// Wavelength window to average over, in nm.
    pub window: [f64; 2],
    /// Divide by the post-truncation maximum.
    pub normalise: bool,
    /// Keep the signal in mOD instead of converting to ΔT/T.
    pub mod_units: bool,
    /// Truncate the trace at the bleach peak (minimum-signal index) and
    /// re-zero time there.
    pub from_peak: bool,
    /// Additive baseline adjustment. Added in the ΔT/T branch, subtracted in
    /// the mOD branch; the asymmetry is the instrument suite's convention.
    pub constant: f64,
}

impl Default for BleachParams {
    fn default() -> Self {
        Self {
            window: [760.0, 800.0],
            normalise: false,
            mod_units: false,
            from_peak: true,
            constant: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived entities
// ---------------------------------------------------------------------------

/// One spectral slice: intensity vs. wavelength at a resolved time row.
#[derive(Debug, Clone)]
pub struct SpectrumSlice {
    /// Legend label: the integer-truncated *requested* time, e.g. `"1 ns"`.
    /// It can differ from the matched row when the request falls far from
    /// the time grid.
    pub label: String,
    /// Wavelengths over the resolved window.
    pub wavelengths: Vec<f64>,
    /// Intensities of the resolved row over the same window.
    pub intensities: Vec<f64>,
}

/// A wavelength-averaged kinetic trace: paired time/signal vectors.
#[derive(Debug, Clone, Serialize)]
pub struct KineticTrace {
    pub time: Vec<f64>,
    pub signal: Vec<f64>,
}

impl KineticTrace {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// A kinetic trace kept in the overlay list (and written on export).
#[derive(Debug, Clone, Serialize)]
pub struct LabeledTrace {
    pub label: String,
    pub trace: KineticTrace,
}

// ---------------------------------------------------------------------------
// Pump diagnostics
// ---------------------------------------------------------------------------

/// Equal-width histogram of a sample sequence.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    pub counts: Vec<usize>,
    pub min: f64,
    pub bin_width: f64,
}

impl Histogram {
    /// Center of bin `i`, for plotting.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.bin_width
    }
}

/// Pump-power diagnostics derived from one raw instrument log.
#[derive(Debug, Clone)]
pub struct PumpStats {
    /// Extracted samples, in file order.
    pub values: Vec<f64>,
    /// Arithmetic mean (NaN for an empty series).
    pub mean: f64,
    /// Signed deviation from the mean in percent: `(mean - v) / mean * 100`.
    /// Values above the mean come out negative.
    pub deviations: Vec<f64>,
    /// 5th percentile of the deviations (linear interpolation).
    pub p5: f64,
    /// 95th percentile of the deviations (linear interpolation).
    pub p95: f64,
    /// 100-bin histogram of the deviations.
    pub histogram: Histogram,
}
