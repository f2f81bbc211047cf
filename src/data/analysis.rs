use super::model::{
    BleachParams, Histogram, KineticTrace, PumpStats, SpectrumParams, SpectrumSlice, TaMatrix,
    nearest_index, window_range,
};

/// Fixed instrument calibration factor converting mOD to ΔT/T.
const MOD_TO_DTT: f64 = -2.28;

// ---------------------------------------------------------------------------
// Spectral slices
// ---------------------------------------------------------------------------

/// Intensity-vs-wavelength slices at the requested times.
///
/// The wavelength window and every requested time resolve by nearest match;
/// no interpolation. The legend label is the integer-truncated *requested*
/// time, so it can differ from the matched row when the request falls far
/// from the time grid.
pub fn spectrum_slices(data: &TaMatrix, params: &SpectrumParams) -> Vec<SpectrumSlice> {
    let cols = window_range(&data.wavelengths, params.window);

    params
        .times
        .iter()
        .map(|&requested| {
            let row = nearest_index(&data.timepoints, requested);
            SpectrumSlice {
                label: format!("{} ns", requested.trunc() as i64),
                wavelengths: data.wavelengths[cols.clone()].to_vec(),
                intensities: data.row(row)[cols.clone()].to_vec(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Kinetic ("bleach") trace
// ---------------------------------------------------------------------------

/// Average the wavelength window per time row and apply the unit, alignment
/// and normalization transforms. Returns the trace; rendering is separate.
pub fn bleach_trace(data: &TaMatrix, params: &BleachParams) -> KineticTrace {
    let cols = window_range(&data.wavelengths, params.window);

    let mut signal: Vec<f64> = data
        .intensities
        .iter()
        .map(|row| mean(&row[cols.clone()]))
        .collect();

    // Bleach peak: first index of the minimum *raw* averaged signal, located
    // before the unit transform flips the sign.
    let peak = argmin(&signal);

    // The constant is added in the ΔT/T branch but subtracted in the mOD
    // branch; the asymmetry follows the instrument suite's convention.
    if params.mod_units {
        for s in &mut signal {
            *s -= params.constant;
        }
    } else {
        for s in &mut signal {
            *s = MOD_TO_DTT * *s + params.constant;
        }
    }

    let mut time = data.timepoints.clone();
    if params.from_peak {
        let zero = time[peak];
        time.drain(..peak);
        signal.drain(..peak);
        for t in &mut time {
            *t -= zero;
        }
    }

    if params.normalise {
        // No guard for a zero maximum: the division propagates inf/NaN.
        let max = signal.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for s in &mut signal {
            *s /= max;
        }
    }

    KineticTrace { time, signal }
}

// ---------------------------------------------------------------------------
// Pump-power diagnostics
// ---------------------------------------------------------------------------

/// Summary statistics over the extracted pump samples.
///
/// An empty series stays well-defined: the mean and percentiles come out NaN
/// and the histogram empty. Nothing here panics on degenerate input.
pub fn pump_stats(values: Vec<f64>) -> PumpStats {
    let mean = mean(&values);
    let deviations: Vec<f64> = values
        .iter()
        .map(|v| (mean - v) / mean * 100.0)
        .collect();

    let p5 = percentile(&deviations, 5.0);
    let p95 = percentile(&deviations, 95.0);
    let histogram = histogram(&deviations, 100);

    PumpStats {
        values,
        mean,
        deviations,
        p5,
        p95,
        histogram,
    }
}

/// Percentile with linear interpolation between the two nearest ranks.
/// NaN for an empty slice or when any value is NaN.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (sorted.len() - 1) as f64 * q / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Equal-width histogram over `[min, max]` with the right-most edge
/// inclusive. A degenerate all-equal range expands by ±0.5. NaN samples are
/// skipped.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if bins == 0 || values.is_empty() {
        return Histogram::default();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if min > max {
        // Every sample was NaN.
        return Histogram::default();
    }
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let bin_width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        if v.is_nan() {
            continue;
        }
        let mut idx = ((v - min) / bin_width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    Histogram {
        counts,
        min,
        bin_width,
    }
}

// ---------------------------------------------------------------------------
// Small numeric helpers
// ---------------------------------------------------------------------------

/// Arithmetic mean; NaN for an empty slice.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// First index of the minimum value. NaN entries never win a `<` comparison,
/// so an all-NaN slice yields 0.
fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Wavelengths [500, 600, 700], timepoints [0, 1, 2],
    /// intensities [[1,2,3],[4,5,6],[7,8,9]].
    fn small_matrix() -> TaMatrix {
        TaMatrix {
            wavelengths: vec![500.0, 600.0, 700.0],
            timepoints: vec![0.0, 1.0, 2.0],
            intensities: vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 9.0],
            ],
        }
    }

    fn raw_params() -> BleachParams {
        BleachParams {
            window: [500.0, 700.0],
            normalise: false,
            mod_units: true,
            from_peak: false,
            constant: 0.0,
        }
    }

    #[test]
    fn window_mean_over_resolved_columns() {
        // [500, 700] resolves to columns 0..2, so the mean spans columns 0
        // and 1 of each row.
        let trace = bleach_trace(&small_matrix(), &raw_params());
        assert_eq!(trace.signal, vec![1.5, 4.5, 7.5]);
        assert_eq!(trace.time, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn dtt_transform_scales_by_calibration_factor() {
        let params = BleachParams {
            mod_units: false,
            ..raw_params()
        };
        let trace = bleach_trace(&small_matrix(), &params);
        assert_eq!(trace.signal, vec![-2.28 * 1.5, -2.28 * 4.5, -2.28 * 7.5]);
    }

    #[test]
    fn constant_is_added_in_dtt_and_subtracted_in_mod() {
        let dtt = BleachParams {
            mod_units: false,
            constant: 5.0,
            ..raw_params()
        };
        let trace = bleach_trace(&small_matrix(), &dtt);
        assert_eq!(trace.signal[0], -2.28 * 1.5 + 5.0);

        let raw = BleachParams {
            constant: 5.0,
            ..raw_params()
        };
        let trace = bleach_trace(&small_matrix(), &raw);
        assert_eq!(trace.signal, vec![-3.5, -0.5, 2.5]);
    }

    /// Row means [5, 1, 3]: the bleach peak sits in the middle row.
    fn dipped_matrix() -> TaMatrix {
        TaMatrix {
            wavelengths: vec![500.0, 600.0],
            timepoints: vec![10.0, 11.0, 12.0],
            intensities: vec![vec![5.0, 5.0], vec![1.0, 1.0], vec![3.0, 3.0]],
        }
    }

    #[test]
    fn from_peak_truncates_and_rezeroes_time() {
        let params = BleachParams {
            window: [500.0, 600.1],
            from_peak: true,
            ..raw_params()
        };
        let trace = bleach_trace(&dipped_matrix(), &params);
        assert_eq!(trace.time[0], 0.0);
        assert_eq!(trace.time, vec![0.0, 1.0]);
        assert_eq!(trace.signal, vec![1.0, 3.0]);
    }

    #[test]
    fn peak_is_located_before_the_unit_transform() {
        // In ΔT/T the transform flips the sign, so the transformed minimum
        // would sit at the first row; the raw minimum (row 1) must win.
        let params = BleachParams {
            window: [500.0, 600.1],
            mod_units: false,
            from_peak: true,
            ..raw_params()
        };
        let trace = bleach_trace(&dipped_matrix(), &params);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.signal[0], -2.28 * 1.0);
    }

    #[test]
    fn normalise_divides_by_post_truncation_maximum() {
        let params = BleachParams {
            window: [500.0, 600.1],
            from_peak: true,
            normalise: true,
            ..raw_params()
        };
        let trace = bleach_trace(&dipped_matrix(), &params);
        let max = trace.signal.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 1.0);
        assert_eq!(trace.signal, vec![1.0 / 3.0, 1.0]);
    }

    #[test]
    fn zero_signal_normalisation_propagates_nan_without_panic() {
        let data = TaMatrix {
            wavelengths: vec![500.0, 600.0],
            timepoints: vec![0.0, 1.0],
            intensities: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        };
        let params = BleachParams {
            window: [500.0, 600.1],
            normalise: true,
            from_peak: false,
            ..raw_params()
        };
        let trace = bleach_trace(&data, &params);
        assert!(trace.signal.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn empty_window_yields_nan_means() {
        let params = BleachParams {
            window: [700.0, 500.0],
            ..raw_params()
        };
        let trace = bleach_trace(&small_matrix(), &params);
        assert!(trace.signal.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn spectrum_slices_resolve_window_and_times() {
        let params = SpectrumParams {
            window: [500.0, 700.0],
            times: vec![1.2],
            mod_units: false,
        };
        let slices = spectrum_slices(&small_matrix(), &params);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].wavelengths, vec![500.0, 600.0]);
        assert_eq!(slices[0].intensities, vec![4.0, 5.0]);
        assert_eq!(slices[0].label, "1 ns");
    }

    #[test]
    fn slice_label_truncates_the_requested_time() {
        // Nearest row is t = 10 but the label reflects the request.
        let data = TaMatrix {
            wavelengths: vec![500.0, 600.0],
            timepoints: vec![0.0, 10.0, 20.0],
            intensities: vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]],
        };
        let params = SpectrumParams {
            window: [500.0, 600.1],
            times: vec![7.9],
            mod_units: false,
        };
        let slices = spectrum_slices(&data, &params);
        assert_eq!(slices[0].label, "7 ns");
        assert_eq!(slices[0].intensities, vec![2.0, 2.0]);
    }

    #[test]
    fn pump_stats_two_sample_scenario() {
        let stats = pump_stats(vec![1.0, 2.0]);
        assert!(close(stats.mean, 1.5));
        assert!(close(stats.deviations[0], 100.0 / 3.0));
        assert!(close(stats.deviations[1], -100.0 / 3.0));
        // Linear interpolation between the two deviations.
        assert!(close(stats.p5, -30.0));
        assert!(close(stats.p95, 30.0));
    }

    #[test]
    fn pump_stats_empty_series_is_nan_but_does_not_panic() {
        let stats = pump_stats(Vec::new());
        assert!(stats.mean.is_nan());
        assert!(stats.p5.is_nan());
        assert!(stats.p95.is_nan());
        assert!(stats.deviations.is_empty());
        assert!(stats.histogram.counts.is_empty());
    }

    #[test]
    fn percentile_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!(close(percentile(&values, 25.0), 1.75));
        assert!(close(percentile(&values, 0.0), 1.0));
        assert!(close(percentile(&values, 100.0), 4.0));
    }

    #[test]
    fn percentile_of_nan_series_is_nan() {
        assert!(percentile(&[], 50.0).is_nan());
        assert!(percentile(&[1.0, f64::NAN], 50.0).is_nan());
    }

    #[test]
    fn histogram_right_edge_is_inclusive() {
        let h = histogram(&[0.0, 0.25, 0.75, 1.0], 2);
        assert_eq!(h.counts, vec![2, 2]);
        assert!(close(h.bin_width, 0.5));
    }

    #[test]
    fn histogram_degenerate_range_expands() {
        let h = histogram(&[2.0, 2.0], 4);
        assert!(close(h.min, 1.5));
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }
}
