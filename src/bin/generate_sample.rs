use std::fs::File;
use std::io::{BufWriter, Write};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_ta_export(rng: &mut SimpleRng) -> std::io::Result<(usize, usize)> {
    // Wavelengths: 450 → 850 nm, step 2
    let wavelengths: Vec<f64> = (0..=200).map(|i| 450.0 + i as f64 * 2.0).collect();
    // Timepoints: -0.5 → 19.5 ns, step 0.5 (a few pre-excitation rows)
    let timepoints: Vec<f64> = (0..41).map(|i| -0.5 + i as f64 * 0.5).collect();

    let file = File::create("sample_ta.dat")?;
    let mut w = BufWriter::new(file);

    writeln!(w, "Carpetview export (synthetic)")?;
    writeln!(w, "sample: demo dye, pump 532 nm, probe white light")?;

    write!(w, "0.0")?;
    for wl in &wavelengths {
        write!(w, "\t{wl:.1}")?;
    }
    writeln!(w)?;

    for &t in &timepoints {
        write!(w, "{t:.3}")?;
        for &wl in &wavelengths {
            // Negative-going bleach band at 780 nm, single-exponential decay,
            // flat before excitation. Raw unit is mOD.
            let decay = if t < 0.0 { 0.0 } else { (-t / 6.0).exp() };
            let bleach = gaussian(wl, 780.0, 18.0, -4.5) * decay;
            let esa = gaussian(wl, 560.0, 45.0, 1.2) * decay;
            let value = bleach + esa + rng.gauss(0.0, 0.03);
            write!(w, "\t{value:.5}")?;
        }
        writeln!(w)?;
    }

    w.flush()?;
    Ok((timepoints.len(), wavelengths.len()))
}

fn write_pump_log(rng: &mut SimpleRng, spectra: usize) -> std::io::Result<usize> {
    let file = File::create("sample_pump.log")?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# HARPIA raw output (synthetic)")?;

    let mut samples = 0;
    for i in 0..spectra {
        // Every 25th spectrum is taken with the shutter closed and logs no
        // pump reading.
        if i % 25 == 24 {
            writeln!(w, "spectrum {i}  shutter=closed")?;
            continue;
        }
        let pump = rng.gauss(0.6125, 0.015).max(1e-6);
        writeln!(w, "spectrum {i}  shutter=open  Pump={pump:.6e}")?;
        samples += 1;
    }

    w.flush()?;
    Ok(samples)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let (n_times, n_wavelengths) =
        write_ta_export(&mut rng).expect("Failed to write sample_ta.dat");
    println!("Wrote {n_times} timepoints × {n_wavelengths} wavelengths to sample_ta.dat");

    let samples = write_pump_log(&mut rng, 200).expect("Failed to write sample_pump.log");
    println!("Wrote {samples} pump samples to sample_pump.log");
}
