use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::TaMatrix;

// ---------------------------------------------------------------------------
// Carpetview TA export
// ---------------------------------------------------------------------------

/// Load a Carpetview-exported TA data file.
///
/// Fixed layout: two header/metadata lines (skipped unconditionally), then a
/// whitespace-delimited numeric grid. The first grid row minus its first cell
/// is the wavelength axis in nm; the first column of every later row is the
/// timepoint; the remaining cells are the intensity matrix. Blank lines are
/// ignored. No unit conversion happens here.
pub fn load_ta(path: &Path) -> Result<TaMatrix> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading TA export {}", path.display()))?;
    parse_ta(&text).with_context(|| format!("parsing TA export {}", path.display()))
}

fn parse_ta(text: &str) -> Result<TaMatrix> {
    let mut rows = text
        .lines()
        .enumerate()
        .skip(2)
        .filter(|(_, line)| !line.trim().is_empty());

    let (wl_line_no, wl_line) = rows
        .next()
        .context("file ends before the wavelength row (2 header lines + grid expected)")?;
    let wl_cells = parse_grid_row(wl_line, wl_line_no)?;
    if wl_cells.len() < 2 {
        bail!("line {}: wavelength row has no wavelength cells", wl_line_no + 1);
    }
    // First cell of the wavelength row is a placeholder over the time column.
    let wavelengths = wl_cells[1..].to_vec();

    let mut timepoints = Vec::new();
    let mut intensities = Vec::new();

    for (line_no, line) in rows {
        let cells = parse_grid_row(line, line_no)?;
        if cells.len() != wavelengths.len() + 1 {
            bail!(
                "line {}: expected {} columns, found {}",
                line_no + 1,
                wavelengths.len() + 1,
                cells.len()
            );
        }
        timepoints.push(cells[0]);
        intensities.push(cells[1..].to_vec());
    }

    if timepoints.is_empty() {
        bail!("no time rows after the wavelength row");
    }

    Ok(TaMatrix {
        wavelengths,
        timepoints,
        intensities,
    })
}

fn parse_grid_row(line: &str, line_no: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("line {}: '{tok}' is not a number", line_no + 1))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Raw pump log (pre-Carpetview instrument output)
// ---------------------------------------------------------------------------

/// Extract pump-power samples from a raw instrument log.
///
/// Streams the file line by line; every line carrying a well-formed
/// `Pump=<value>` token contributes one sample, in file order. Lines without
/// one are skipped silently. A log with no matching lines yields an empty
/// vector, not an error.
pub fn load_pump_log(path: &Path) -> Result<Vec<f64>> {
    let file =
        File::open(path).with_context(|| format!("opening pump log {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut values = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("reading line {} of {}", line_no + 1, path.display())
        })?;
        if let Some(value) = pump_value_in_line(&line) {
            values.push(value);
        }
    }
    Ok(values)
}

/// Find the first `Pump=<value>` token on a line.
///
/// The value grammar is strict scientific notation: one or more digits, a
/// mandatory decimal point, one or more digits, `e`, an optional sign, one or
/// more digits. When a `Pump=` occurrence is not followed by a well-formed
/// value, the rest of the line is scanned for another occurrence.
pub fn pump_value_in_line(line: &str) -> Option<f64> {
    let mut rest = line;
    while let Some(pos) = rest.find("Pump=") {
        rest = &rest[pos + "Pump=".len()..];
        if let Some(value) = leading_sci_float(rest) {
            return Some(value);
        }
    }
    None
}

/// Parse a scientific-notation float prefix (`123.456e-7` style). Returns
/// `None` unless the string starts with the full mantissa-exponent form.
fn leading_sci_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;

    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i > start
    };

    if !digits(&mut i) {
        return None;
    }
    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    i += 1;
    if !digits(&mut i) {
        return None;
    }
    if bytes.get(i) != Some(&b'e') {
        return None;
    }
    i += 1;
    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if !digits(&mut i) {
        return None;
    }

    s[..i].parse().ok()
}
