//! `TurbSim` `.sum` companion files
//!
//! Only a handful of labelled values are needed to dequantize a `.wnd`
//! payload. Lines are matched case-insensitively on a keyword; the value is
//! the first token after `=`, cut at a `%` sign. A non-numeric `T` reads as
//! 1 and any other non-numeric token as -1.

use crate::error::{EvoTurbError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const HUB_HEIGHT: &str = "HUB HEIGHT";
const CLOCKWISE: &str = "CLOCKWISE";
const MEAN_SPEED: &str = "UBAR";
const TURBULENCE_INTENSITY: [&str; 3] = ["TI(U", "TI(V", "TI(W"];
const HEIGHT_OFFSET: &str = "HEIGHT OFFSET";

/// Values recovered from a summary file
///
/// Fields already known from the `.wnd` header are passed in and never
/// overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// Hub height (m)
    pub hub_height: Option<f64>,
    /// Rotation flag; values > 0 mean clockwise
    pub clockwise: Option<f64>,
    /// Mean wind speed Ū (m/s)
    pub mean_speed: Option<f64>,
    /// Turbulence intensity of u, v, w (%)
    pub turbulence_intensity: [Option<f64>; 3],
    /// Grid height offset (m)
    pub height_offset: Option<f64>,
}

impl SummaryMetadata {
    /// Whether every field needed for decoding has been found
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.hub_height.is_some()
            && self.clockwise.is_some()
            && self.mean_speed.is_some()
            && self.turbulence_intensity.iter().all(Option::is_some)
    }

    /// Names of the required fields still missing
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.hub_height.is_none() {
            missing.push(HUB_HEIGHT);
        }
        if self.clockwise.is_none() {
            missing.push(CLOCKWISE);
        }
        if self.mean_speed.is_none() {
            missing.push(MEAN_SPEED);
        }
        for (name, ti) in TURBULENCE_INTENSITY.into_iter().zip(&self.turbulence_intensity) {
            if ti.is_none() {
                missing.push(name);
            }
        }
        missing
    }

    /// Whether the horizontal axis is stored right to left
    ///
    /// An unknown or zero flag is treated as counter-clockwise.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.clockwise.is_some_and(|flag| flag > 0.0)
    }

    /// Scan one line and record every missing field it carries
    pub fn scan_line(&mut self, line: &str) {
        let line = line.to_uppercase();

        if self.height_offset.is_none() && line.contains(HEIGHT_OFFSET) {
            self.height_offset = Some(parse_value(&line));
            return;
        }

        let mut slots: Vec<(&str, &mut Option<f64>)> = vec![
            (HUB_HEIGHT, &mut self.hub_height),
            (CLOCKWISE, &mut self.clockwise),
            (MEAN_SPEED, &mut self.mean_speed),
        ];
        for (name, ti) in TURBULENCE_INTENSITY
            .into_iter()
            .zip(self.turbulence_intensity.iter_mut())
        {
            slots.push((name, ti));
        }

        for (keyword, slot) in slots {
            if slot.is_none() && line.contains(keyword) {
                let value = parse_value(&line);
                *slot = Some(value);
                // Stop at the first numeric match
                if value_is_numeric(&line) {
                    return;
                }
            }
        }
    }

    /// Scan lines from `reader` until complete (height offset included) or EOF
    ///
    /// Lines are decoded lossily; bytes that are not UTF-8 (a Latin-1 degree
    /// sign, say) never touch the ASCII keywords.
    ///
    /// # Errors
    /// Returns an I/O error if reading fails.
    pub fn scan<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<()> {
        for line in reader.split(b'\n') {
            let line = line.map_err(|e| EvoTurbError::io(path, e))?;
            self.scan_line(&String::from_utf8_lossy(&line));
            if self.is_complete() && self.height_offset.is_some() {
                break;
            }
        }
        Ok(())
    }

    /// Read the summary at `path`, starting from the fields in `known`
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn read<P: AsRef<Path>>(path: P, known: Self) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EvoTurbError::io(path, e))?;
        let mut metadata = known;
        metadata.scan(BufReader::new(file), path)?;
        Ok(metadata)
    }
}

fn value_token(line: &str) -> &str {
    let start = line.find('=').map_or(0, |i| i + 1);
    let rest = &line[start..];
    let rest = rest.find('%').map_or(rest, |end| &rest[..end]);
    rest.split_whitespace().next().unwrap_or("")
}

fn value_is_numeric(line: &str) -> bool {
    value_token(line).parse::<f64>().is_ok()
}

fn parse_value(line: &str) -> f64 {
    let token = value_token(line);
    match token.parse::<f64>() {
        Ok(value) => value,
        Err(_) if token == "T" => 1.0,
        Err(_) => -1.0,
    }
}
