//! Benchmark scenario files.
//!
//! ```text
//! version 1
//! 0	arena.map	49	49	1	11	1	12	1.00000000
//! ```
//!
//! After an optional `version` line, each line holds one query: bucket, map
//! name, map width and height, start x and y, goal x and y, and the optimal
//! distance. Fields are separated by whitespace.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use jumpgrid_core::{ONE, Point, ROOT_TWO};

/// One query of a scenario.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experiment {
    pub bucket: u32,
    pub map: String,
    pub map_width: u32,
    pub map_height: u32,
    pub start_x: u32,
    pub start_y: u32,
    pub goal_x: u32,
    pub goal_y: u32,
    /// Optimal path length in grid units.
    pub distance: f64,
    /// Decimal places `distance` was recorded with.
    pub precision: usize,
}

impl Experiment {
    pub fn start(&self) -> Point {
        Point::new(self.start_x as i32, self.start_y as i32)
    }

    pub fn goal(&self) -> Point {
        Point::new(self.goal_x as i32, self.goal_y as i32)
    }

    /// Largest difference from `distance` that still counts as optimal.
    ///
    /// Half a unit in the last recorded decimal place, but never finer than
    /// integer costs can resolve: one cost unit plus the truncation of
    /// [`ROOT_TWO`] accumulated over the path.
    pub fn tolerance(&self) -> f64 {
        let recorded = 0.5 * 10f64.powi(-(self.precision.min(17) as i32));
        let unit = 1.0 / f64::from(ONE);
        let diagonal_error = 1.0 - f64::from(ROOT_TWO) / (std::f64::consts::SQRT_2 * f64::from(ONE));
        recorded.max(unit + self.distance * diagonal_error)
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.*}",
            self.bucket,
            self.map,
            self.map_width,
            self.map_height,
            self.start_x,
            self.start_y,
            self.goal_x,
            self.goal_y,
            self.precision,
            self.distance
        )
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ScenarioError {
    Io { path: PathBuf, source: io::Error },
    /// Only versions 0 and 1 are understood.
    UnsupportedVersion(String),
    /// A line that is not a query.
    Malformed { line: usize, reason: String },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "scenario {}: {source}", path.display()),
            Self::UnsupportedVersion(v) => write!(f, "unsupported scenario version {v}"),
            Self::Malformed { line, reason } => write!(f, "scenario line {line}: {reason}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A computed length that disagrees with the recorded optimum.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimalityError {
    pub experiment: Experiment,
    pub length: f64,
}

impl fmt::Display for OptimalityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.experiment;
        write!(
            f,
            "non-optimal path from {} to {} on {}: length {:.4}, optimal {:.*}",
            e.start(),
            e.goal(),
            e.map,
            self.length,
            e.precision,
            e.distance
        )
    }
}

impl std::error::Error for OptimalityError {}

/// Check a computed path length against the experiment's recorded optimum.
pub fn check_optimality(length: f64, experiment: &Experiment) -> Result<(), OptimalityError> {
    if (length - experiment.distance).abs() <= experiment.tolerance() {
        Ok(())
    } else {
        Err(OptimalityError {
            experiment: experiment.clone(),
            length,
        })
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// An ordered list of experiments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scenario {
    experiments: Vec<Experiment>,
}

impl Scenario {
    pub fn new(experiments: Vec<Experiment>) -> Self {
        Self { experiments }
    }

    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let mut experiments = Vec::new();
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .peekable();

        if let Some(&(_, first)) = lines.peek() {
            let mut fields = first.split_ascii_whitespace();
            if fields.next() == Some("version") {
                let v = fields.next().unwrap_or_default();
                match v.parse::<f64>() {
                    Ok(n) if n == 0.0 || n == 1.0 => {}
                    _ => return Err(ScenarioError::UnsupportedVersion(v.to_string())),
                }
                lines.next();
            }
        }

        for (line, text) in lines {
            experiments.push(parse_experiment(text).map_err(|reason| ScenarioError::Malformed { line, reason })?);
        }
        Ok(Self { experiments })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::parse(&text)?;
        log::info!("loaded {} experiments from {}", scenario.len(), path.display());
        Ok(scenario)
    }

    /// Write as a version 1 scenario.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "version 1")?;
        for e in &self.experiments {
            writeln!(writer, "{e}")?;
        }
        Ok(())
    }

    /// Order experiments by increasing optimal distance.
    pub fn sort_by_distance(&mut self) {
        self.experiments.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    pub fn push(&mut self, experiment: Experiment) {
        self.experiments.push(experiment);
    }

    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Experiment> {
        self.experiments.iter()
    }
}

impl<'a> IntoIterator for &'a Scenario {
    type Item = &'a Experiment;
    type IntoIter = std::slice::Iter<'a, Experiment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_experiment(line: &str) -> Result<Experiment, String> {
    let fields: Vec<&str> = line.split_ascii_whitespace().collect();
    let [bucket, map, w, h, sx, sy, gx, gy, dist] = fields[..] else {
        return Err(format!("expected 9 fields, found {}", fields.len()));
    };
    let int = |name: &str, s: &str| s.parse::<u32>().map_err(|e| format!("{name} {s:?}: {e}"));
    let distance = dist
        .parse::<f64>()
        .map_err(|e| format!("distance {dist:?}: {e}"))?;
    let precision = dist.find('.').map_or(0, |i| dist.len() - i - 1);
    Ok(Experiment {
        bucket: int("bucket", bucket)?,
        map: map.to_string(),
        map_width: int("width", w)?,
        map_height: int("height", h)?,
        start_x: int("start x", sx)?,
        start_y: int("start y", sy)?,
        goal_x: int("goal x", gx)?,
        goal_y: int("goal y", gy)?,
        distance,
        precision,
    })
}
