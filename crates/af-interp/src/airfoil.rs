//! Airfoil polars: angle of attack -> lift and drag coefficients.
//!
//! Polars are loaded once during actuator initialization and handed out as
//! `Arc<AirfoilTable>`. Wings that reference the same file share one table.

use crate::error::{InterpError, InterpResult};
use crate::linear::{check_table, eval_checked};
use af_core::{Real, radians};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lift and drag coefficient curves over angle of attack (radians).
#[derive(Clone, Debug, PartialEq)]
pub struct AirfoilTable {
    aoa: Vec<Real>,
    cl: Vec<Real>,
    cd: Vec<Real>,
}

impl AirfoilTable {
    /// Build from angles in radians; `aoa` must be strictly increasing.
    pub fn new(aoa: Vec<Real>, cl: Vec<Real>, cd: Vec<Real>) -> InterpResult<Self> {
        check_table("airfoil lift", &aoa, &cl)?;
        check_table("airfoil drag", &aoa, &cd)?;
        Ok(Self { aoa, cl, cd })
    }

    /// Build from rows of `(aoa_deg, cl, cd)`.
    pub fn from_degree_rows(rows: &[(Real, Real, Real)]) -> InterpResult<Self> {
        let aoa = rows.iter().map(|r| radians(r.0)).collect();
        let cl = rows.iter().map(|r| r.1).collect();
        let cd = rows.iter().map(|r| r.2).collect();
        Self::new(aoa, cl, cd)
    }

    /// Thin flat plate: `cl = 2 pi sin(aoa)` over +/- 20 degrees with a
    /// constant profile drag.
    pub fn flat_plate() -> Self {
        let aoa: Vec<Real> = (-20..=20).map(|d| radians(Real::from(d))).collect();
        let cl = aoa.iter().map(|a| 2.0 * std::f64::consts::PI * a.sin()).collect();
        let cd = vec![0.01; aoa.len()];
        Self { aoa, cl, cd }
    }

    pub fn len(&self) -> usize {
        self.aoa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aoa.is_empty()
    }

    /// `(cl, cd)` at `aoa` radians, clamped to the tabulated range.
    pub fn lookup(&self, aoa: Real) -> (Real, Real) {
        (
            eval_checked(&self.aoa, &self.cl, aoa),
            eval_checked(&self.aoa, &self.cd, aoa),
        )
    }
}

/// On-disk polar formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AirfoilFormat {
    /// First line holds the row count, then `aoa_deg cl cd [cm]` rows.
    #[default]
    Text,
    /// AeroDyn-style polar: row count on the `NumAlf` line, `!` comments.
    OpenFast,
}

impl FromStr for AirfoilFormat {
    type Err = InterpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(AirfoilFormat::Text),
            "openfast" => Ok(AirfoilFormat::OpenFast),
            _ => Err(InterpError::UnknownFormat { name: s.to_string() }),
        }
    }
}

impl fmt::Display for AirfoilFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirfoilFormat::Text => write!(f, "text"),
            AirfoilFormat::OpenFast => write!(f, "openfast"),
        }
    }
}

/// Reads polar files.
pub struct AirfoilLoader;

impl AirfoilLoader {
    pub fn load(path: &Path, format: AirfoilFormat) -> InterpResult<AirfoilTable> {
        let content = std::fs::read_to_string(path).map_err(|e| InterpError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, format).map_err(|e| match e {
            InterpError::Load { reason, .. } => InterpError::Load {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse polar text. Errors carry an empty path; `load` fills it in.
    pub fn parse(content: &str, format: AirfoilFormat) -> InterpResult<AirfoilTable> {
        let mut lines = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'));

        let count = match format {
            AirfoilFormat::Text => {
                let first = lines.next().ok_or_else(|| load_err("file is empty"))?;
                parse_count(first.split_whitespace().next().unwrap_or_default())?
            }
            AirfoilFormat::OpenFast => {
                let line = lines
                    .by_ref()
                    .find(|l| l.split_whitespace().nth(1) == Some("NumAlf"))
                    .ok_or_else(|| load_err("no NumAlf entry"))?;
                parse_count(line.split_whitespace().next().unwrap_or_default())?
            }
        };

        let mut rows = Vec::with_capacity(count);
        for line in lines.take(count) {
            let vals: Vec<Real> = line
                .split_whitespace()
                .take(3)
                .map(|tok| tok.parse::<Real>())
                .collect::<Result<_, _>>()
                .map_err(|e| load_err(&format!("bad polar row '{line}': {e}")))?;
            if vals.len() < 3 {
                return Err(load_err(&format!("polar row '{line}' has fewer than 3 columns")));
            }
            rows.push((vals[0], vals[1], vals[2]));
        }
        if rows.len() != count {
            return Err(load_err(&format!(
                "expected {count} polar rows, found {}",
                rows.len()
            )));
        }
        AirfoilTable::from_degree_rows(&rows)
    }
}

fn load_err(reason: &str) -> InterpError {
    InterpError::Load {
        path: String::new(),
        reason: reason.to_string(),
    }
}

fn parse_count(tok: &str) -> InterpResult<usize> {
    tok.parse::<usize>()
        .map_err(|_| load_err(&format!("invalid row count '{tok}'")))
}

/// Hands out one shared table per airfoil source.
///
/// Named in-memory tables take precedence over files with the same name.
#[derive(Default)]
pub struct AirfoilCache {
    named: HashMap<String, Arc<AirfoilTable>>,
    files: HashMap<(PathBuf, AirfoilFormat), Arc<AirfoilTable>>,
}

impl AirfoilCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache preloaded with the built-in `flat_plate` polar.
    pub fn with_builtins() -> Self {
        let mut cache = Self::new();
        cache.insert("flat_plate", AirfoilTable::flat_plate());
        cache
    }

    pub fn insert(&mut self, name: impl Into<String>, table: AirfoilTable) -> Arc<AirfoilTable> {
        let table = Arc::new(table);
        self.named.insert(name.into(), Arc::clone(&table));
        table
    }

    pub fn get(&mut self, source: &str, format: AirfoilFormat) -> InterpResult<Arc<AirfoilTable>> {
        if let Some(table) = self.named.get(source) {
            return Ok(Arc::clone(table));
        }

        let path = PathBuf::from(source);
        if let Some(table) = self.files.get(&(path.clone(), format)) {
            debug!(source, "airfoil cache hit");
            return Ok(Arc::clone(table));
        }
        if self.files.keys().any(|(p, f)| *p == path && *f != format) {
            warn!(source, %format, "airfoil file already loaded with a different format");
        }

        let table = Arc::new(AirfoilLoader::load(&path, format)?);
        info!(source, %format, rows = table.len(), "loaded airfoil polar");
        self.files.insert((path, format), Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
