//! CSV persistence of trajectories, one file per simulation job.
//!
//! Files carry the header `time,theta1,theta2,omega1,omega2,x1,y1,x2,y2`
//! followed by one row per sample. Floats are written in their shortest
//! round-trip form, so reading a file back reproduces every value exactly.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SimError};
use crate::orchestrator::BatchResult;
use crate::state::StateVector;
use crate::trajectory::{Sample, Trajectory};

pub const COLUMNS: [&str; 9] = [
    "time", "theta1", "theta2", "omega1", "omega2", "x1", "y1", "x2", "y2",
];

/// File name prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "double_pendulum_sim";

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    time: f64,
    theta1: f64,
    theta2: f64,
    omega1: f64,
    omega2: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl From<&Sample> for Row {
    fn from(s: &Sample) -> Self {
        Row {
            time: s.t,
            theta1: s.state.theta1,
            theta2: s.state.theta2,
            omega1: s.state.omega1,
            omega2: s.state.omega2,
            x1: s.x1,
            y1: s.y1,
            x2: s.x2,
            y2: s.y2,
        }
    }
}

impl From<Row> for Sample {
    fn from(r: Row) -> Self {
        Sample {
            t: r.time,
            state: StateVector::new(r.theta1, r.theta2, r.omega1, r.omega2),
            x1: r.x1,
            y1: r.y1,
            x2: r.x2,
            y2: r.y2,
        }
    }
}

/// `<prefix>_<sim_id>.csv`
pub fn batch_file_name(prefix: &str, sim_id: usize) -> String {
    format!("{prefix}_{sim_id}.csv")
}

/// Inverse of [`batch_file_name`]. Returns `None` for unrelated file names.
pub fn parse_batch_file_name(prefix: &str, file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(prefix)?
        .strip_prefix('_')?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

pub fn write_trajectory(path: &Path, trajectory: &Trajectory) -> Result<()> {
    let csv_err = |source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Header is written by hand so that empty trajectories still get one.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    wtr.write_record(COLUMNS).map_err(csv_err)?;
    for sample in trajectory.samples() {
        wtr.serialize(Row::from(sample)).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn read_trajectory(path: &Path, sim_id: usize) -> Result<Trajectory> {
    let csv_err = |source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let headers = rdr.headers().map_err(csv_err)?;
    if headers.iter().ne(COLUMNS) {
        return Err(SimError::MalformedTrajectory {
            path: path.to_path_buf(),
            reason: format!("unexpected header {:?}", headers.iter().collect::<Vec<_>>()),
        });
    }

    let samples = rdr
        .deserialize::<Row>()
        .map(|row| row.map(Sample::from).map_err(csv_err))
        .collect::<Result<Vec<_>>>()?;
    Ok(Trajectory::new(sim_id, samples))
}

/// Writes every successful trajectory of `batch` to `dir` and reports one
/// outcome per written job. Faulted jobs are skipped, and a failed write
/// does not stop the remaining ones.
pub fn write_batch(
    dir: &Path,
    prefix: &str,
    batch: &BatchResult,
) -> Result<Vec<(usize, Result<PathBuf>)>> {
    fs::create_dir_all(dir).map_err(|source| SimError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let written = batch
        .trajectories()
        .map(|trajectory| {
            let sim_id = trajectory.sim_id();
            let path = dir.join(batch_file_name(prefix, sim_id));
            let outcome = write_trajectory(&path, trajectory).map(|()| path);
            match &outcome {
                Ok(path) => debug!(sim_id, path = %path.display(), "trajectory written"),
                Err(err) => warn!(sim_id, error = %err, "failed to write trajectory"),
            }
            (sim_id, outcome)
        })
        .collect();
    Ok(written)
}

/// Batch files in `dir` with the given prefix, sorted by `sim_id`.
pub fn discover_batch_files(dir: &Path, prefix: &str) -> Result<Vec<(usize, PathBuf)>> {
    let io_err = |source| SimError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name();
        if let Some(sim_id) = name.to_str().and_then(|n| parse_batch_file_name(prefix, n)) {
            found.push((sim_id, entry.path()));
        }
    }
    found.sort_by_key(|(sim_id, _)| *sim_id);
    Ok(found)
}
