use std::borrow::Cow;
use std::io::{self, Write};

use crate::bodies::Body;
use crate::dynamics::state::State;

/// One body's state at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub frame: u64,
    pub time: f64,
    pub body: String,
    pub state: State,
}

impl Sample {
    /// One sample per body for the current frame.
    pub fn snapshot(frame: u64, time: f64, bodies: &[Body]) -> Vec<Sample> {
        bodies
            .iter()
            .map(|b| Sample {
                frame,
                time,
                body: b.name().to_string(),
                state: *b.state(),
            })
            .collect()
    }
}

/// Write trajectory samples in CSV format.
///
/// Columns: frame, time, body, x, y, vx, vy
pub fn write_trajectory<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(writer, "frame,time,body,x,y,vx,vy")?;

    for s in samples {
        writeln!(
            writer,
            "{},{:.4},{},{:.6},{:.6},{:.6},{:.6}",
            s.frame,
            s.time,
            escape_field(&s.body),
            s.state.pos.x, s.state.pos.y,
            s.state.vel.x, s.state.vel.y,
        )?;
    }

    Ok(())
}

/// Quote a field containing a separator, quote or line break; inner quotes
/// are doubled.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write trajectory samples to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, samples)?;
    file.flush()
}
