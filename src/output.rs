// src/output.rs
use crate::analytics::sweep::SweepPoint;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write sweep rows as `<input_name>,a,m,<value_name>`
pub fn write_sweep_to_csv<P: AsRef<Path>>(
    path: P,
    input_name: &str,
    value_name: &str,
    points: &[SweepPoint],
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{},a,m,{}", input_name, value_name)?;
    for p in points {
        writeln!(file, "{},{},{},{}", p.input, p.a, p.m, p.value)?;
    }
    file.flush()
}

pub fn write_summary_to_csv<P: AsRef<Path>>(path: P, summary_data: &[(&str, String)]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    file.flush()
}
