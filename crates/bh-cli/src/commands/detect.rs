//! Detect command: which stores are readable right now.

use std::io::Write;

use anyhow::Result;
use bh_sources::{detect_sources, SourcePaths};

use super::util::emit;

pub fn run<W: Write>(writer: &mut W, paths: &SourcePaths) -> Result<()> {
    let report = detect_sources(paths);
    emit(writer, &report)
}
