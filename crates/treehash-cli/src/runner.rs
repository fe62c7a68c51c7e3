//! Per-file hashing and checksum verification.

use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use treehash_core::{CHUNK_SIZE, ChunkDigester, Digest, DigestPrimitive, TreeReducer};

use crate::output::{format_line, parse_line};
use crate::progress::{HashProgress, format_bytes, format_duration};

/// Options resolved from config and command line
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Write `<file> <millis>` to the diagnostic stream
    pub timing: bool,
    /// Draw a progress bar for multi-chunk inputs
    pub progress: bool,
    /// Continue after a failed input
    pub keep_going: bool,
}

/// Outcome of a hashing run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Inputs hashed successfully
    pub hashed: usize,
    /// Inputs that failed
    pub failed: usize,
    /// Inputs never attempted because the run halted
    pub skipped: usize,
}

impl RunSummary {
    /// True when every input was hashed
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Outcome of a check run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// Entries whose digest matched
    pub ok: usize,
    /// Entries whose digest did not match
    pub mismatched: usize,
    /// Entries whose file could not be read
    pub unreadable: usize,
    /// Lines that could not be parsed
    pub malformed: usize,
}

impl CheckSummary {
    /// True when every entry matched and every line parsed
    #[must_use]
    pub fn success(&self) -> bool {
        self.mismatched == 0 && self.unreadable == 0 && self.malformed == 0
    }
}

/// Drives the digester and reducer over a list of inputs
pub struct Runner<P: DigestPrimitive> {
    digester: ChunkDigester<P>,
    reducer: TreeReducer<P>,
    options: RunOptions,
}

impl<P: DigestPrimitive + Clone> Runner<P> {
    /// Create a runner over `primitive`
    pub fn new(primitive: P, options: RunOptions) -> Self {
        Self {
            digester: ChunkDigester::with_primitive(primitive.clone()),
            reducer: TreeReducer::with_primitive(primitive),
            options,
        }
    }

    /// Compute the root digest of one file
    ///
    /// # Errors
    ///
    /// Returns an error naming the file if it cannot be opened or read.
    pub fn hash_file(&mut self, name: &str) -> anyhow::Result<Digest> {
        let path = Path::new(name);
        let size = fs::metadata(path)
            .with_context(|| format!("cannot read {name}"))?
            .len();
        tracing::info!(file = name, size = %format_bytes(size), "hashing");

        let progress = if self.options.progress && size > CHUNK_SIZE as u64 {
            HashProgress::new(size, name)
        } else {
            HashProgress::hidden()
        };

        let leaves = match self
            .digester
            .digest_file_with_progress(path, |done| progress.update(done))
        {
            Ok(leaves) => leaves,
            Err(e) => {
                progress.abandon();
                return Err(e).with_context(|| format!("cannot read {name}"));
            }
        };
        progress.finish();

        Ok(self.reducer.reduce(&leaves))
    }

    /// Hash each input in order, writing `<hex> *<name>` lines to `out`.
    ///
    /// Failures are reported to `diag`. Without `keep_going` the run stops
    /// at the first failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` or `diag` fails.
    pub fn hash_files<O, D>(&mut self, files: &[String], out: &mut O, diag: &mut D) -> anyhow::Result<RunSummary>
    where
        O: Write,
        D: Write,
    {
        let mut summary = RunSummary::default();
        let run_started = Instant::now();

        for (index, name) in files.iter().enumerate() {
            let started = Instant::now();

            match self.hash_file(name) {
                Ok(root) => {
                    writeln!(out, "{}", format_line(&root, name))?;
                    if self.options.timing {
                        writeln!(diag, "{} {}", name, started.elapsed().as_millis())?;
                    }
                    summary.hashed += 1;
                }
                Err(e) => {
                    tracing::error!(file = name.as_str(), "{e:#}");
                    writeln!(diag, "treehash: {e:#}")?;
                    summary.failed += 1;

                    if !self.options.keep_going {
                        summary.skipped = files.len() - index - 1;
                        break;
                    }
                }
            }
        }

        out.flush()?;
        tracing::debug!(
            hashed = summary.hashed,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed = %format_duration(run_started.elapsed()),
            "run complete"
        );
        Ok(summary)
    }

    /// Verify every entry of a digest list file.
    ///
    /// Writes `<name>: OK` or `<name>: FAILED` per entry to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if `sumfile` cannot be read or writing fails.
    pub fn check<O, D>(&mut self, sumfile: &Path, out: &mut O, diag: &mut D) -> anyhow::Result<CheckSummary>
    where
        O: Write,
        D: Write,
    {
        let contents = fs::read_to_string(sumfile)
            .with_context(|| format!("cannot read digest list {}", sumfile.display()))?;
        let mut summary = CheckSummary::default();

        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let entry = match parse_line(line) {
                Ok(entry) => entry,
                Err(reason) => {
                    tracing::warn!(line = line_no + 1, %reason, "malformed digest line");
                    writeln!(
                        diag,
                        "treehash: {}:{}: improperly formatted line: {reason}",
                        sumfile.display(),
                        line_no + 1
                    )?;
                    summary.malformed += 1;
                    continue;
                }
            };

            match self.hash_file(&entry.name) {
                Ok(root) if root == entry.digest => {
                    writeln!(out, "{}: OK", entry.name)?;
                    summary.ok += 1;
                }
                Ok(_) => {
                    writeln!(out, "{}: FAILED", entry.name)?;
                    summary.mismatched += 1;
                }
                Err(e) => {
                    writeln!(diag, "treehash: {e:#}")?;
                    writeln!(out, "{}: FAILED open or read", entry.name)?;
                    summary.unreadable += 1;
                }
            }
        }

        out.flush()?;
        Ok(summary)
    }
}
