pub mod donor;
pub mod shell;

pub use donor::*;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

// The backing file name used when no other path is given.
pub const DEFAULT_FILE: &str = "banco_sangre.txt";

// Registry is the single source of truth for the donor roster.
// It holds the whole roster in memory and persists it as a flat text file,
// one comma-delimited donor per line. The file is read once on open and
// rewritten in full after every mutation. Small rosters only.
#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    donors: Vec<Donor>,
}

impl Registry {
    // Open the registry backed by the given file, loading all donors.
    // A missing file is not an error; the registry starts empty and the
    // file is created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Registry> {
        let path = path.into();
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No data file at {path:?}, a new one will be created");
                return Ok(Registry {
                    path,
                    donors: vec![],
                });
            }
            Err(e) => return Err(e).with_context(|| format!("Open {path:?}")),
        };
        let mut donors = vec![];
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match Donor::from_line(&line) {
                Some(donor) => donors.push(donor),
                // The file has no escaping, so a stray delimiter or a
                // truncated line shifts the field count. Drop the line.
                None => log::warn!("Skipping malformed line: {line}"),
            }
        }
        log::debug!("Loaded {} donors from {path:?}", donors.len());
        Ok(Registry { path, donors })
    }

    // Rewrite the backing file from the in-memory roster.
    fn save(&self) -> Result<()> {
        log::debug!("Saving {} donors to {:?}", self.donors.len(), self.path);
        let file = fs::File::create(&self.path).with_context(|| format!("Open {:?}", self.path))?;
        let mut w = BufWriter::new(file);
        for donor in &self.donors {
            let line = donor.to_string();
            if line.matches(DELIMITER).count() != FIELDS - 1 {
                log::warn!("Field with embedded {DELIMITER:?} will not reload: {line}");
            }
            writeln!(w, "{line}")?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn donors(&self) -> &[Donor] {
        &self.donors
    }

    // Append a donor and persist. Duplicate names are allowed.
    pub fn add(&mut self, donor: Donor) -> Result<()> {
        self.donors.push(donor);
        self.save()
    }

    // Find the first donor whose name matches, ignoring case.
    // Exact match only, no partial matching.
    pub fn find(&self, name: &str) -> Option<&Donor> {
        let name = name.to_lowercase();
        self.donors.iter().find(|d| d.name.to_lowercase() == name)
    }

    // Replace every field except the name on the first donor matching `name`.
    // Returns Ok(false) without touching the file if no donor matches.
    pub fn edit(&mut self, name: &str, update: DonorUpdate) -> Result<bool> {
        let name = name.to_lowercase();
        let Some(donor) = self.donors.iter_mut().find(|d| d.name.to_lowercase() == name) else {
            return Ok(false);
        };
        donor.apply(update);
        self.save()?;
        Ok(true)
    }

    // Count donors per blood type, keyed by "{group} {rh}".
    // Keys compare exactly; "o +" and "O +" are distinct types.
    pub fn count_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for donor in &self.donors {
            *counts.entry(donor.blood_type()).or_insert(0) += 1;
        }
        counts
    }
}
