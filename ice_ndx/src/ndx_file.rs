use std::{
    fs::File,
    io::{BufWriter, Write},
    num::ParseIntError,
    path::Path,
    str::FromStr,
};

use log::info;
use thiserror::Error;

use crate::groups::GroupSet;

/// Maximal number of indices per line
pub const NDX_LINE_WIDTH: usize = 15;

/// Errors related to reading and writing Gromacs index files
#[derive(Debug, Error)]
pub enum NdxError {
    #[error("group {0} not found")]
    NoGroup(String),

    #[error("index parse error in group {0}")]
    Parse(String, #[source] ParseIntError),

    #[error("zero index in group {0}, indices are 1-based")]
    ZeroIndex(String),

    #[error("indices before the first group header at line {0}")]
    NoHeader(usize),

    #[error("error reading ndx file {0}")]
    NdxIo(std::path::PathBuf, #[source] std::io::Error),

    #[error("error writing ndx file {0}")]
    NdxWrite(std::path::PathBuf, #[source] std::io::Error),
}

/// Representation of Gromacs index files.
///
/// Groups keep the order in which they were added or read.
/// Indices are stored 1-based, exactly as they appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NdxFile {
    groups: Vec<(String, Vec<usize>)>,
}

impl NdxFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group to the end of the file
    pub fn add_group(&mut self, name: impl Into<String>, indices: impl IntoIterator<Item = usize>) {
        self.groups.push((name.into(), indices.into_iter().collect()));
    }

    /// Reads and parses a Gromacs index file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, NdxError> {
        let path = path.as_ref();
        let ndx_str =
            std::fs::read_to_string(path).map_err(|e| NdxError::NdxIo(path.to_owned(), e))?;
        ndx_str.parse()
    }

    /// Writes all groups. Each group is a `[ name ]` header followed by
    /// lines of at most [NDX_LINE_WIDTH] indices and a blank separator line.
    pub fn write_to(&self, w: &mut impl Write) -> std::io::Result<()> {
        for (name, indices) in &self.groups {
            writeln!(w, "[ {name} ]")?;
            for line in indices.chunks(NDX_LINE_WIDTH) {
                for i in line {
                    write!(w, "{i} ")?;
                }
                writeln!(w)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Writes the file to disk overwriting existing file if any
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NdxError> {
        let path = path.as_ref();
        let err = |e| NdxError::NdxWrite(path.to_owned(), e);

        let mut w = BufWriter::new(File::create(path).map_err(err)?);
        self.write_to(&mut w).map_err(err)?;
        w.flush().map_err(err)?;

        info!(
            "Index file '{}' written ({} groups)",
            path.display(),
            self.groups.len()
        );
        Ok(())
    }

    /// Get an index group by name
    pub fn get_group(&self, name: impl AsRef<str>) -> Result<&[usize], NdxError> {
        let gr = name.as_ref();
        self.groups
            .iter()
            .find(|(n, _)| n == gr)
            .map(|(_, ind)| ind.as_slice())
            .ok_or_else(|| NdxError::NoGroup(gr.to_owned()))
    }

    /// Iterates over (name, indices) pairs in file order
    pub fn iter_groups(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups
            .iter()
            .map(|(n, ind)| (n.as_str(), ind.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromStr for NdxFile {
    type Err = NdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ndx = Self::new();

        for (line_no, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                // Start new group, empty groups are kept
                let group_name = line[1..line.len() - 1].trim().to_string();
                ndx.groups.push((group_name, Vec::new()));
            } else if let Some((group_name, numbers)) = ndx.groups.last_mut() {
                for tok in line.split_whitespace() {
                    let i = tok
                        .parse::<usize>()
                        .map_err(|e| NdxError::Parse(group_name.clone(), e))?;
                    if i == 0 {
                        return Err(NdxError::ZeroIndex(group_name.clone()));
                    }
                    numbers.push(i);
                }
            } else {
                return Err(NdxError::NoHeader(line_no + 1));
            }
        }

        Ok(ndx)
    }
}

impl From<&GroupSet> for NdxFile {
    fn from(set: &GroupSet) -> Self {
        let mut ndx = Self::new();
        for gr in set.iter() {
            ndx.add_group(gr.name(), gr.indices().iter().copied());
        }
        ndx
    }
}

//############################################################
//#  Tests
//############################################################
