//! The response sheet, stored as a CSV file with a header row.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::survey::*;

pub struct CsvSheet {
    path: PathBuf,
    header: Vec<String>,
}

impl CsvSheet {
    /// The file does not need to exist: it is created with the header of the
    /// layout on the first append.
    pub fn new(path: &Path, layout: RowLayout) -> CsvSheet {
        CsvSheet {
            path: path.to_path_buf(),
            header: layout.header(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_empty(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(m) => m.len() == 0,
            Err(_) => true,
        }
    }

    /// True when the file has content but its last line is not terminated,
    /// which happens after an edit in a spreadsheet or a text editor.
    fn lacks_final_newline(&self) -> Result<bool, TableFailure> {
        if self.is_empty() {
            return Ok(false);
        }
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

impl RemoteTable for CsvSheet {
    fn read_all(&self) -> Result<Vec<RawRow>, TableFailure> {
        if self.is_empty() {
            debug!("CsvSheet::read_all: {:?} is empty", self.path);
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let header: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();
        let mut res: Vec<RawRow> = Vec::new();
        for line_r in rdr.records() {
            let line = line_r?;
            let row: RawRow = header
                .iter()
                .cloned()
                .zip(line.iter().map(|s| s.to_string()))
                .collect();
            res.push(row);
        }
        debug!("CsvSheet::read_all: {:?}: {} rows", self.path, res.len());
        Ok(res)
    }

    fn append(&mut self, row: &[String]) -> Result<(), TableFailure> {
        let write_header = self.is_empty();
        let fix_newline = self.lacks_final_newline()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fix_newline {
            debug!("CsvSheet::append: {:?}: terminating the last line", self.path);
            file.write_all(b"\n")?;
        }
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if write_header {
            info!("CsvSheet::append: creating {:?}", self.path);
            wtr.write_record(&self.header)?;
        }
        wtr.write_record(row)?;
        wtr.flush()?;
        Ok(())
    }
}
