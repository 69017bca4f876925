//! The remote tabular store that holds the responses.
//!
//! The store is append-only and can only be queried by reading everything.
//! Both operations may fail for reasons outside of our control (network,
//! credentials), which is why they return a boxed error.

use std::cell::Cell;
use std::collections::HashMap;

use log::debug;

/// One stored row, as a mapping from column name to cell content.
/// Column names are not normalized.
pub type RawRow = HashMap<String, String>;

pub type TableFailure = Box<dyn std::error::Error + Send + Sync>;

pub trait RemoteTable {
    /// Returns every stored row, in storage order.
    fn read_all(&self) -> Result<Vec<RawRow>, TableFailure>;

    /// Appends one row. The values are positional, see [`crate::RowLayout`].
    fn append(&mut self, row: &[String]) -> Result<(), TableFailure>;
}

/// A table that lives in memory.
///
/// It is used for tests and for embedding the library in a process that
/// manages persistence itself. It can be told to fail the next appends or
/// reads to exercise the failure paths.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    failing_appends: u32,
    failing_reads: Cell<u32>,
    append_calls: u32,
    read_calls: Cell<u32>,
}

impl MemoryTable {
    pub fn new(header: Vec<String>) -> MemoryTable {
        MemoryTable {
            header,
            rows: Vec::new(),
            failing_appends: 0,
            failing_reads: Cell::new(0),
            append_calls: 0,
            read_calls: Cell::new(0),
        }
    }

    /// The next `count` appends will fail.
    pub fn fail_next_appends(&mut self, count: u32) {
        self.failing_appends = count;
    }

    /// The next `count` reads will fail.
    pub fn fail_next_reads(&mut self, count: u32) {
        self.failing_reads.set(count);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn append_calls(&self) -> u32 {
        self.append_calls
    }

    pub fn read_calls(&self) -> u32 {
        self.read_calls.get()
    }
}

impl RemoteTable for MemoryTable {
    fn read_all(&self) -> Result<Vec<RawRow>, TableFailure> {
        self.read_calls.set(self.read_calls.get() + 1);
        if self.failing_reads.get() > 0 {
            self.failing_reads.set(self.failing_reads.get() - 1);
            return Err("memory table: read refused".into());
        }
        let res: Vec<RawRow> = self
            .rows
            .iter()
            .map(|row| {
                self.header
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<RawRow>()
            })
            .collect();
        debug!("MemoryTable::read_all: {} rows", res.len());
        Ok(res)
    }

    fn append(&mut self, row: &[String]) -> Result<(), TableFailure> {
        self.append_calls += 1;
        if self.failing_appends > 0 {
            self.failing_appends -= 1;
            return Err("memory table: append refused".into());
        }
        self.rows.push(row.to_vec());
        Ok(())
    }
}
