use std::fmt;

use crate::schema::Layout;

/// Statistics from a completed write operation
#[derive(Debug, Clone)]
pub struct WriterStats {
    /// Layout of the container
    pub layout: Layout,
    /// Number of scans written
    pub scans_written: usize,
    /// Total number of peaks written
    pub peaks_written: usize,
    /// Physical rows written (peaks plus marker rows on the long layout)
    pub rows_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Total file size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} scans ({} peaks) as {} {} rows in {} row groups ({} bytes)",
            self.scans_written,
            self.peaks_written,
            self.rows_written,
            self.layout,
            self.row_groups_written,
            self.file_size_bytes
        )
    }
}
