use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::parser::Record;

pub const HEADER: [&str; 3] = ["Name", "Designation", "Company"];

/// Write records as CSV with a `Name,Designation,Company` header.
///
/// Rows go to a temp file next to `path` which is renamed into place only
/// once everything is flushed; a failed write leaves no file behind.
pub fn write_table(path: &Path, records: &[Record]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file());
        writer.write_record(HEADER)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
