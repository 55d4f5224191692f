//! Delimited flat-file round trip for `Table`. UTF-8, header row, the
//! delimiter is the producer's choice (the scraper writes tabs).

use std::path::Path;

use crate::error::TableError;
use crate::table::Table;

pub fn write_table(path: &Path, table: &Table, delimiter: u8) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_table(path: &Path, delimiter: u8) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // Short rows are padded; a row wider than the header means the
        // file is corrupt, since every producer writes a full grid.
        if row.len() > table.headers.len() {
            return Err(TableError::UnexpectedShape(format!(
                "record at line {} has {} fields for {} columns",
                record.position().map_or(0, |p| p.line()),
                row.len(),
                table.headers.len()
            )));
        }
        row.resize(table.headers.len(), String::new());
        table.rows.push(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_delimited_files_survive_a_round_trip() {
        let mut table = Table::new(vec!["Result".into(), "Opponent".into()]);
        table.rows.push(vec!["3".into(), "frodo42".into()]);
        table.rows.push(vec!["0".into(), "sam7".into()]);

        let path = std::env::temp_dir().join(format!(
            "league_harvest_flatfile_{}.csv",
            std::process::id()
        ));
        write_table(&path, &table, b'\t').unwrap();
        let back = read_table(&path, b'\t').unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, table);
    }

    #[test]
    fn records_wider_than_the_header_are_rejected() {
        let path = std::env::temp_dir().join(format!(
            "league_harvest_flatfile_wide_{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "Result\tOpponent\n3\tfrodo42\textra\n").unwrap();
        let err = read_table(&path, b'\t').unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, TableError::UnexpectedShape(_)));
    }
}
