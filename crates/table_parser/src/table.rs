use scraper::{Html, Selector};

use crate::error::TableError;

fn selector(s: &str) -> Result<Selector, TableError> {
    Selector::parse(s).map_err(|_| TableError::Selector(s.to_string()))
}

/// A parsed tabular record set: named columns, string cells.
/// Everything stays stringly typed until it hits a flat file; numeric
/// columns are produced by the transforms that know their meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Extract the first `<table>` from an HTML fragment. The first row
    /// (or `<th>` row) becomes the header; short rows are padded so column
    /// access stays in bounds.
    pub fn from_html(fragment: &str) -> Result<Self, TableError> {
        let doc = Html::parse_fragment(fragment);
        let table_sel = selector("table")?;
        let row_sel = selector("tr")?;
        let cell_sel = selector("th, td")?;

        let table = doc
            .select(&table_sel)
            .next()
            .ok_or(TableError::MissingTable)?;

        let mut headers: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for tr in table.select(&row_sel) {
            let cells: Vec<String> = tr
                .select(&cell_sel)
                .map(|c| c.text().collect::<String>().trim().to_string())
                .collect();
            if cells.is_empty() {
                continue;
            }
            if headers.is_empty() {
                headers = cells;
            } else {
                rows.push(cells);
            }
        }

        if headers.is_empty() {
            return Err(TableError::MissingTable);
        }
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Ok(Self { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of a named column.
    pub fn col(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn has_col(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Keep only the listed columns, in list order. Absent names are
    /// skipped rather than errors, matching how the profile pages vary.
    pub fn keep_columns(&mut self, names: &[&str]) {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|n| self.headers.iter().position(|h| h == n))
            .collect();
        self.headers = indices.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            *row = indices.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Drop the listed columns wherever present.
    pub fn drop_columns(&mut self, names: &[&str]) {
        for name in names {
            if let Some(idx) = self.headers.iter().position(|h| h == name) {
                self.headers.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
            }
        }
    }

    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(h) = self.headers.iter_mut().find(|h| *h == from) {
            *h = to.to_string();
        }
    }

    /// Remove a column and return its values.
    pub fn remove_column(&mut self, name: &str) -> Result<Vec<String>, TableError> {
        let idx = self.col(name)?;
        self.headers.remove(idx);
        Ok(self
            .rows
            .iter_mut()
            .map(|row| row.remove(idx))
            .collect())
    }

    /// Append a column. `values` must cover every row.
    pub fn push_column(
        &mut self,
        name: &str,
        values: Vec<String>,
    ) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::UnexpectedShape(format!(
                "column {:?} has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Append a column holding the same value in every row.
    pub fn push_constant_column(&mut self, name: &str, value: &str) {
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }

    pub fn retain_rows<F: FnMut(&[String]) -> bool>(&mut self, mut keep: F) {
        self.rows.retain(|row| keep(row));
    }

    /// Rewrite every cell of a column through a fallible transform.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<(), TableError>
    where
        F: FnMut(&str) -> Result<String, TableError>,
    {
        let idx = self.col(name)?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx])?;
        }
        Ok(())
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<String>, TableError> {
        let idx = self.col(name)?;
        Ok(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// Append all columns of `other` by row index. Row counts must match;
    /// this is the join the season category cache relies on.
    pub fn join_by_index(&mut self, other: &Table) -> Result<(), TableError> {
        if other.rows.len() != self.rows.len() {
            return Err(TableError::UnexpectedShape(format!(
                "joining {} rows onto {} rows",
                other.rows.len(),
                self.rows.len()
            )));
        }
        self.headers.extend(other.headers.iter().cloned());
        for (row, extra) in self.rows.iter_mut().zip(&other.rows) {
            row.extend(extra.iter().cloned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div><table>
            <tr><th>Name</th><th>Score</th></tr>
            <tr><td> alice </td><td>3</td></tr>
            <tr><td>bob</td></tr>
        </table></div>"#;

    #[test]
    fn parses_headers_and_pads_short_rows() {
        let t = Table::from_html(SAMPLE).unwrap();
        assert_eq!(t.headers, vec!["Name", "Score"]);
        assert_eq!(t.rows, vec![vec!["alice", "3"], vec!["bob", ""]]);
    }

    #[test]
    fn missing_table_is_an_error() {
        assert!(matches!(
            Table::from_html("<div>no table here</div>"),
            Err(TableError::MissingTable)
        ));
    }

    #[test]
    fn keep_reorders_and_drop_removes() {
        let mut t = Table::from_html(SAMPLE).unwrap();
        t.keep_columns(&["Score", "Name", "Absent"]);
        assert_eq!(t.headers, vec!["Score", "Name"]);
        assert_eq!(t.rows[0], vec!["3", "alice"]);
        t.drop_columns(&["Score"]);
        assert_eq!(t.headers, vec!["Name"]);
        assert_eq!(t.rows[1], vec!["bob"]);
    }

    #[test]
    fn join_by_index_requires_matching_row_count() {
        let mut left = Table::from_html(SAMPLE).unwrap();
        let mut right = Table::new(vec!["Extra".into()]);
        right.rows.push(vec!["x".into()]);
        assert!(left.join_by_index(&right).is_err());

        right.rows.push(vec!["y".into()]);
        left.join_by_index(&right).unwrap();
        assert_eq!(left.headers, vec!["Name", "Score", "Extra"]);
        assert_eq!(left.rows[1], vec!["bob", "", "y"]);
    }
}
