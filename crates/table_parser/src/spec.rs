use crate::table::Table;

/// Declarative column transform for one page type: which columns to keep
/// (empty = all), which to drop, and header renames. Applied in that order.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub keep: &'static [&'static str],
    pub drop: &'static [&'static str],
    pub rename: &'static [(&'static str, &'static str)],
}

impl TableSpec {
    pub fn apply(&self, mut table: Table) -> Table {
        if !self.keep.is_empty() {
            table.keep_columns(self.keep);
        }
        table.drop_columns(self.drop);
        for (from, to) in self.rename {
            table.rename_column(from, to);
        }
        table
    }
}
