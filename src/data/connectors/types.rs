use std::fmt;

/// Schema report for a loaded table, in the spirit of a dataframe `info()` dump
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<ColumnStats>,
    pub estimated_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub name: String,
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
}

impl TableSummary {
    /// Column count per dtype, in first-seen order
    pub fn dtype_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for col in &self.columns {
            match counts.iter_mut().find(|(dtype, _)| *dtype == col.dtype) {
                Some((_, n)) => *n += 1,
                None => counts.push((col.dtype.clone(), 1)),
            }
        }
        counts
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {} entries", self.num_rows)?;
        writeln!(f, "Data columns (total {} columns):", self.num_columns)?;

        let name_width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        writeln!(
            f,
            " {:>3}  {:<name_width$}  {:<16}  {:>10}  {}",
            "#", "Column", "Non-Null Count", "Null Count", "Dtype"
        )?;
        writeln!(
            f,
            " {:>3}  {:<name_width$}  {:<16}  {:>10}  {}",
            "---", "------", "--------------", "----------", "-----"
        )?;
        for (i, col) in self.columns.iter().enumerate() {
            writeln!(
                f,
                " {:>3}  {:<name_width$}  {:<16}  {:>10}  {}",
                i,
                col.name,
                format!("{} non-null", col.non_null_count),
                col.null_count,
                col.dtype
            )?;
        }

        let dtypes: Vec<String> = self
            .dtype_counts()
            .into_iter()
            .map(|(dtype, n)| format!("{}({})", dtype, n))
            .collect();
        writeln!(f, "dtypes: {}", dtypes.join(", "))?;
        write!(f, "memory usage: {}", format_bytes(self.estimated_bytes))
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
