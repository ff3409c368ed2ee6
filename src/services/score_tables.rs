use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::{Component, ComponentScoreRow},
};

/// A component score table keyed by movie_id
#[derive(Debug, Clone)]
pub struct ComponentTable {
    pub component: Component,
    pub path: PathBuf,
    pub rows: BTreeMap<i64, ComponentScoreRow>,
}

impl ComponentTable {
    /// Builds a table from parsed rows, rejecting repeated identifiers
    pub fn from_rows(
        component: Component,
        path: PathBuf,
        rows: impl IntoIterator<Item = ComponentScoreRow>,
    ) -> AppResult<Self> {
        let mut by_id = BTreeMap::new();
        for row in rows {
            let movie_id = row.movie_id;
            if by_id.insert(movie_id, row).is_some() {
                return Err(AppError::DuplicateIdentifier { movie_id, path });
            }
        }
        Ok(Self {
            component,
            path,
            rows: by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The four component tables of one merge run
#[derive(Debug, Clone)]
pub struct ComponentTables {
    pub content: ComponentTable,
    pub rating: ComponentTable,
    pub business: ComponentTable,
    pub time: ComponentTable,
}

impl ComponentTables {
    pub fn get(&self, component: Component) -> &ComponentTable {
        match component {
            Component::Content => &self.content,
            Component::Rating => &self.rating,
            Component::Business => &self.business,
            Component::Time => &self.time,
        }
    }

    /// Tables in `Component::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentTable> {
        [&self.content, &self.rating, &self.business, &self.time].into_iter()
    }
}

pub fn component_path(tables_dir: &Path, component: Component) -> PathBuf {
    tables_dir.join(component.file_name())
}

/// Locates and parses all four component tables
///
/// Every file is located before any is parsed, so a missing table is always
/// reported as such rather than masked by a parse error in another table.
pub fn load_component_tables(tables_dir: &Path) -> AppResult<ComponentTables> {
    for component in Component::ALL {
        let path = component_path(tables_dir, component);
        if !path.is_file() {
            return Err(AppError::MissingComponentFile { component, path });
        }
    }

    Ok(ComponentTables {
        content: read_component_table(tables_dir, Component::Content)?,
        rating: read_component_table(tables_dir, Component::Rating)?,
        business: read_component_table(tables_dir, Component::Business)?,
        time: read_component_table(tables_dir, Component::Time)?,
    })
}

/// Parses a single component table from the tables directory
pub fn read_component_table(tables_dir: &Path, component: Component) -> AppResult<ComponentTable> {
    let path = component_path(tables_dir, component);
    if !path.is_file() {
        return Err(AppError::MissingComponentFile { component, path });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)?;

    let rows = reader
        .deserialize::<ComponentScoreRow>()
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        component = %component,
        path = %path.display(),
        rows = rows.len(),
        "Read component table"
    );

    ComponentTable::from_rows(component, path, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_table(dir: &Path, component: Component, body: &str) {
        fs::write(component_path(dir, component), body).unwrap();
    }

    #[test]
    fn test_load_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        for component in Component::ALL {
            write_table(dir.path(), component, "movie_id,score\n1,0.5\n2,0.25\n");
        }

        let tables = load_component_tables(dir.path()).unwrap();
        assert_eq!(tables.time.len(), 2);
        assert_eq!(tables.get(Component::Rating).rows[&2].score, 0.25);
    }

    #[test]
    fn test_missing_table_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), Component::Content, "movie_id,score\n1,0.5\n");
        write_table(dir.path(), Component::Rating, "movie_id,score\n1,0.5\n");
        write_table(dir.path(), Component::Time, "movie_id,score\n1,0.5\n");

        let err = load_component_tables(dir.path()).unwrap_err();
        match err {
            AppError::MissingComponentFile { component, path } => {
                assert_eq!(component, Component::Business);
                assert!(path.ends_with("03_business_scores.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_table(
            dir.path(),
            Component::Content,
            "movie_id,score\n1,0.5\n1,0.7\n",
        );

        let err = read_component_table(dir.path(), Component::Content).unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentifier { movie_id: 1, .. }));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), Component::Time, "movie_id, score\n 4 , 0.1 \n");

        let table = read_component_table(dir.path(), Component::Time).unwrap();
        assert_eq!(table.rows[&4].score, 0.1);
    }
}
