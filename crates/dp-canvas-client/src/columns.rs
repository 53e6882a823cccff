//! Custom gradebook columns as a name-addressed key/value store.
//!
//! The tools reuse custom columns as ad hoc storage for workflow answers,
//! addressing them by title. A [`ColumnRegistry`] loads a course's column
//! list once and resolves names for subsequent reads and writes; values cross
//! the boundary as [`ColumnValue`] so sentinel markers stay an encoding
//! detail.

use dp_canvas_api::CustomColumn;
use dp_client_api::{CanvasApi, ClientApiError, ClientApiResult};
use dp_core::ColumnValue;

/// Find the id of the first column whose title matches exactly.
pub fn find_column_id(name: &str, columns: &[CustomColumn]) -> Option<u64> {
    columns.iter().find(|col| col.title == name).map(|col| col.id)
}

/// Name-addressed access to one course's custom columns.
pub struct ColumnRegistry<'a> {
    api: &'a dyn CanvasApi,
    course_id: u64,
    columns: Vec<CustomColumn>,
}

impl<'a> ColumnRegistry<'a> {
    /// Fetch the course's column list and build a registry over it.
    pub async fn load(api: &'a dyn CanvasApi, course_id: u64) -> ClientApiResult<Self> {
        let columns = api.list_custom_columns(course_id).await?;
        Ok(Self {
            api,
            course_id,
            columns,
        })
    }

    pub fn columns(&self) -> &[CustomColumn] {
        &self.columns
    }

    /// Resolve a column title to its id.
    pub fn find_column_id(&self, name: &str) -> Option<u64> {
        find_column_id(name, &self.columns)
    }

    fn require_column(&self, name: &str) -> ClientApiResult<u64> {
        self.find_column_id(name)
            .ok_or_else(|| ClientApiError::NotFound(format!("custom column '{}'", name)))
    }

    /// Read one user's entry in the named column. `Ok(None)` means the user
    /// has no entry at all; a present-but-empty string decodes to
    /// `Confirmed("")`.
    pub async fn get_entry(
        &self,
        name: &str,
        user_id: u64,
    ) -> ClientApiResult<Option<ColumnValue>> {
        let column_id = self.require_column(name)?;
        let entries = self.api.list_column_entries(self.course_id, column_id).await?;
        Ok(entries
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map(|entry| ColumnValue::decode(&entry.content)))
    }

    /// Overwrite one user's entry in the named column. Last writer wins.
    pub async fn put_entry(
        &self,
        name: &str,
        user_id: u64,
        value: &ColumnValue,
    ) -> ClientApiResult<()> {
        let column_id = self.require_column(name)?;
        self.api
            .put_column_entry(self.course_id, column_id, user_id, &value.encode())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_canvas_mock::MockCanvas;

    fn columns() -> Vec<CustomColumn> {
        ["Course_code", "Examiner", "Contact"]
            .iter()
            .enumerate()
            .map(|(i, title)| CustomColumn {
                id: i as u64 + 1,
                title: title.to_string(),
                position: Some(i as u32),
                hidden: false,
                read_only: false,
            })
            .collect()
    }

    #[test]
    fn lookup_returns_the_matching_column_id() {
        let columns = columns();
        assert_eq!(find_column_id("Examiner", &columns), Some(2));
    }

    #[test]
    fn lookup_of_missing_title_is_none() {
        assert_eq!(find_column_id("Nonexistent", &columns()), None);
    }

    #[tokio::test]
    async fn entry_roundtrip_preserves_sentinel_and_trims_whitespace() {
        let mock = MockCanvas::new();
        mock.add_custom_column(5, "Examiner").await;

        let registry = ColumnRegistry::load(&mock, 5).await.unwrap();
        let written = ColumnValue::decode("⚠⚠Jane Doe");
        registry.put_entry("Examiner", 1, &written).await.unwrap();

        let read = registry.get_entry("Examiner", 1).await.unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(read.encode(), "⚠⚠Jane Doe");
    }

    #[tokio::test]
    async fn absent_entry_reads_as_none() {
        let mock = MockCanvas::new();
        mock.add_custom_column(5, "Contact").await;

        let registry = ColumnRegistry::load(&mock, 5).await.unwrap();
        assert_eq!(registry.get_entry("Contact", 42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_column_is_a_not_found_error() {
        let mock = MockCanvas::new();
        let registry = ColumnRegistry::load(&mock, 5).await.unwrap();
        let err = registry.get_entry("Examiner", 1).await.unwrap_err();
        assert!(matches!(err, ClientApiError::NotFound(_)));
    }
}
