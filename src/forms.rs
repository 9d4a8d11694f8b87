use axum::extract::Multipart;
use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::{
    error::AppError,
    models::split_list,
    storage::{StorageService, StoredFile},
};

/// MultipartForm
///
/// A parsed `multipart/form-data` body. Text parts are kept (a field may
/// repeat), file parts have already been written through the storage service
/// and are remembered by field name.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, StoredFile>,
}

impl MultipartForm {
    /// parse
    ///
    /// Drains the multipart stream. File parts are only accepted for the
    /// names in `file_fields`; a file under any other name is a 400. Parts
    /// with an empty filename or body are the browser's "no file chosen" and
    /// are skipped.
    pub async fn parse(
        mut multipart: Multipart,
        storage: &dyn StorageService,
        file_fields: &[&str],
    ) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(format!("Malformed form data: {}", e.body_text())))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    if !file_fields.contains(&name.as_str()) {
                        return Err(AppError::bad_request(format!("Unexpected field {}", name)));
                    }
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    if file_name.is_empty() || bytes.is_empty() {
                        continue;
                    }
                    let stored = storage.save(&name, &file_name, bytes).await?;
                    form.files.insert(name, stored);
                }
                None => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    let value = String::from_utf8_lossy(&bytes).into_owned();
                    form.fields.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }

    /// Adds a text value, as if the field had been submitted.
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Adds an already-stored file under `name`.
    pub fn with_file(mut self, name: &str, file: StoredFile) -> Self {
        self.files.insert(name.to_string(), file);
        self
    }

    /// First value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value submitted under a text field.
    pub fn texts(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// All values of a field, each split on commas. Covers both repeated
    /// checkboxes and a single comma separated input.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.texts(name).iter().flat_map(|v| split_list(v)).collect()
    }

    /// Value of a text field that must be present and non-blank.
    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::bad_request(format!("{} is required", name)))
    }

    pub fn file(&self, name: &str) -> Option<&StoredFile> {
        self.files.get(name)
    }

    pub fn file_url(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(|f| f.url.as_str())
    }

    /// URLs of `{prefix}{n}` file fields for each `n`; missing ones are empty.
    pub fn indexed_files(&self, prefix: &str, range: RangeInclusive<usize>) -> Vec<String> {
        range
            .map(|n| self.file_url(&format!("{}{}", prefix, n)).unwrap_or_default().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(field: &str) -> StoredFile {
        StoredFile {
            field: field.to_string(),
            path: format!("uploads/{}-1.png", field),
            url: format!("http://localhost:3000/uploads/{}-1.png", field),
            size: 3,
        }
    }

    #[test]
    fn indexed_files_keep_positions() {
        let form = MultipartForm::default()
            .with_file("pdf2", stored("pdf2"))
            .with_file("pdf4", stored("pdf4"));

        let pdfs = form.indexed_files("pdf", 1..=4);
        assert_eq!(pdfs.len(), 4);
        assert_eq!(pdfs[0], "");
        assert_eq!(pdfs[1], "http://localhost:3000/uploads/pdf2-1.png");
        assert_eq!(pdfs[3], "http://localhost:3000/uploads/pdf4-1.png");
    }

    #[test]
    fn list_merges_repeated_and_comma_values() {
        let form = MultipartForm::default()
            .with_text("categories", "Trending")
            .with_text("categories", "Luxury Project, Premium Project");
        assert_eq!(
            form.list("categories"),
            vec!["Trending", "Luxury Project", "Premium Project"]
        );
    }

    #[test]
    fn require_rejects_blank() {
        let form = MultipartForm::default().with_text("heading", "   ");
        assert!(matches!(form.require("heading"), Err(AppError::BadRequest(_))));
        assert!(matches!(form.require("about"), Err(AppError::BadRequest(_))));
    }
}
