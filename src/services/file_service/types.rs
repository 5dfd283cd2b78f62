use crate::entities::files;
use crate::utils::validation::FileKind;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A file's metadata together with its tag set.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    pub kind: FileKind,
    pub size: i64,
    pub path: String,
    /// Sorted, without duplicates
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    pub(crate) fn from_model(model: files::Model, tags: Vec<String>) -> Self {
        let kind = model.kind.parse().unwrap_or_else(|e| {
            tracing::warn!("File {} has {}, serving it as an image", model.id, e);
            FileKind::Image
        });

        Self {
            id: model.id,
            name: model.name,
            folder_id: model.folder_id,
            kind,
            size: model.size,
            path: model.path,
            tags,
            created_at: model.created_at,
        }
    }
}

/// Trims tag ids, drops blanks and duplicates.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        assert_eq!(
            normalize_tags(["b", " a ", "", "b", "c"]),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(normalize_tags(Vec::<String>::new()).is_empty());
    }
}
