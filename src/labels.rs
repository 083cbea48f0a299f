use log::debug;
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::types::JSON_EXTENSION;
use crate::utils::{list_files_with_extension, read_and_parse_json};

/// Mapping from label to class id, in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl ClassList {
    /// Build a class list from a label sequence that may contain duplicates.
    /// Each label gets the position of its first occurrence among distinct labels.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut class_list = ClassList::default();
        for label in labels {
            class_list.insert(label.as_ref());
        }
        class_list
    }

    /// Add a label if it is new and return its id.
    pub fn insert(&mut self, label: &str) -> usize {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.names.len();
        self.names.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        id
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Labels ordered by class id.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Gather the label of every shape in every JSON file of `dirname`.
/// Files are visited in sorted order and the result is not deduplicated.
pub fn collect_labels(dirname: &Path) -> Result<Vec<String>> {
    let mut labels = Vec::new();
    for json_path in list_files_with_extension(dirname, JSON_EXTENSION)? {
        let annotation = read_and_parse_json(&json_path)?;
        debug!(
            "{}: {} shapes",
            json_path.display(),
            annotation.shapes.len()
        );
        labels.extend(annotation.shapes.into_iter().map(|shape| shape.label));
    }
    Ok(labels)
}
