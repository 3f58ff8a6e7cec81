//! Name-keyed index of a board's single-select fields.

use std::collections::HashMap;

use tracing::debug;

use crate::{FieldDescriptor, FieldId, FieldOption, OptionId, RawField, RawFieldOption};

/// Field descriptors keyed by field name.
///
/// Names are case-sensitive. Built once per initialization and read-only
/// afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldIndex {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldIndex {
    /// Folds raw schema entries into an index.
    ///
    /// Entries without an id are skipped; they are field kinds this system
    /// does not model. When two entries share a name the later one wins.
    pub fn from_raw(raw: impl IntoIterator<Item = RawField>) -> Self {
        let mut fields = HashMap::new();

        for entry in raw {
            let Some(id) = entry.id.and_then(FieldId::new) else {
                debug!(name = ?entry.name, "skipping field without id");
                continue;
            };
            let name = entry.name.unwrap_or_default();
            let options = entry
                .options
                .unwrap_or_default()
                .into_iter()
                .filter_map(option_from_raw)
                .collect();

            fields.insert(name.clone(), FieldDescriptor { id, name, options });
        }

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the indexed field names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

fn option_from_raw(raw: RawFieldOption) -> Option<FieldOption> {
    Some(FieldOption {
        id: OptionId::new(raw.id?)?,
        name: raw.name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn raw(id: Option<&str>, name: &str, options: &[(&str, &str)]) -> RawField {
        RawField {
            id: id.map(str::to_string),
            name: Some(name.to_string()),
            options: Some(
                options
                    .iter()
                    .map(|(id, name)| RawFieldOption {
                        id: Some(id.to_string()),
                        name: Some(name.to_string()),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn empty_schema_gives_empty_index() {
        let index = FieldIndex::from_raw(Vec::new());
        assert!(index.is_empty());
    }

    #[test]
    fn entries_without_id_are_dropped() {
        let index = FieldIndex::from_raw(vec![
            RawField::default(),
            raw(None, "Iteration", &[]),
            raw(Some(""), "Blank", &[]),
            raw(Some("F1"), "Status", &[("o1", "Todo")]),
        ]);

        let names: BTreeSet<_> = index.names().collect();
        assert_eq!(names, BTreeSet::from(["Status"]));
        assert_eq!(index.get("Status").unwrap().options.len(), 1);
    }

    #[test]
    fn later_duplicate_wins() {
        let index = FieldIndex::from_raw(vec![
            raw(Some("F1"), "Status", &[("o1", "Todo")]),
            raw(Some("F2"), "Priority", &[]),
            raw(Some("F3"), "Status", &[("o9", "Done")]),
        ]);

        assert_eq!(index.len(), 2);
        let status = index.get("Status").unwrap();
        assert_eq!(status.id.as_str(), "F3");
        assert_eq!(status.options[0].name, "Done");
    }

    #[test]
    fn names_are_case_sensitive() {
        let index = FieldIndex::from_raw(vec![raw(Some("F1"), "status", &[])]);
        assert!(index.get("Status").is_none());
        assert!(index.get("status").is_some());
    }

    #[test]
    fn options_keep_declared_order_and_drop_id_less_entries() {
        let mut field = raw(Some("F1"), "Status", &[("o1", "Todo"), ("o2", "Done")]);
        field.options.as_mut().unwrap().insert(
            1,
            RawFieldOption {
                id: None,
                name: Some("ghost".into()),
            },
        );

        let index = FieldIndex::from_raw(vec![field]);
        let names: Vec<_> = index
            .get("Status")
            .unwrap()
            .options
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, ["Todo", "Done"]);
    }
}
