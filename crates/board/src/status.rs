//! Resolution of a desired status label to a concrete Status option.

use crate::{BoardError, FieldId, FieldIndex, OptionId};

/// Name of the field that tracks an item's workflow state.
pub const STATUS_FIELD: &str = "Status";

/// A resolved Status assignment: which field to set and to which option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSelection {
    pub field_id: FieldId,
    pub option_id: OptionId,
    /// Name of the matched option as declared on the board.
    pub option_name: String,
}

/// Finds the Status option whose name contains `label`, ignoring case.
///
/// Option names on boards often carry decoration (`"✅ Done"`), hence the
/// substring match. The first matching option in declared order wins; a
/// second match is not reported.
///
/// Returns `Err(MissingStatusField)` when the board has no "Status" field and
/// `Ok(None)` when the field exists but no option matches.
pub fn resolve_status(
    fields: &FieldIndex,
    label: &str,
) -> Result<Option<StatusSelection>, BoardError> {
    let field = fields
        .get(STATUS_FIELD)
        .ok_or(BoardError::MissingStatusField)?;

    let wanted = label.to_lowercase();
    let selection = field
        .options
        .iter()
        .find(|option| option.name.to_lowercase().contains(&wanted))
        .map(|option| StatusSelection {
            field_id: field.id.clone(),
            option_id: option.id.clone(),
            option_name: option.name.clone(),
        });

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawField, RawFieldOption};

    fn board_with_status(options: &[(&str, &str)]) -> FieldIndex {
        FieldIndex::from_raw(vec![RawField {
            id: Some("F_status".into()),
            name: Some(STATUS_FIELD.into()),
            options: Some(
                options
                    .iter()
                    .map(|(id, name)| RawFieldOption {
                        id: Some(id.to_string()),
                        name: Some(name.to_string()),
                    })
                    .collect(),
            ),
        }])
    }

    #[test]
    fn matches_decorated_option_case_insensitively() {
        let fields = board_with_status(&[
            ("o1", "Todo"),
            ("o2", "In Progress"),
            ("o3", "✅ Done"),
        ]);

        let selection = resolve_status(&fields, "done").unwrap().unwrap();
        assert_eq!(selection.option_id.as_str(), "o3");
        assert_eq!(selection.option_name, "✅ Done");
        assert_eq!(selection.field_id.as_str(), "F_status");
    }

    #[test]
    fn unmatched_label_is_not_found() {
        let fields = board_with_status(&[
            ("o1", "Todo"),
            ("o2", "In Progress"),
            ("o3", "✅ Done"),
        ]);
        assert_eq!(resolve_status(&fields, "missing").unwrap(), None);
    }

    #[test]
    fn first_substring_match_in_declared_order_wins() {
        let fields = board_with_status(&[("o1", "Review requested"), ("o2", "In review")]);
        let selection = resolve_status(&fields, "REVIEW").unwrap().unwrap();
        assert_eq!(selection.option_id.as_str(), "o1");
    }

    #[test]
    fn missing_status_field_is_an_error() {
        let fields = FieldIndex::from_raw(vec![RawField {
            id: Some("F1".into()),
            name: Some("Priority".into()),
            options: None,
        }]);
        assert!(matches!(
            resolve_status(&fields, "Todo"),
            Err(BoardError::MissingStatusField)
        ));
    }

    #[test]
    fn status_field_without_options_matches_nothing() {
        let fields = board_with_status(&[]);
        assert_eq!(resolve_status(&fields, "Todo").unwrap(), None);
    }
}
