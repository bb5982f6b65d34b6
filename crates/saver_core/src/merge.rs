//! Format conversion by deep merge: an old save's values are poured into
//! the shape of a template save, so fields the old format never had keep
//! their template defaults.

use indexmap::IndexMap;

use crate::value::SaveValue;

/// Merge `old` into a deep copy of `template`. Neither input is mutated.
///
/// Rules, applied per key of `old`: null overwrites; a list replaces the
/// template's list, except that table elements are shallow-merged over
/// the template element at the same index; tables recurse; scalars
/// overwrite. Template keys `old` never touches keep their values and
/// their position. When either input is not a table there are no keys to
/// merge and the template copy is returned unchanged.
pub fn merge_into_template(old: &SaveValue, template: &SaveValue) -> SaveValue {
    match (old, template) {
        (SaveValue::Table(old_table), SaveValue::Table(template_table)) => {
            SaveValue::Table(merge_tables(old_table, template_table))
        }
        _ => template.clone(),
    }
}

fn merge_tables(
    old: &IndexMap<String, SaveValue>,
    template: &IndexMap<String, SaveValue>,
) -> IndexMap<String, SaveValue> {
    let mut merged = template.clone();

    for (key, old_value) in old {
        let value = match old_value {
            SaveValue::Null => SaveValue::Null,
            SaveValue::List(items) => {
                let template_items = match template.get(key) {
                    Some(SaveValue::List(items)) => items.as_slice(),
                    _ => &[],
                };
                SaveValue::List(
                    items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| merge_list_element(item, template_items.get(index)))
                        .collect(),
                )
            }
            SaveValue::Table(old_sub) => {
                let merged_sub = match template.get(key) {
                    Some(SaveValue::Table(template_sub)) => merge_tables(old_sub, template_sub),
                    _ => merge_tables(old_sub, &IndexMap::new()),
                };
                SaveValue::Table(merged_sub)
            }
            scalar => scalar.clone(),
        };
        merged.insert(key.clone(), value);
    }

    merged
}

/// Old list elements win wholesale, except tables, whose fields overlay a
/// copy of the template element at the same index.
fn merge_list_element(item: &SaveValue, template_item: Option<&SaveValue>) -> SaveValue {
    match (item, template_item) {
        (SaveValue::Table(item_table), Some(SaveValue::Table(template_table))) => {
            let mut overlaid = template_table.clone();
            for (key, value) in item_table {
                overlaid.insert(key.clone(), value.clone());
            }
            SaveValue::Table(overlaid)
        }
        _ => item.clone(),
    }
}
