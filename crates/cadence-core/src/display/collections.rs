//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::dates;
use crate::models::PlanItem;

/// Newtype wrapper for displaying a window of plan items grouped by day.
///
/// Items are expected in fetch order (day ascending, then id); each day gets
/// a header with its weekday name. Handles empty collections gracefully.
pub struct PlanItems(pub Vec<PlanItem>);

impl PlanItems {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of items in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, PlanItem> {
        self.0.iter()
    }
}

impl IntoIterator for PlanItems {
    type Item = PlanItem;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlanItems {
    type Item = &'a PlanItem;
    type IntoIter = std::slice::Iter<'a, PlanItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plan items found.");
        }

        let mut current_day = None;
        for item in &self.0 {
            if current_day != Some(item.for_date) {
                writeln!(
                    f,
                    "{} ({})",
                    item.for_date,
                    dates::day_name(item.for_date)
                )?;
                current_day = Some(item.for_date);
            }
            writeln!(
                f,
                "  [{}] {} #{}{}",
                if item.is_approved { "x" } else { " " },
                item.kind.as_str(),
                item.id,
                if item.payload.is_null() {
                    String::new()
                } else {
                    format!(" {}", item.payload)
                },
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;
    use crate::models::ItemKind;

    #[test]
    fn test_empty_collection() {
        let items = PlanItems(Vec::new());
        assert!(items.is_empty());
        assert_eq!(format!("{items}"), "No plan items found.\n");
    }

    #[test]
    fn test_items_grouped_by_day() {
        let items = PlanItems(vec![
            PlanItem {
                id: 1,
                subject_id: 1,
                for_date: date(2025, 3, 3),
                kind: ItemKind::Meal,
                payload: json!({"calories": 600}),
                is_approved: true,
            },
            PlanItem {
                id: 2,
                subject_id: 1,
                for_date: date(2025, 3, 3),
                kind: ItemKind::Workout,
                payload: serde_json::Value::Null,
                is_approved: false,
            },
        ]);

        let output = format!("{items}");
        // One day header, two item lines.
        assert_eq!(output.matches("2025-03-03").count(), 1);
        assert!(output.contains("Monday"));
        assert!(output.contains("[x] meal #1"));
        assert!(output.contains("[ ] workout #2"));
    }
}
