// ── Local reordering with dense renumbering ──
//
// `display_order` is a dense 0..n-1 sequence per property. Moves happen
// locally first, renumber the whole list, and report the single index
// change to persist. The backend renumbers transactionally on its side.

use strum::{Display, EnumString};

use crate::model::{EntityId, Ordered};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
}

/// The change to persist after a local move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    pub id: EntityId,
    pub new_index: u32,
}

/// Move `id` one slot up or down. Returns `None` for an unknown id or a
/// move past either end (the list is left untouched then).
pub fn move_item<T: Ordered>(items: &mut [T], id: &EntityId, direction: Direction) -> Option<Reorder> {
    items.sort_by_key(Ordered::display_order);
    let from = position(items, id)?;
    let to = match direction {
        Direction::Up => from.checked_sub(1)?,
        Direction::Down => Some(from + 1).filter(|&i| i < items.len())?,
    };
    items.swap(from, to);
    renumber(items);
    Some(Reorder {
        id: id.clone(),
        new_index: index_u32(to),
    })
}

/// Drag-and-drop: move `id` to `index` (clamped to the last slot).
/// Returns `None` for an unknown id or when nothing moves.
pub fn move_to<T: Ordered>(items: &mut [T], id: &EntityId, index: usize) -> Option<Reorder> {
    items.sort_by_key(Ordered::display_order);
    let from = position(items, id)?;
    let to = index.min(items.len().saturating_sub(1));
    if from == to {
        return None;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    renumber(items);
    Some(Reorder {
        id: id.clone(),
        new_index: index_u32(to),
    })
}

/// Rewrite `display_order` as 0..n-1 in slice order. Returns `true` if
/// anything changed.
pub fn renumber<T: Ordered>(items: &mut [T]) -> bool {
    let mut changed = false;
    for (i, item) in items.iter_mut().enumerate() {
        let order = index_u32(i);
        if item.display_order() != order {
            item.set_display_order(order);
            changed = true;
        }
    }
    changed
}

fn position<T: Ordered>(items: &[T], id: &EntityId) -> Option<usize> {
    items.iter().position(|i| i.id() == id)
}

fn index_u32(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Activity;
    use pretty_assertions::assert_eq;

    fn list(titles: &[&str]) -> Vec<Activity> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                serde_json::from_value(serde_json::json!({
                    "id": i + 1,
                    "title": t,
                    "display_order": i,
                }))
                .unwrap()
            })
            .collect()
    }

    fn view(items: &[Activity]) -> Vec<(String, u32)> {
        items
            .iter()
            .map(|a| (a.title.clone(), a.display_order))
            .collect()
    }

    #[test]
    fn moving_b_up_swaps_with_a() {
        let mut items = list(&["A", "B", "C"]);
        let change = move_item(&mut items, &EntityId::from(2), Direction::Up).unwrap();

        assert_eq!(
            view(&items),
            [("B".into(), 0), ("A".into(), 1), ("C".into(), 2)]
        );
        assert_eq!(
            change,
            Reorder {
                id: EntityId::from(2),
                new_index: 0
            }
        );
    }

    #[test]
    fn moves_past_the_ends_are_rejected() {
        let mut items = list(&["A", "B"]);
        assert!(move_item(&mut items, &EntityId::from(1), Direction::Up).is_none());
        assert!(move_item(&mut items, &EntityId::from(2), Direction::Down).is_none());
        assert!(move_item(&mut items, &EntityId::from(9), Direction::Down).is_none());
        assert_eq!(view(&items), [("A".into(), 0), ("B".into(), 1)]);
    }

    #[test]
    fn drag_to_front_and_back() {
        let mut items = list(&["A", "B", "C", "D"]);
        let change = move_to(&mut items, &EntityId::from(4), 0).unwrap();
        assert_eq!(change.new_index, 0);
        assert_eq!(
            items.iter().map(|a| a.title.as_str()).collect::<Vec<_>>(),
            ["D", "A", "B", "C"]
        );

        let change = move_to(&mut items, &EntityId::from(4), 99).unwrap();
        assert_eq!(change.new_index, 3);
        assert_eq!(
            view(&items),
            [
                ("A".into(), 0),
                ("B".into(), 1),
                ("C".into(), 2),
                ("D".into(), 3)
            ]
        );
    }

    #[test]
    fn renumber_closes_gaps() {
        let mut items = list(&["A", "B", "C"]);
        items[1].display_order = 7;
        items[2].display_order = 9;
        assert!(renumber(&mut items));
        assert!(!renumber(&mut items));
        assert_eq!(items[2].display_order, 2);
    }
}
