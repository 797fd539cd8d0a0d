/// Ordered collection engine.
///
/// Reorders items inside one sequence and moves items between sequences while
/// keeping every `position` field equal to the item's array index. All
/// indices are validated before anything is touched, so a failed call leaves
/// its inputs exactly as they were.
///
/// Destination indices use splice semantics: for a move inside one sequence
/// the destination is read against the sequence after the source item has
/// been removed, and a destination equal to the target length appends.
use crate::types::{Card, List};

/// An item that carries its own index inside an ordered parent sequence.
pub trait Positioned {
    fn position(&self) -> usize;
    fn set_position(&mut self, position: usize);
}

/// A positioned item that also records the id of its parent container.
pub trait Reparent: Positioned {
    fn set_parent(&mut self, parent_id: &str);
}

/// A container that owns one ordered sequence of reparentable items.
pub trait Container {
    type Item: Reparent;

    fn container_id(&self) -> &str;
    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Source index {index} out of range for sequence of length {len}")]
    SourceOutOfRange { index: usize, len: usize },

    #[error("Destination index {index} out of range (0-{max})")]
    DestinationOutOfRange { index: usize, max: usize },

    #[error("Container index {index} out of range for {len} containers")]
    ContainerOutOfRange { index: usize, len: usize },
}

/// Addresses one slot: the container index and the item index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub container: usize,
    pub index: usize,
}

impl Slot {
    pub fn new(container: usize, index: usize) -> Self {
        Self { container, index }
    }
}

/// Set every item's position to its index. Returns true if any value changed.
pub fn renumber<T: Positioned>(items: &mut [T]) -> bool {
    let mut changed = false;
    for (index, item) in items.iter_mut().enumerate() {
        if item.position() != index {
            item.set_position(index);
            changed = true;
        }
    }
    changed
}

/// True when positions are exactly `0..len` in array order.
pub fn is_dense<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index)
}

/// Move the item at `source` to `destination` inside the same sequence.
///
/// `destination` is an index into the sequence after removal, so it must be
/// below `len`. Returns `Ok(false)` without touching anything when the two
/// indices are equal.
pub fn reorder_within<T: Positioned>(
    items: &mut Vec<T>,
    source: usize,
    destination: usize,
) -> Result<bool, OrderError> {
    let len = items.len();
    if source >= len {
        return Err(OrderError::SourceOutOfRange { index: source, len });
    }
    if destination >= len {
        return Err(OrderError::DestinationOutOfRange {
            index: destination,
            max: len - 1,
        });
    }
    if source == destination {
        return Ok(false);
    }

    let item = items.remove(source);
    items.insert(destination, item);
    renumber(items);
    Ok(true)
}

/// Move the item at `source_index` of `source` into `destination` at
/// `destination_index`, pointing it at `destination_parent`.
///
/// Both sequences are renumbered from zero afterwards.
pub fn move_across<T: Reparent>(
    source: &mut Vec<T>,
    destination: &mut Vec<T>,
    source_index: usize,
    destination_index: usize,
    destination_parent: &str,
) -> Result<(), OrderError> {
    if source_index >= source.len() {
        return Err(OrderError::SourceOutOfRange {
            index: source_index,
            len: source.len(),
        });
    }
    if destination_index > destination.len() {
        return Err(OrderError::DestinationOutOfRange {
            index: destination_index,
            max: destination.len(),
        });
    }

    let mut item = source.remove(source_index);
    item.set_parent(destination_parent);
    destination.insert(destination_index, item);
    renumber(source);
    renumber(destination);
    Ok(())
}

/// Relocate one item between two slots of a container sequence.
///
/// Same-container slots reorder in place; different containers move the item
/// across and reparent it. Returns `Ok(false)` when the slots coincide.
pub fn relocate<C: Container>(containers: &mut [C], from: Slot, to: Slot) -> Result<bool, OrderError> {
    let len = containers.len();
    for container in [from.container, to.container] {
        if container >= len {
            return Err(OrderError::ContainerOutOfRange {
                index: container,
                len,
            });
        }
    }

    if from.container == to.container {
        return reorder_within(containers[from.container].items_mut(), from.index, to.index);
    }

    let (source, destination) = pair_mut(containers, from.container, to.container);
    let parent = destination.container_id().to_string();
    move_across(
        source.items_mut(),
        destination.items_mut(),
        from.index,
        to.index,
        &parent,
    )?;
    Ok(true)
}

/// Two distinct mutable elements of one slice. Panics if `a == b` or either is out of bounds.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "pair_mut needs two distinct indices");
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

impl Positioned for Card {
    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl Reparent for Card {
    fn set_parent(&mut self, parent_id: &str) {
        self.list_id = parent_id.to_string();
    }
}

impl Positioned for List {
    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl Container for List {
    type Item = Card;

    fn container_id(&self) -> &str {
        &self.id
    }

    fn items_mut(&mut self) -> &mut Vec<Card> {
        &mut self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        parent: String,
        position: usize,
    }

    impl Positioned for Item {
        fn position(&self) -> usize {
            self.position
        }

        fn set_position(&mut self, position: usize) {
            self.position = position;
        }
    }

    impl Reparent for Item {
        fn set_parent(&mut self, parent_id: &str) {
            self.parent = parent_id.to_string();
        }
    }

    struct Bucket {
        id: String,
        items: Vec<Item>,
    }

    impl Container for Bucket {
        type Item = Item;

        fn container_id(&self) -> &str {
            &self.id
        }

        fn items_mut(&mut self) -> &mut Vec<Item> {
            &mut self.items
        }
    }

    fn seq(parent: &str, ids: &[&'static str]) -> Vec<Item> {
        ids.iter()
            .enumerate()
            .map(|(position, id)| Item {
                id,
                parent: parent.to_string(),
                position,
            })
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_reorder_forward_and_back() {
        let mut items = seq("p", &["a", "b", "c", "d"]);
        assert!(reorder_within(&mut items, 0, 2).unwrap());
        assert_eq!(ids(&items), vec!["b", "c", "a", "d"]);
        assert!(is_dense(&items));

        assert!(reorder_within(&mut items, 3, 0).unwrap());
        assert_eq!(ids(&items), vec!["d", "b", "c", "a"]);
        assert!(is_dense(&items));
    }

    #[test]
    fn test_reorder_same_index_is_untouched() {
        let mut items = seq("p", &["a", "b", "c"]);
        items[1].position = 7;
        let before = items.clone();
        assert!(!reorder_within(&mut items, 1, 1).unwrap());
        assert_eq!(items, before);
    }

    #[test]
    fn test_reorder_rejects_bad_indices() {
        let mut items = seq("p", &["a", "b"]);
        assert_eq!(
            reorder_within(&mut items, 2, 0),
            Err(OrderError::SourceOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            reorder_within(&mut items, 0, 2),
            Err(OrderError::DestinationOutOfRange { index: 2, max: 1 })
        );
        assert_eq!(ids(&items), vec!["a", "b"]);
    }

    #[test]
    fn test_move_across_reparents_and_renumbers() {
        let mut left = seq("left", &["a", "b", "c"]);
        let mut right = seq("right", &["x", "y"]);
        move_across(&mut left, &mut right, 1, 1, "right").unwrap();

        assert_eq!(ids(&left), vec!["a", "c"]);
        assert_eq!(ids(&right), vec!["x", "b", "y"]);
        assert_eq!(right[1].parent, "right");
        assert!(is_dense(&left));
        assert!(is_dense(&right));
    }

    #[test]
    fn test_move_across_append_at_length() {
        let mut left = seq("left", &["a"]);
        let mut right = seq("right", &["x", "y"]);
        move_across(&mut left, &mut right, 0, 2, "right").unwrap();
        assert!(left.is_empty());
        assert_eq!(ids(&right), vec!["x", "y", "a"]);
        assert_eq!(right[2].position, 2);
    }

    #[test]
    fn test_move_across_failure_leaves_inputs() {
        let mut left = seq("left", &["a"]);
        let mut right = seq("right", &["x"]);
        assert!(move_across(&mut left, &mut right, 1, 0, "right").is_err());
        assert!(move_across(&mut left, &mut right, 0, 5, "right").is_err());
        assert_eq!(ids(&left), vec!["a"]);
        assert_eq!(ids(&right), vec!["x"]);
        assert_eq!(left[0].parent, "left");
    }

    #[test]
    fn test_relocate_dispatches_on_container() {
        let mut buckets = vec![
            Bucket {
                id: "b0".to_string(),
                items: seq("b0", &["a", "b"]),
            },
            Bucket {
                id: "b1".to_string(),
                items: seq("b1", &["x"]),
            },
        ];

        assert!(relocate(&mut buckets, Slot::new(0, 0), Slot::new(0, 1)).unwrap());
        assert_eq!(ids(&buckets[0].items), vec!["b", "a"]);

        assert!(relocate(&mut buckets, Slot::new(1, 0), Slot::new(0, 0)).unwrap());
        assert_eq!(ids(&buckets[0].items), vec!["x", "b", "a"]);
        assert_eq!(buckets[0].items[0].parent, "b0");
        assert!(buckets[1].items.is_empty());

        assert!(!relocate(&mut buckets, Slot::new(0, 2), Slot::new(0, 2)).unwrap());
        assert_eq!(
            relocate(&mut buckets, Slot::new(2, 0), Slot::new(0, 0)),
            Err(OrderError::ContainerOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_renumber_reports_changes() {
        let mut items = seq("p", &["a", "b"]);
        assert!(!renumber(&mut items));
        items[0].position = 4;
        assert!(renumber(&mut items));
        assert!(is_dense(&items));
    }
}
