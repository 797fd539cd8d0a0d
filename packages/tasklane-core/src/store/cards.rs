use chrono::Utc;

use super::{clean_optional, BoardStore, StoreChange};
use crate::error::{require_text, Result, StoreError};
use crate::ids::{next_id, IdKind};
use crate::lookup::BoardPath;
use crate::ordering::{relocate, renumber, Slot};
use crate::types::{BoardTree, Card, CardUpdate, ChecklistItem, Comment, NewCard, NewComment};

impl BoardStore {
    /// Create a card at the end of a list.
    pub fn add_card(&mut self, list_id: &str, input: NewCard) -> Result<Card> {
        let title = require_text(&input.title, "Card", "title")?;
        self.commit(|tree| {
            let path = tree
                .locate_list(list_id)
                .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
            let now = Utc::now();
            tree.board_at_mut(path.board_path()).updated_at = now;
            let list = tree.list_at_mut(path);
            let card = Card {
                id: next_id(IdKind::Card),
                title,
                description: clean_optional(input.description),
                list_id: list_id.to_string(),
                position: list.cards.len(),
                due_date: input.due_date,
                assignees: input.assignees,
                checklist: Vec::new(),
                comments: Vec::new(),
                created_at: now,
                updated_at: now,
            };
            list.cards.push(card.clone());

            let change = StoreChange::CardCreated {
                list_id: list_id.to_string(),
                card_id: card.id.clone(),
                position: card.position,
            };
            Ok((card, Some(change)))
        })
    }

    /// Merge content fields into a card and refresh its `updated_at`.
    pub fn update_card(&mut self, card_id: &str, update: CardUpdate) -> Result<Card> {
        let title = update
            .title
            .as_deref()
            .map(|t| require_text(t, "Card", "title"))
            .transpose()?;
        self.edit_card(card_id, |card| {
            if update.is_empty() {
                return Ok(((), false));
            }
            if let Some(title) = title {
                card.title = title;
            }
            if let Some(description) = update.description {
                card.description = clean_optional(description);
            }
            if let Some(due_date) = update.due_date {
                card.due_date = due_date;
            }
            if let Some(assignees) = update.assignees {
                card.assignees = assignees;
            }
            Ok(((), true))
        })?;
        self.snapshot()
            .card(card_id)
            .cloned()
            .ok_or_else(|| StoreError::CardNotFound(card_id.to_string()))
    }

    /// Remove a card with its checklist and comments. Remaining cards are renumbered.
    pub fn delete_card(&mut self, card_id: &str) -> Result<()> {
        self.commit(|tree| {
            let path = tree
                .locate_card(card_id)
                .ok_or_else(|| StoreError::CardNotFound(card_id.to_string()))?;
            tree.board_at_mut(path.board_path()).updated_at = Utc::now();
            let list = tree.list_at_mut(path.list_path());
            list.cards.remove(path.card);
            renumber(&mut list.cards);

            let change = StoreChange::CardDeleted {
                list_id: list.id.clone(),
                card_id: card_id.to_string(),
            };
            Ok(((), Some(change)))
        })
    }

    /// Move a card to `new_position` of `new_list_id` on the same board.
    ///
    /// `new_position` is read after the card has left its old slot, so for a
    /// move inside one list it must be below that list's length, and for a
    /// move to another list it may equal the target length to append.
    pub fn move_card(&mut self, card_id: &str, new_list_id: &str, new_position: usize) -> Result<()> {
        self.commit(|tree| {
            let from = tree
                .locate_card(card_id)
                .ok_or_else(|| StoreError::CardNotFound(card_id.to_string()))?;
            let board = from.board_path();
            let to_list = tree.list_index_in(board, new_list_id)?;
            let change = relocate_card(
                tree,
                board,
                Slot::new(from.list, from.card),
                Slot::new(to_list, new_position),
            )?;
            Ok(((), change))
        })
    }

    /// Index-addressed variant of [`BoardStore::move_card`]. Handles both a
    /// reorder inside one list and a move between two lists of one board.
    pub fn update_card_order(
        &mut self,
        board_id: &str,
        source_list_id: &str,
        destination_list_id: &str,
        source_index: usize,
        destination_index: usize,
    ) -> Result<()> {
        self.commit(|tree| {
            let board = tree
                .locate_board(board_id)
                .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
            let from_list = tree.list_index_in(board, source_list_id)?;
            let to_list = tree.list_index_in(board, destination_list_id)?;
            let change = relocate_card(
                tree,
                board,
                Slot::new(from_list, source_index),
                Slot::new(to_list, destination_index),
            )?;
            Ok(((), change))
        })
    }

    pub fn add_checklist_item(&mut self, card_id: &str, text: &str) -> Result<ChecklistItem> {
        let text = require_text(text, "Checklist item", "text")?;
        self.edit_card(card_id, |card| {
            let item = ChecklistItem {
                id: next_id(IdKind::ChecklistItem),
                text,
                completed: false,
            };
            card.checklist.push(item.clone());
            Ok((item, true))
        })
    }

    /// Flip an item's completed flag. Returns the new state.
    pub fn toggle_checklist_item(&mut self, card_id: &str, item_id: &str) -> Result<bool> {
        self.edit_card(card_id, |card| {
            let item = checklist_item_mut(card, item_id)?;
            item.completed = !item.completed;
            Ok((item.completed, true))
        })
    }

    pub fn update_checklist_item(&mut self, card_id: &str, item_id: &str, text: &str) -> Result<()> {
        let text = require_text(text, "Checklist item", "text")?;
        self.edit_card(card_id, |card| {
            let item = checklist_item_mut(card, item_id)?;
            let changed = item.text != text;
            item.text = text;
            Ok(((), changed))
        })
    }

    pub fn delete_checklist_item(&mut self, card_id: &str, item_id: &str) -> Result<()> {
        self.edit_card(card_id, |card| {
            let index = card
                .checklist
                .iter()
                .position(|item| item.id == item_id)
                .ok_or_else(|| StoreError::ChecklistItemNotFound {
                    card_id: card.id.clone(),
                    item_id: item_id.to_string(),
                })?;
            card.checklist.remove(index);
            Ok(((), true))
        })
    }

    pub fn add_comment(&mut self, card_id: &str, input: NewComment) -> Result<Comment> {
        let text = require_text(&input.text, "Comment", "text")?;
        self.edit_card(card_id, |card| {
            let comment = Comment {
                id: next_id(IdKind::Comment),
                text,
                author_id: input.author_id,
                author_name: input.author_name,
                created_at: Utc::now(),
            };
            card.comments.push(comment.clone());
            Ok((comment, true))
        })
    }

    pub fn delete_comment(&mut self, card_id: &str, comment_id: &str) -> Result<()> {
        self.edit_card(card_id, |card| {
            let index = card
                .comments
                .iter()
                .position(|comment| comment.id == comment_id)
                .ok_or_else(|| StoreError::CommentNotFound {
                    card_id: card.id.clone(),
                    comment_id: comment_id.to_string(),
                })?;
            card.comments.remove(index);
            Ok(((), true))
        })
    }

    /// Add a member to the card's assignees. Returns false if already assigned.
    pub fn assign(&mut self, card_id: &str, member_id: &str) -> Result<bool> {
        self.edit_card(card_id, |card| {
            let added = card.assignees.insert(member_id.to_string());
            Ok((added, added))
        })
    }

    /// Remove a member from the card's assignees. Returns false if not assigned.
    pub fn unassign(&mut self, card_id: &str, member_id: &str) -> Result<bool> {
        self.edit_card(card_id, |card| {
            let removed = card.assignees.remove(member_id);
            Ok((removed, removed))
        })
    }

    /// Apply a content edit to one card. `edit` returns its value and whether
    /// anything changed; only changes are published, and they bump the card's
    /// and its board's `updated_at`.
    fn edit_card<T>(
        &self,
        card_id: &str,
        edit: impl FnOnce(&mut Card) -> Result<(T, bool)>,
    ) -> Result<T> {
        self.commit(|tree| {
            let path = tree
                .locate_card(card_id)
                .ok_or_else(|| StoreError::CardNotFound(card_id.to_string()))?;
            let card = tree.card_at_mut(path);
            let (value, changed) = edit(&mut *card)?;
            if !changed {
                return Ok((value, None));
            }
            let now = Utc::now();
            card.updated_at = now;
            tree.board_at_mut(path.board_path()).updated_at = now;
            let change = StoreChange::CardUpdated {
                card_id: card_id.to_string(),
            };
            Ok((value, Some(change)))
        })
    }
}

/// Shared path of both card move shapes. Moves touch positions and `list_id`
/// only; `updated_at` is left alone.
fn relocate_card(
    tree: &mut BoardTree,
    path: BoardPath,
    from: Slot,
    to: Slot,
) -> Result<Option<StoreChange>> {
    let board = tree.board_at_mut(path);
    if !relocate(&mut board.lists, from, to)? {
        return Ok(None);
    }

    // A relocated item always lands exactly at the destination slot.
    let to_list = &board.lists[to.container];
    let card = &to_list.cards[to.index];
    log::debug!(
        "[tasklane.store.move] Card {}: {}[{}] -> {}[{}]",
        card.id,
        board.lists[from.container].id,
        from.index,
        to_list.id,
        to.index
    );
    Ok(Some(StoreChange::CardMoved {
        card_id: card.id.clone(),
        from_list_id: board.lists[from.container].id.clone(),
        to_list_id: to_list.id.clone(),
        position: card.position,
    }))
}

fn checklist_item_mut<'a>(card: &'a mut Card, item_id: &str) -> Result<&'a mut ChecklistItem> {
    let card_id = card.id.clone();
    card.checklist
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| StoreError::ChecklistItemNotFound {
            card_id,
            item_id: item_id.to_string(),
        })
}
