/// Drag-and-drop result ingestion.
///
/// The gesture layer reports what was dragged, where it came from and where
/// it was dropped. Column drags carry the board id as container id; card
/// drags carry list ids. A result without a destination is dropped.
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::store::BoardStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragKind {
    Column,
    Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub container_id: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub source: DragLocation,
    #[serde(default)]
    pub destination: Option<DragLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drop target; nothing was sent to the store.
    Dropped,
    /// Dropped where it started; nothing was sent to the store.
    Unchanged,
    Applied,
}

/// Translate a finished drag on `board_id` into one store mutation.
///
/// A column drag must name `board_id` as both source and destination container.
pub fn apply_drag(store: &mut BoardStore, board_id: &str, drag: &DragResult) -> Result<DragOutcome> {
    let Some(destination) = drag.destination.as_ref() else {
        return Ok(DragOutcome::Dropped);
    };
    if drag.kind == DragKind::Column {
        for location in [&drag.source, destination] {
            if location.container_id != board_id {
                return Err(StoreError::ColumnNotInBoard {
                    container_id: location.container_id.clone(),
                    board_id: board_id.to_string(),
                });
            }
        }
    }
    if *destination == drag.source {
        return Ok(DragOutcome::Unchanged);
    }

    match drag.kind {
        DragKind::Column => {
            store.update_column_order(board_id, drag.source.index, destination.index)?;
        }
        DragKind::Card => {
            store.update_card_order(
                board_id,
                &drag.source.container_id,
                &destination.container_id,
                drag.source.index,
                destination.index,
            )?;
        }
    }
    Ok(DragOutcome::Applied)
}
