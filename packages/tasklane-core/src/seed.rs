/// Demo content used by `tasklane init` and by tests.
use chrono::Utc;
use std::collections::BTreeSet;

use crate::types::{Board, Card, ChecklistItem, Comment, List, Workspace};

pub const DEMO_USER_ID: &str = "1";
pub const DEMO_USER_NAME: &str = "Demo User";

fn members() -> BTreeSet<String> {
    BTreeSet::from([DEMO_USER_ID.to_string()])
}

fn checklist(items: &[(&str, &str, bool)]) -> Vec<ChecklistItem> {
    items
        .iter()
        .map(|(id, text, completed)| ChecklistItem {
            id: id.to_string(),
            text: text.to_string(),
            completed: *completed,
        })
        .collect()
}

fn card(id: &str, list_id: &str, position: usize, title: &str, description: &str) -> Card {
    let now = Utc::now();
    Card {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        list_id: list_id.to_string(),
        position,
        due_date: None,
        assignees: BTreeSet::new(),
        checklist: Vec::new(),
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn list(id: &str, board_id: &str, position: usize, title: &str, cards: Vec<Card>) -> List {
    List {
        id: id.to_string(),
        title: title.to_string(),
        board_id: board_id.to_string(),
        position,
        cards,
    }
}

/// One workspace holding one board with three populated lists.
pub fn demo_workspaces() -> Vec<Workspace> {
    let now = Utc::now();

    let mut auth = card(
        "card-1",
        "list-1",
        0,
        "Set up authentication system",
        "Implement login and registration",
    );
    auth.assignees = members();
    auth.checklist = checklist(&[
        ("item-1", "Create login form", true),
        ("item-2", "Create registration form", false),
        ("item-3", "Connect to the auth API", false),
    ]);

    let mut layout = card(
        "card-2",
        "list-1",
        1,
        "Design board layout",
        "Create responsive board layout with drag and drop",
    );
    layout.comments.push(Comment {
        id: "comment-1".to_string(),
        text: "Should we use a component library or custom components?".to_string(),
        author_id: DEMO_USER_ID.to_string(),
        author_name: DEMO_USER_NAME.to_string(),
        created_at: now,
    });

    let mut dnd = card(
        "card-3",
        "list-2",
        0,
        "Implement drag and drop",
        "Add card and list reordering",
    );
    dnd.assignees = members();

    let mut setup = card(
        "card-4",
        "list-3",
        0,
        "Project setup",
        "Initialize the project with required dependencies",
    );
    setup.assignees = members();
    setup.checklist = checklist(&[
        ("item-4", "Install toolchain", true),
        ("item-5", "Configure theme", true),
        ("item-6", "Set up routing", true),
    ]);

    let board = Board {
        id: "board-1".to_string(),
        title: "Project Alpha".to_string(),
        description: Some("Main development board for Project Alpha".to_string()),
        workspace_id: "ws-1".to_string(),
        members: members(),
        lists: vec![
            list("list-1", "board-1", 0, "To Do", vec![auth, layout]),
            list("list-2", "board-1", 1, "In Progress", vec![dnd]),
            list("list-3", "board-1", 2, "Done", vec![setup]),
        ],
        created_at: now,
        updated_at: now,
    };

    vec![Workspace {
        id: "ws-1".to_string(),
        title: "Personal Projects".to_string(),
        description: Some("My personal development projects".to_string()),
        members: members(),
        boards: vec![board],
        created_at: now,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::is_dense;

    #[test]
    fn test_demo_tree_is_consistent() {
        let workspaces = demo_workspaces();
        let board = &workspaces[0].boards[0];
        assert!(is_dense(&board.lists));
        for list in &board.lists {
            assert_eq!(list.board_id, board.id);
            assert!(is_dense(&list.cards));
            assert!(list.cards.iter().all(|c| c.list_id == list.id));
        }
        assert_eq!(board.card_count(), 4);
    }
}
