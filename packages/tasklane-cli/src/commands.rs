use std::io::Write;

use tasklane_core::drag::{apply_drag, DragOutcome, DragResult};
use tasklane_core::search::{search_cards, SearchQuery};
use tasklane_core::seed::demo_workspaces;
use tasklane_core::snapshot::SnapshotFile;
use tasklane_core::types::{Board, BoardTree, NewCard};
use tasklane_core::BoardStore;

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;
use crate::error::CliError;

/// Execute one command against the snapshot, writing human output to `out`.
pub fn run(cli: &Cli, config: &CliConfig, out: &mut impl Write) -> Result<(), CliError> {
    let mut file = SnapshotFile::new(config.resolve_snapshot(cli.snapshot.as_deref()));

    if let Commands::Init { force } = &cli.command {
        if file.exists() && !force {
            return Err(CliError::SnapshotExists(file.path().to_path_buf()));
        }
        let workspaces = demo_workspaces();
        let current = workspaces
            .first()
            .and_then(|w| w.boards.first())
            .map(|b| b.id.clone());
        let tree = BoardTree {
            workspaces,
            current_board_id: current,
        };
        file.save(&tree)?;
        writeln!(out, "Initialized {}", file.path().display())?;
        return Ok(());
    }

    let document = file
        .load()?
        .ok_or_else(|| CliError::NoSnapshot(file.path().to_path_buf()))?;
    let mut store = BoardStore::with_tree(config.store.clone(), document.into_tree());
    apply(&mut store, &cli.command, out)?;

    if file.save(&store.snapshot())? {
        log::debug!("[tasklane.cli] Wrote {}", file.path().display());
    }
    Ok(())
}

/// Apply one loaded-snapshot command to the store.
fn apply(store: &mut BoardStore, command: &Commands, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        // Written before any snapshot is loaded.
        Commands::Init { .. } => {}
        Commands::Show { board_id } => {
            let board = match board_id {
                Some(id) => store.get_board(id)?,
                None => store.current_board().ok_or(CliError::NoActiveBoard)?,
            };
            print_board(out, &board)?;
        }
        Commands::Boards => {
            let tree = store.snapshot();
            for board in tree.boards() {
                let marker = if tree.current_board_id.as_deref() == Some(board.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                writeln!(
                    out,
                    "{} {}  {}  ({} lists, {} cards)",
                    marker,
                    board.id,
                    board.title,
                    board.lists.len(),
                    board.card_count()
                )?;
            }
        }
        Commands::Use { board_id } => {
            store.set_current_board(Some(board_id.as_str()))?;
            writeln!(out, "Active board: {}", board_id)?;
        }
        Commands::AddList { board_id, title } => {
            store.set_current_board(Some(board_id.as_str()))?;
            let list = store.add_list(board_id, title)?;
            writeln!(out, "{}", list.id)?;
        }
        Commands::AddCard {
            list_id,
            title,
            description,
        } => {
            let input = NewCard {
                description: description.clone(),
                ..NewCard::titled(title.as_str())
            };
            let card = store.add_card(list_id, input)?;
            writeln!(out, "{}", card.id)?;
        }
        Commands::MoveCard {
            card_id,
            list_id,
            position,
        } => store.move_card(card_id, list_id, *position)?,
        Commands::MoveList { list_id, position } => store.move_list(list_id, *position)?,
        Commands::DeleteCard { card_id } => store.delete_card(card_id)?,
        Commands::DeleteList { list_id } => store.delete_list(list_id)?,
        Commands::Drag { board_id, json } => {
            let drag: DragResult = serde_json::from_str(json)?;
            match apply_drag(store, board_id, &drag)? {
                DragOutcome::Dropped => writeln!(out, "Dropped: no destination")?,
                DragOutcome::Unchanged => writeln!(out, "Unchanged")?,
                DragOutcome::Applied => writeln!(out, "Applied")?,
            }
        }
        Commands::Search { query, json } => {
            let hits = search_cards(&store.snapshot(), &SearchQuery::parse(query));
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&hits)?)?;
            } else {
                for hit in &hits {
                    writeln!(
                        out,
                        "{}  {}  [{} / {}]",
                        hit.card_id, hit.card_title, hit.board_title, hit.list_title
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn print_board(out: &mut impl Write, board: &Board) -> std::io::Result<()> {
    writeln!(out, "{} ({})", board.title, board.id)?;
    for list in &board.lists {
        writeln!(out, "  {}. {} [{}]", list.position, list.title, list.id)?;
        for card in &list.cards {
            let (done, total) = card.checklist_progress();
            let progress = if total > 0 {
                format!(" {}/{}", done, total)
            } else {
                String::new()
            };
            let due = card
                .due_date
                .map(|d| format!(" due {}", d))
                .unwrap_or_default();
            writeln!(
                out,
                "     {}. {} ({}){}{}",
                card.position, card.title, card.id, progress, due
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;
    use tasklane_core::StoreError;
    use tempfile::TempDir;

    fn exec(snapshot: &Path, args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec!["tasklane", "--snapshot", snapshot.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        run(&cli, &CliConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn read_tree(snapshot: &Path) -> BoardTree {
        SnapshotFile::new(snapshot)
            .load()
            .unwrap()
            .unwrap()
            .into_tree()
    }

    fn initialized() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        exec(&path, &["init"]).unwrap();
        (dir, path)
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let (_dir, path) = initialized();
        assert!(matches!(
            exec(&path, &["init"]),
            Err(CliError::SnapshotExists(p)) if p == path
        ));
        let out = exec(&path, &["init", "--force"]).unwrap();
        assert_eq!(out, format!("Initialized {}\n", path.display()));
        assert_eq!(read_tree(&path).current_board_id.as_deref(), Some("board-1"));
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.json");
        assert!(matches!(
            exec(&path, &["boards"]),
            Err(CliError::NoSnapshot(p)) if p == path
        ));
    }

    #[test]
    fn test_show_and_boards() {
        let (_dir, path) = initialized();
        let shown = exec(&path, &["show"]).unwrap();
        assert!(shown.starts_with("Project Alpha (board-1)"));
        assert!(shown.contains("Set up authentication system (card-1) 1/3"));

        let boards = exec(&path, &["boards"]).unwrap();
        assert!(boards.starts_with("* board-1  Project Alpha  (3 lists, 4 cards)"));
    }

    #[test]
    fn test_mutations_are_persisted() {
        let (_dir, path) = initialized();

        let list_id = exec(&path, &["add-list", "board-1", "Review"]).unwrap();
        let list_id = list_id.trim().to_string();
        let card_id = exec(&path, &["add-card", list_id.as_str(), "Audit", "-d", "security pass"])
            .unwrap()
            .trim()
            .to_string();
        exec(&path, &["move-card", "card-1", list_id.as_str(), "0"]).unwrap();
        exec(&path, &["move-list", list_id.as_str(), "0"]).unwrap();
        exec(&path, &["delete-card", "card-2"]).unwrap();

        let tree = read_tree(&path);
        let board = tree.board("board-1").unwrap();
        assert_eq!(board.lists[0].id, list_id);
        let ids: Vec<&str> = board.lists[0].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["card-1", card_id.as_str()]);
        assert!(board.lists[1].cards.is_empty());
        assert_eq!(tree.card(&card_id).unwrap().description.as_deref(), Some("security pass"));

        exec(&path, &["delete-list", list_id.as_str()]).unwrap();
        assert!(read_tree(&path).card("card-1").is_none());
    }

    #[test]
    fn test_drag_command() {
        let (_dir, path) = initialized();
        let out = exec(
            &path,
            &[
                "drag",
                "board-1",
                r#"{"type":"column","source":{"containerId":"board-1","index":0},"destination":{"containerId":"board-1","index":2}}"#,
            ],
        )
        .unwrap();
        assert_eq!(out.trim(), "Applied");
        let order: Vec<String> = read_tree(&path)
            .board("board-1")
            .unwrap()
            .lists
            .iter()
            .map(|l| l.id.clone())
            .collect();
        assert_eq!(order, vec!["list-2", "list-3", "list-1"]);

        assert!(matches!(
            exec(&path, &["drag", "board-1", "{"]),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn test_store_errors_leave_snapshot_alone() {
        let (_dir, path) = initialized();
        let before = std::fs::read_to_string(&path).unwrap();
        assert!(matches!(
            exec(&path, &["move-list", "list-1", "9"]),
            Err(CliError::Store(StoreError::InvalidIndex(_)))
        ));
        assert!(matches!(
            exec(&path, &["delete-card", "card-99"]),
            Err(CliError::Store(StoreError::CardNotFound(_)))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_search_output() {
        let (_dir, path) = initialized();
        let out = exec(&path, &["search", "list:done"]).unwrap();
        assert_eq!(out.trim(), "card-4  Project setup  [Project Alpha / Done]");

        let out = exec(&path, &["search", "drag", "--json"]).unwrap();
        let hits: serde_json::Value = serde_json::from_str(&out).unwrap();
        let ids: Vec<&str> = hits
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["cardId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["card-2", "card-3"]);
    }
}
