use std::error::Error;

use clap::Subcommand;
use sifferlek_core::stickers::{sticker, unlocked_categories, STICKER_LIBRARY};
use sifferlek_core::storage::FileMedium;
use sifferlek_core::{ProgressStore, StickerStore};

#[derive(Subcommand)]
pub enum StickersAction {
    /// List the sticker library with earned and unlocked status
    List,
    /// Render a placement board
    Board {
        /// Board number (1-based); defaults to the active board
        #[arg(long)]
        number: Option<usize>,
    },
    /// Place an earned sticker at an explicit position
    Place {
        sticker_id: String,
        board: usize,
        row: usize,
        col: usize,
    },
    /// Move a placed sticker to an empty slot on the same board
    Move {
        board: usize,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    },
    /// Remove a sticker from a board cell
    Remove {
        board: usize,
        row: usize,
        col: usize,
    },
}

pub fn run(action: StickersAction) -> Result<(), Box<dyn Error>> {
    let mut store = StickerStore::new(FileMedium::open()?);

    match action {
        StickersAction::List => {
            let collection = store.load();
            let mut progress = ProgressStore::new(FileMedium::open()?);
            let total_score = progress.load().total_score;
            let unlocked = unlocked_categories(total_score, collection.earned.len());

            for s in &STICKER_LIBRARY {
                let status = if collection.is_earned(s.id) {
                    "intjänad"
                } else if unlocked.contains(&s.category) {
                    "upplåst"
                } else {
                    "låst"
                };
                println!("{} {:<12} {:<20} {status}", s.emoji, s.id, s.name);
            }
            println!(
                "\n{} av {} intjänade",
                collection.earned.len(),
                STICKER_LIBRARY.len()
            );
        }
        StickersAction::Board { number } => {
            let collection = store.load();
            let index = match number {
                Some(n) if n >= 1 && n <= collection.boards.len() => n - 1,
                Some(n) => return Err(format!("no board {n}").into()),
                None => collection.current_board_index,
            };
            let board = &collection.boards[index];
            println!("Tavla {} av {}", index + 1, collection.boards.len());
            for row in &board.grid {
                let cells: Vec<&str> = row
                    .iter()
                    .map(|cell| {
                        cell.as_ref()
                            .and_then(|p| sticker(&p.sticker_id))
                            .map(|s| s.emoji)
                            .unwrap_or("·")
                    })
                    .collect();
                println!("  {}", cells.join(" "));
            }
        }
        StickersAction::Place {
            sticker_id,
            board,
            row,
            col,
        } => {
            if board == 0 {
                return Err("board numbers start at 1".into());
            }
            if store.place(&sticker_id, board - 1, row, col)? {
                println!("{sticker_id} placerad.");
            } else {
                return Err("placement rejected: sticker unearned, slot occupied, or out of range".into());
            }
        }
        StickersAction::Move {
            board,
            from_row,
            from_col,
            to_row,
            to_col,
        } => {
            if board == 0 {
                return Err("board numbers start at 1".into());
            }
            let moved = store
                .update(|c| c.move_sticker(board - 1, (from_row, from_col), (to_row, to_col)))?;
            if moved {
                println!("Flyttad.");
            } else {
                return Err("move rejected: empty source, occupied target, or out of range".into());
            }
        }
        StickersAction::Remove { board, row, col } => {
            if board == 0 {
                return Err("board numbers start at 1".into());
            }
            let removed = store.update(|c| c.remove(board - 1, row, col))?;
            if removed {
                println!("Borttagen.");
            } else {
                return Err("nothing to remove at that position".into());
            }
        }
    }
    Ok(())
}
