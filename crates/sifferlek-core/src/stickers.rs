//! Sticker library, placement boards, and the earned collection.
//!
//! Stickers are the reward currency: milestones grant a choice of sticker,
//! earned stickers go on 4x5 placement boards, and a new board is appended
//! once the active one fills up. Categories unlock gradually with score
//! and collection size.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board width in columns.
pub const BOARD_WIDTH: usize = 4;
/// Board height in rows.
pub const BOARD_HEIGHT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerCategory {
    Animals,
    Nature,
    Space,
    Food,
    Sports,
    Music,
    Art,
    Celebration,
}

/// One sticker in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sticker {
    pub id: &'static str,
    pub category: StickerCategory,
    pub emoji: &'static str,
    /// Swedish display name.
    pub name: &'static str,
    /// Swedish description.
    pub description: &'static str,
}

macro_rules! sticker {
    ($id:literal, $cat:ident, $emoji:literal, $name:literal, $desc:literal) => {
        Sticker {
            id: $id,
            category: StickerCategory::$cat,
            emoji: $emoji,
            name: $name,
            description: $desc,
        }
    };
}

/// The full sticker library. Generic motifs only.
pub const STICKER_LIBRARY: [Sticker; 33] = [
    sticker!("cat", Animals, "🐱", "Katt", "En söt katt"),
    sticker!("dog", Animals, "🐶", "Hund", "En glad hund"),
    sticker!("rabbit", Animals, "🐰", "Kanin", "En hoppig kanin"),
    sticker!("bear", Animals, "🐻", "Björn", "En snäll björn"),
    sticker!("panda", Animals, "🐼", "Panda", "En gullig panda"),
    sticker!("tiger", Animals, "🐯", "Tiger", "En modig tiger"),
    sticker!("lion", Animals, "🦁", "Lejon", "Ett starkt lejon"),
    sticker!("elephant", Animals, "🐘", "Elefant", "En stor elefant"),
    sticker!("sun", Nature, "☀️", "Sol", "En varm sol"),
    sticker!("star", Nature, "⭐", "Stjärna", "En glittrande stjärna"),
    sticker!("rainbow", Nature, "🌈", "Regnbåge", "En vacker regnbåge"),
    sticker!("flower", Nature, "🌸", "Blomma", "En fin blomma"),
    sticker!("tree", Nature, "🌳", "Träd", "Ett stort träd"),
    sticker!("butterfly", Nature, "🦋", "Fjäril", "En färgglad fjäril"),
    sticker!("rocket", Space, "🚀", "Raket", "En snabb raket"),
    sticker!("planet", Space, "🪐", "Planet", "En mystisk planet"),
    sticker!("moon", Space, "🌙", "Måne", "En vacker måne"),
    sticker!("alien", Space, "👽", "Utomjording", "En vänlig utomjording"),
    sticker!("pizza", Food, "🍕", "Pizza", "En god pizza"),
    sticker!("icecream", Food, "🍦", "Glass", "En söt glass"),
    sticker!("cake", Food, "🎂", "Tårta", "En festlig tårta"),
    sticker!("apple", Food, "🍎", "Äpple", "Ett friskt äpple"),
    sticker!("soccer", Sports, "⚽", "Fotboll", "En fotboll"),
    sticker!("basketball", Sports, "🏀", "Basket", "En basketboll"),
    sticker!("trophy", Sports, "🏆", "Pokal", "En vacker pokal"),
    sticker!("guitar", Music, "🎸", "Gitarr", "En cool gitarr"),
    sticker!("piano", Music, "🎹", "Piano", "Ett vackert piano"),
    sticker!("drum", Music, "🥁", "Trumma", "En högljudd trumma"),
    sticker!("palette", Art, "🎨", "Palett", "En färgglad palett"),
    sticker!("crayon", Art, "🖍️", "Kritor", "Färgglada kritor"),
    sticker!("party", Celebration, "🎉", "Fest", "En rolig fest"),
    sticker!("confetti", Celebration, "🎊", "Konfetti", "Färgglatt konfetti"),
    sticker!("medal", Celebration, "🏅", "Medalj", "En stolt medalj"),
];

/// Look up a sticker by id.
pub fn sticker(id: &str) -> Option<&'static Sticker> {
    STICKER_LIBRARY.iter().find(|s| s.id == id)
}

/// A sticker placed in a board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerPlacement {
    pub sticker_id: String,
    pub row: usize,
    pub col: usize,
}

/// One fixed-size placement board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerBoard {
    pub id: u32,
    /// `BOARD_HEIGHT` rows of `BOARD_WIDTH` nullable cells.
    pub grid: Vec<Vec<Option<StickerPlacement>>>,
    pub width: usize,
    pub height: usize,
    pub created_at: DateTime<Utc>,
}

impl StickerBoard {
    pub fn empty(id: u32) -> Self {
        Self {
            id,
            grid: vec![vec![None; BOARD_WIDTH]; BOARD_HEIGHT],
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            created_at: Utc::now(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.grid
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// First empty cell in reading order.
    pub fn first_empty(&self) -> Option<(usize, usize)> {
        for (r, row) in self.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_none() {
                    return Some((r, c));
                }
            }
        }
        None
    }

    fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }
}

/// Earned stickers, boards, and the milestone once-only record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerCollection {
    /// Earned sticker ids in the order they were granted, no duplicates.
    pub earned: Vec<String>,
    pub boards: Vec<StickerBoard>,
    pub current_board_index: usize,
    /// Milestone ids already granted. Authoritative once-only guard.
    pub milestones_reached: BTreeSet<String>,
}

impl StickerCollection {
    pub fn new() -> Self {
        Self {
            earned: Vec::new(),
            boards: vec![StickerBoard::empty(1)],
            current_board_index: 0,
            milestones_reached: BTreeSet::new(),
        }
    }

    pub fn active_board(&self) -> &StickerBoard {
        &self.boards[self.current_board_index.min(self.boards.len() - 1)]
    }

    /// Record an earned sticker. Idempotent: a sticker id appears in
    /// `earned` at most once.
    pub fn add_earned(&mut self, sticker_id: &str) {
        if !self.earned.iter().any(|id| id == sticker_id) {
            self.earned.push(sticker_id.to_string());
        }
    }

    pub fn is_earned(&self, sticker_id: &str) -> bool {
        self.earned.iter().any(|id| id == sticker_id)
    }

    /// Place an earned sticker into an empty slot. Fails (false) when the
    /// sticker is unearned, the board or slot is out of range, or the slot
    /// is occupied.
    pub fn place(&mut self, sticker_id: &str, board_index: usize, row: usize, col: usize) -> bool {
        if !self.is_earned(sticker_id) {
            return false;
        }
        let Some(board) = self.boards.get_mut(board_index) else {
            return false;
        };
        if !board.in_bounds(row, col) || board.grid[row][col].is_some() {
            return false;
        }
        board.grid[row][col] = Some(StickerPlacement {
            sticker_id: sticker_id.to_string(),
            row,
            col,
        });
        true
    }

    /// Move a placed sticker to another empty slot on the same board.
    pub fn move_sticker(
        &mut self,
        board_index: usize,
        from: (usize, usize),
        to: (usize, usize),
    ) -> bool {
        let Some(board) = self.boards.get_mut(board_index) else {
            return false;
        };
        if !board.in_bounds(from.0, from.1) || !board.in_bounds(to.0, to.1) {
            return false;
        }
        if board.grid[from.0][from.1].is_none() || board.grid[to.0][to.1].is_some() {
            return false;
        }
        let mut placement = board.grid[from.0][from.1].take().unwrap();
        placement.row = to.0;
        placement.col = to.1;
        board.grid[to.0][to.1] = Some(placement);
        true
    }

    /// Clear a cell, returning the sticker to the unplaced pool.
    pub fn remove(&mut self, board_index: usize, row: usize, col: usize) -> bool {
        let Some(board) = self.boards.get_mut(board_index) else {
            return false;
        };
        if !board.in_bounds(row, col) || board.grid[row][col].is_none() {
            return false;
        }
        board.grid[row][col] = None;
        true
    }

    pub fn is_active_board_full(&self) -> bool {
        self.active_board().is_full()
    }

    /// Append a fresh board and make it active, but only when the current
    /// one is full. Returns the new board's index.
    pub fn create_board_if_needed(&mut self) -> Option<usize> {
        if !self.is_active_board_full() {
            return None;
        }
        let id = self.boards.len() as u32 + 1;
        self.boards.push(StickerBoard::empty(id));
        self.current_board_index = self.boards.len() - 1;
        Some(self.current_board_index)
    }

    /// Auto-place an earned sticker into the first empty slot of the
    /// active board, rolling over to a new board when full. Returns the
    /// placement coordinates `(board, row, col)`.
    pub fn place_in_first_empty(&mut self, sticker_id: &str) -> Option<(usize, usize, usize)> {
        if !self.is_earned(sticker_id) {
            return None;
        }
        self.create_board_if_needed();
        let board_index = self.current_board_index;
        let (row, col) = self.active_board().first_empty()?;
        if self.place(sticker_id, board_index, row, col) {
            Some((board_index, row, col))
        } else {
            None
        }
    }

    pub fn milestone_reached(&self, milestone_id: &str) -> bool {
        self.milestones_reached.contains(milestone_id)
    }

    pub fn mark_milestone_reached(&mut self, milestone_id: &str) {
        self.milestones_reached.insert(milestone_id.to_string());
    }
}

impl Default for StickerCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Categories unlocked at a given cumulative score and earned-sticker
/// count. Animals and nature are always available.
pub fn unlocked_categories(total_score: u32, earned_count: usize) -> BTreeSet<StickerCategory> {
    let mut unlocked = BTreeSet::from([StickerCategory::Animals, StickerCategory::Nature]);

    let gates = [
        (StickerCategory::Food, 50, 2),
        (StickerCategory::Sports, 100, 4),
        (StickerCategory::Music, 150, 6),
        (StickerCategory::Art, 200, 8),
        (StickerCategory::Space, 250, 10),
        (StickerCategory::Celebration, 300, 12),
    ];
    for (category, score_gate, sticker_gate) in gates {
        if total_score >= score_gate || earned_count >= sticker_gate {
            unlocked.insert(category);
        }
    }
    unlocked
}

/// Filter sticker ids down to unlocked categories.
pub fn filter_by_progression<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    total_score: u32,
    earned_count: usize,
) -> Vec<&'a str> {
    let unlocked = unlocked_categories(total_score, earned_count);
    ids.into_iter()
        .filter(|id| sticker(id).is_some_and(|s| unlocked.contains(&s.category)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_earned_is_idempotent() {
        let mut c = StickerCollection::new();
        c.add_earned("cat");
        c.add_earned("cat");
        assert_eq!(c.earned, vec!["cat"]);
    }

    #[test]
    fn place_requires_earned_sticker() {
        let mut c = StickerCollection::new();
        assert!(!c.place("cat", 0, 0, 0));
        c.add_earned("cat");
        assert!(c.place("cat", 0, 0, 0));
    }

    #[test]
    fn place_rejects_occupied_and_out_of_range() {
        let mut c = StickerCollection::new();
        c.add_earned("cat");
        c.add_earned("dog");
        assert!(c.place("cat", 0, 0, 0));
        assert!(!c.place("dog", 0, 0, 0)); // occupied
        assert!(!c.place("dog", 0, BOARD_HEIGHT, 0)); // row out of range
        assert!(!c.place("dog", 1, 0, 0)); // no such board
    }

    #[test]
    fn move_and_remove() {
        let mut c = StickerCollection::new();
        c.add_earned("cat");
        c.place("cat", 0, 0, 0);

        assert!(c.move_sticker(0, (0, 0), (2, 3)));
        assert!(c.boards[0].grid[0][0].is_none());
        let moved = c.boards[0].grid[2][3].as_ref().unwrap();
        assert_eq!(moved.sticker_id, "cat");
        assert_eq!((moved.row, moved.col), (2, 3));

        assert!(!c.move_sticker(0, (0, 0), (1, 1))); // empty source
        assert!(c.remove(0, 2, 3));
        assert!(!c.remove(0, 2, 3)); // already empty
    }

    #[test]
    fn new_board_only_when_full() {
        let mut c = StickerCollection::new();
        assert!(c.create_board_if_needed().is_none());
        assert_eq!(c.boards.len(), 1);
    }

    #[test]
    fn twenty_first_sticker_opens_board_two() {
        // Scenario: fill the 4x5 board, then one more placement.
        let mut c = StickerCollection::new();
        let ids: Vec<String> = (0..21).map(|i| format!("s{i}")).collect();
        for id in &ids {
            c.earned.push(id.clone());
        }
        for id in ids.iter().take(20) {
            assert!(c.place_in_first_empty(id).is_some());
        }
        assert!(c.is_active_board_full());
        assert_eq!(c.boards.len(), 1);

        let spot = c.place_in_first_empty(&ids[20]);
        assert_eq!(spot, Some((1, 0, 0)));
        assert_eq!(c.boards.len(), 2);
        assert_eq!(c.current_board_index, 1);
        assert_eq!(c.boards[1].id, 2);
    }

    #[test]
    fn base_categories_always_unlocked() {
        let unlocked = unlocked_categories(0, 0);
        assert!(unlocked.contains(&StickerCategory::Animals));
        assert!(unlocked.contains(&StickerCategory::Nature));
        assert!(!unlocked.contains(&StickerCategory::Space));
    }

    #[test]
    fn categories_unlock_by_score_or_count() {
        assert!(unlocked_categories(50, 0).contains(&StickerCategory::Food));
        assert!(unlocked_categories(0, 2).contains(&StickerCategory::Food));
        assert!(unlocked_categories(300, 0).contains(&StickerCategory::Celebration));
        assert!(!unlocked_categories(249, 9).contains(&StickerCategory::Space));
    }

    #[test]
    fn progression_filter_drops_locked_options() {
        // trophy is Sports (locked at zero progress), cat is Animals.
        let filtered = filter_by_progression(["trophy", "cat"], 0, 0);
        assert_eq!(filtered, vec!["cat"]);
    }

    #[test]
    fn library_ids_are_unique() {
        let mut ids: Vec<&str> = STICKER_LIBRARY.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), STICKER_LIBRARY.len());
    }
}
