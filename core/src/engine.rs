use serde::{Deserialize, Serialize};

use crate::*;

/// Summary of a block shift.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockShift {
    /// Blocks relocated to a new index.
    pub moved: usize,
    /// Pairs of opposite-parity blocks that annihilated.
    pub merged: usize,
    pub pearls_collected: usize,
}

impl BlockShift {
    pub const fn has_update(&self) -> bool {
        self.moved > 0 || self.merged > 0 || self.pearls_collected > 0
    }
}

/// What the player ended up standing on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Landing {
    Rest,
    Gate,
    Spikes,
}

impl Landing {
    pub const fn is_fatal(self) -> bool {
        match self {
            Self::Rest => false,
            Self::Gate => false,
            Self::Spikes => true,
        }
    }
}

/// Summary of a player shift.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerShift {
    pub index: usize,
    pub pearls_collected: usize,
    /// Open gates the player passed, now closed behind them.
    pub gates_closed: usize,
    pub landing: Landing,
}

/// Outcome of a full rightward turn, blocks first and then the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOutcome {
    pub blocks: BlockShift,
    pub player: PlayerShift,
}

impl ShiftOutcome {
    pub const fn pearls_collected(&self) -> usize {
        self.blocks.pearls_collected + self.player.pearls_collected
    }
}

/// Replaces every pearl in `start..=end` with an empty cell, returning how many were collected.
///
/// An empty range (`start > end`) is a no-op.
///
/// # Panics
///
/// Panics if a non-empty range reaches past the end of `cells`.
pub fn collect_pearls(cells: &mut [CellState], start: usize, end: usize) -> usize {
    if start > end {
        return 0;
    }

    let mut collected = 0;
    for cell in &mut cells[start..=end] {
        if *cell == CellState::Pearl {
            *cell = CellState::Empty;
            collected += 1;
        }
    }
    collected
}

/// Index of the first movable block found searching left from `start`, inclusive.
///
/// # Panics
///
/// Panics if `start` is not a valid index into `cells`.
pub fn find_rightmost_movable_block(cells: &[CellState], start: usize) -> Option<usize> {
    cells[..=start].iter().rposition(|cell| cell.is_movable())
}

/// Length, first cell, and no boundary before the last cell.
///
/// Whether a cell is a boundary depends on the movable blocks seen up to and including it.
fn has_valid_interior(cells: &[CellState]) -> bool {
    use CellState::*;

    let Some((_, interior)) = cells.split_last() else {
        return false;
    };
    if interior.is_empty() || !matches!(interior[0], Empty | OpenGate | Portal) {
        return false;
    }

    let mut has_movable = false;
    interior.iter().all(|&cell| {
        has_movable |= cell.is_movable();
        !cell.is_boundary(has_movable)
    })
}

/// Whether `move_blocks` accepts the sequence.
///
/// The first cell must be empty, an open gate or a portal, and the last cell
/// must be the only boundary.
pub fn is_valid_for_move_blocks(cells: &[CellState]) -> bool {
    let Some(&last) = cells.last() else {
        return false;
    };
    has_valid_interior(cells) && last.is_boundary(cells.iter().any(|cell| cell.is_movable()))
}

/// Whether the sequence looks like something `move_blocks` just produced.
///
/// The last cell always bounds the player, so an open gate or portal may end
/// the sequence even after every block is gone.
pub fn is_valid_for_move_player(cells: &[CellState]) -> bool {
    let Some(&last) = cells.last() else {
        return false;
    };
    has_valid_interior(cells) && last.is_boundary(true) && is_right_packed(cells)
}

/// All movable blocks form one run ending just before the last cell.
fn is_right_packed(cells: &[CellState]) -> bool {
    let end = cells.len() - 2;
    let Some(rightmost) = find_rightmost_movable_block(cells, end) else {
        return true;
    };
    if rightmost != end {
        return false;
    }

    match cells[..=end].iter().rposition(|cell| !cell.is_movable()) {
        Some(gap) => find_rightmost_movable_block(cells, gap).is_none(),
        None => true,
    }
}

/// Shifts all movable blocks as far right as they go, merging opposite-parity
/// neighbours from the right.
///
/// Sequences not valid for `move_blocks` are left untouched.
pub fn move_blocks(cells: &mut [CellState]) {
    let _ = try_move_blocks(cells);
}

pub fn try_move_blocks(cells: &mut [CellState]) -> Result<BlockShift> {
    if !is_valid_for_move_blocks(cells) {
        log::debug!("Rejected block shift, sequence of {} cells is not valid", cells.len());
        return Err(EngineError::InvalidForMoveBlocks);
    }

    let shift = shift_blocks(cells);
    log::debug!(
        "Shifted blocks, moved: {}, merged: {}, pearls: {}",
        shift.moved,
        shift.merged,
        shift.pearls_collected
    );
    Ok(shift)
}

fn shift_blocks(cells: &mut [CellState]) -> BlockShift {
    let mut shift = BlockShift::default();
    let boundary = cells.len() - 1;
    let mut last_open = boundary - 1;
    let mut end_search = Some(boundary - 1);

    while let Some(end) = end_search {
        let Some(found) = find_rightmost_movable_block(cells, end) else {
            break;
        };

        if found > 0 && cells[found].can_merge(cells[found - 1]) {
            log::trace!("Merged blocks at {} and {}", found - 1, found);
            cells[found] = CellState::Empty;
            cells[found - 1] = CellState::Empty;
            shift.merged += 1;
            end_search = found.checked_sub(2);
        } else {
            if found != last_open {
                log::trace!("Moved block from {} to {}", found, last_open);
                if cells[last_open] == CellState::Pearl {
                    shift.pearls_collected += 1;
                }
                cells[last_open] = cells[found];
                cells[found] = CellState::Empty;
                shift.moved += 1;
            }
            // the run only grows leftwards and never past `found`
            last_open -= 1;
            end_search = found.checked_sub(1);
        }
    }

    let disturbed_from = end_search.map_or(0, |end| end + 1);
    shift.pearls_collected += collect_pearls(cells, disturbed_from, boundary - 1);
    shift
}

/// Shifts the player from index 0 as far right as it goes and returns its new index.
///
/// Sequences not valid for `move_player` are left untouched and report index 0,
/// check `is_valid_for_move_player` first to tell that apart from a real move.
pub fn move_player(cells: &mut [CellState]) -> usize {
    try_move_player(cells).map_or(0, |shift| shift.index)
}

pub fn try_move_player(cells: &mut [CellState]) -> Result<PlayerShift> {
    if !is_valid_for_move_player(cells) {
        log::debug!("Rejected player shift, sequence of {} cells is not valid", cells.len());
        return Err(EngineError::InvalidForMovePlayer);
    }

    let shift = shift_player(cells);
    log::debug!(
        "Shifted player to {}, landing: {:?}, pearls: {}",
        shift.index,
        shift.landing,
        shift.pearls_collected
    );
    Ok(shift)
}

fn shift_player(cells: &mut [CellState]) -> PlayerShift {
    use CellState::*;

    let boundary = cells.len() - 1;
    let mut index = boundary - 1;
    let mut gates_closed = 0;
    let mut blocked = false;

    for (i, cell) in cells[..boundary].iter_mut().enumerate() {
        match *cell {
            // index 0 never holds a block in a valid sequence
            BlockOdd | BlockEven => {
                index = i - 1;
                blocked = true;
                break;
            }
            OpenGate => {
                *cell = ClosedGate;
                gates_closed += 1;
            }
            _ => {}
        }
    }

    if !blocked && cells[boundary] == SpikesAll {
        index = boundary;
    }

    let landing = match cells[index] {
        ClosedGate => {
            cells[index] = OpenGate;
            gates_closed -= 1;
            Landing::Gate
        }
        SpikesAll => Landing::Spikes,
        _ => Landing::Rest,
    };

    PlayerShift {
        index,
        pearls_collected: collect_pearls(cells, 0, index),
        gates_closed,
        landing,
    }
}

/// Plays one rightward turn: blocks settle first, then the player follows.
pub fn shift_right(cells: &mut [CellState]) -> Result<ShiftOutcome> {
    let blocks = try_move_blocks(cells)?;
    let player = try_move_player(cells)?;
    Ok(ShiftOutcome { blocks, player })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use CellState::*;

    fn seq(text: &str) -> CellSequence {
        text.parse().unwrap()
    }

    #[test]
    fn collect_pearls_only_touches_range() {
        let mut cells = seq("oo.oo#");

        assert_eq!(collect_pearls(&mut cells, 1, 3), 2);
        assert_eq!(cells.to_string(), "o...o#");
        assert_eq!(collect_pearls(&mut cells, 1, 3), 0);
        assert_eq!(collect_pearls(&mut cells, 4, 3), 0);
        assert_eq!(cells.to_string(), "o...o#");
    }

    #[test]
    #[should_panic]
    fn collect_pearls_past_end_panics() {
        let mut cells = seq(".o#");
        collect_pearls(&mut cells, 0, 3);
    }

    #[test]
    fn find_rightmost_movable_block_searches_left() {
        let cells = seq(".+.-..#");

        assert_eq!(find_rightmost_movable_block(&cells, 6), Some(3));
        assert_eq!(find_rightmost_movable_block(&cells, 3), Some(3));
        assert_eq!(find_rightmost_movable_block(&cells, 2), Some(1));
        assert_eq!(find_rightmost_movable_block(&cells, 0), None);
    }

    #[test]
    fn valid_for_move_blocks_needs_two_cells_and_open_start() {
        assert!(!is_valid_for_move_blocks(&[]));
        assert!(!is_valid_for_move_blocks(&[Wall]));
        assert!(is_valid_for_move_blocks(&seq(".#")));
        assert!(is_valid_for_move_blocks(&seq("_.#")));
        assert!(is_valid_for_move_blocks(&seq("@.#")));

        for first in ["+", "-", "|", "*", "o", "#"] {
            let text = [first, ".+#"].concat();
            assert!(!is_valid_for_move_blocks(&seq(&text)), "{text}");
        }
    }

    #[test]
    fn valid_for_move_blocks_needs_exactly_one_boundary_at_end() {
        assert!(!is_valid_for_move_blocks(&seq("..#.#")));
        assert!(!is_valid_for_move_blocks(&seq("..|.#")));
        assert!(!is_valid_for_move_blocks(&seq("....")));
        assert!(!is_valid_for_move_blocks(&seq("..+")));
        assert!(is_valid_for_move_blocks(&seq(".o.+*")));
    }

    #[test]
    fn gate_before_first_block_is_not_a_boundary() {
        assert!(is_valid_for_move_blocks(&seq("._+#")));
        assert!(is_valid_for_move_blocks(&seq(".@+.#")));
        assert!(!is_valid_for_move_blocks(&seq(".+_#")));
        assert!(!is_valid_for_move_blocks(&seq(".+@.#")));
    }

    #[test]
    fn open_terminal_needs_a_block_to_shift() {
        assert!(is_valid_for_move_blocks(&seq(".+_")));
        assert!(is_valid_for_move_blocks(&seq(".+@")));
        assert!(!is_valid_for_move_blocks(&seq(".._")));
        assert!(!is_valid_for_move_blocks(&seq("..@")));
    }

    #[test]
    fn valid_for_move_player_needs_packed_blocks() {
        assert!(is_valid_for_move_player(&seq("...#")));
        assert!(is_valid_for_move_player(&seq("..++#")));
        assert!(is_valid_for_move_player(&seq("..+-#")));
        assert!(is_valid_for_move_player(&seq("._o.-+#")));
        assert!(!is_valid_for_move_player(&seq(".+.#")));
        assert!(!is_valid_for_move_player(&seq(".+.+#")));
        assert!(!is_valid_for_move_player(&seq("+++#")));
    }

    #[test]
    fn valid_for_move_player_accepts_any_terminal_without_blocks() {
        for text in ["..o_", "..o@", "..o*", "..o#", "..o|"] {
            assert!(is_valid_for_move_player(&seq(text)), "{text}");
        }
        assert!(!is_valid_for_move_player(&seq("..o.")));
    }

    #[test]
    fn move_blocks_merges_from_the_right() {
        let mut cells = seq(".+-+#");

        let shift = try_move_blocks(&mut cells).unwrap();

        assert_eq!(cells.to_string(), "...+#");
        assert_eq!(
            shift,
            BlockShift {
                moved: 1,
                merged: 1,
                pearls_collected: 0,
            }
        );
    }

    #[test]
    fn move_blocks_chains_merges() {
        let mut cells = seq(".+-++-+#");

        let shift = try_move_blocks(&mut cells).unwrap();

        assert_eq!(cells.to_string(), ".....++#");
        assert_eq!(shift.merged, 2);
        assert_eq!(shift.moved, 2);
    }

    #[test]
    fn move_blocks_packs_same_parity_run() {
        let mut cells = seq(".+.+..+.#");

        move_blocks(&mut cells);

        assert_eq!(cells.to_string(), ".....+++#");
    }

    #[test]
    fn move_blocks_collects_pearls_blocks_pass() {
        let mut cells = seq(".o.+oo.#");

        let shift = try_move_blocks(&mut cells).unwrap();

        assert_eq!(cells.to_string(), ".o....+#");
        assert_eq!(shift.pearls_collected, 2);
        assert_eq!(cells[1], Pearl);
    }

    #[test]
    fn move_blocks_collects_pearls_behind_merged_pair() {
        let mut cells = seq(".+-.o#");

        let shift = try_move_blocks(&mut cells).unwrap();

        assert_eq!(cells.to_string(), ".....#");
        assert_eq!(shift.merged, 1);
        assert_eq!(shift.pearls_collected, 1);
    }

    #[test]
    fn move_blocks_leaves_pearls_left_of_resting_block() {
        let mut cells = vec![Empty, Pearl, BlockOdd, Wall];

        let shift = try_move_blocks(&mut cells).unwrap();

        assert_eq!(cells, vec![Empty, Pearl, BlockOdd, Wall]);
        assert!(!shift.has_update());
    }

    #[test]
    fn move_blocks_stops_at_open_terminal() {
        let mut cells = seq("._.+o_");

        let shift = try_move_blocks(&mut cells).unwrap();

        assert_eq!(cells.to_string(), "._..+_");
        assert_eq!(shift.pearls_collected, 1);
    }

    #[test]
    fn move_blocks_ignores_invalid_sequence() {
        let mut cells = seq("+..#");

        move_blocks(&mut cells);

        assert_eq!(cells.to_string(), "+..#");
        assert_eq!(
            try_move_blocks(&mut cells),
            Err(EngineError::InvalidForMoveBlocks)
        );
    }

    #[test]
    fn move_blocks_result_is_valid_for_move_player() {
        for text in [".+-+#", ".+.-o.#", "_o+..-..+@", ".-.-.+*", ".o.+-_"] {
            let mut cells = seq(text);
            move_blocks(&mut cells);
            assert!(is_valid_for_move_player(&cells), "{text} -> {cells}");
        }
    }

    #[test]
    fn move_player_stops_on_open_gate_and_keeps_it_open() {
        let mut cells = vec![Empty, OpenGate, Wall];

        let shift = try_move_player(&mut cells).unwrap();

        assert_eq!(shift.index, 1);
        assert_eq!(shift.landing, Landing::Gate);
        assert_eq!(shift.gates_closed, 0);
        assert_eq!(shift.pearls_collected, 0);
        assert_eq!(cells, vec![Empty, OpenGate, Wall]);
    }

    #[test]
    fn move_player_closes_gates_it_passes() {
        let mut cells = seq("_o_.o#");

        let shift = try_move_player(&mut cells).unwrap();

        assert_eq!(shift.index, 4);
        assert_eq!(shift.gates_closed, 2);
        assert_eq!(shift.pearls_collected, 2);
        assert_eq!(cells.to_string(), "|.|..#");
    }

    #[test]
    fn move_player_stops_before_first_block() {
        let mut cells = seq(".o_o-+#");

        let index = move_player(&mut cells);

        assert_eq!(index, 3);
        assert_eq!(cells.to_string(), "..|.-+#");
    }

    #[test]
    fn move_player_stops_on_gate_before_block() {
        let mut cells = seq("_+#");

        let shift = try_move_player(&mut cells).unwrap();

        assert_eq!(shift.index, 0);
        assert_eq!(shift.landing, Landing::Gate);
        assert_eq!(cells.to_string(), "_+#");
    }

    #[test]
    fn move_player_without_blocks_for_each_terminal() {
        let cases = [
            ("..o_", 2, Landing::Rest, "..._"),
            ("..o@", 2, Landing::Rest, "...@"),
            ("..o#", 2, Landing::Rest, "...#"),
            ("..o*", 3, Landing::Spikes, "...*"),
        ];

        for (text, index, landing, after) in cases {
            let mut cells = seq(text);
            let shift = try_move_player(&mut cells).unwrap();
            assert_eq!(shift.index, index, "{text}");
            assert_eq!(shift.landing, landing, "{text}");
            assert_eq!(shift.pearls_collected, 1, "{text}");
            assert_eq!(cells.to_string(), after, "{text}");
        }
    }

    #[test]
    fn move_player_does_not_enter_spikes_past_blocks() {
        let mut cells = seq("..o+*");

        let shift = try_move_player(&mut cells).unwrap();

        assert_eq!(shift.index, 2);
        assert!(!shift.landing.is_fatal());
        assert_eq!(cells.to_string(), "...+*");
    }

    #[test]
    fn move_player_rejects_unpacked_blocks() {
        let mut cells = seq(".o+.#");

        assert_eq!(move_player(&mut cells), 0);
        assert_eq!(cells.to_string(), ".o+.#");
        assert_eq!(
            try_move_player(&mut cells),
            Err(EngineError::InvalidForMovePlayer)
        );
    }

    #[test]
    fn shift_right_plays_blocks_then_player() {
        let mut cells = seq(".o_+o.-.+#");

        let outcome = shift_right(&mut cells).unwrap();

        assert_eq!(cells.to_string(), "..|...+-+#");
        assert_eq!(outcome.blocks.moved, 2);
        assert_eq!(outcome.player.index, 5);
        assert_eq!(outcome.pearls_collected(), 2);
    }

    #[test]
    fn shift_right_collects_pearl_left_of_resting_block() {
        let mut cells = seq(".o+#");

        let outcome = shift_right(&mut cells).unwrap();

        assert_eq!(cells.to_string(), "..+#");
        assert_eq!(outcome.blocks.pearls_collected, 0);
        assert_eq!(outcome.player.pearls_collected, 1);
        assert_eq!(outcome.player.index, 1);
    }

    #[test]
    fn shift_right_rejects_invalid_start() {
        let mut cells = seq("o.+#");

        assert_eq!(shift_right(&mut cells), Err(EngineError::InvalidForMoveBlocks));
        assert_eq!(cells.to_string(), "o.+#");
    }
}
