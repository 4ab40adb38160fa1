use std::fmt;

use pearls_core::{BlockShift, CellSequence, PlayerShift, ShiftOutcome};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub(crate) before: CellSequence,
    pub(crate) after: CellSequence,
    #[serde(flatten)]
    pub(crate) detail: Detail,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub(crate) enum Detail {
    Check {
        valid_for_move_blocks: bool,
        valid_for_move_player: bool,
    },
    Blocks(BlockShift),
    Player(PlayerShift),
    Shift(ShiftOutcome),
}

fn write_blocks(f: &mut fmt::Formatter<'_>, shift: &BlockShift) -> fmt::Result {
    writeln!(
        f,
        "blocks: {} moved, {} merged, {} pearls",
        shift.moved, shift.merged, shift.pearls_collected
    )
}

fn write_player(f: &mut fmt::Formatter<'_>, shift: &PlayerShift) -> fmt::Result {
    writeln!(
        f,
        "player: index {} ({:?}), {} pearls, {} gates closed",
        shift.index, shift.landing, shift.pearls_collected, shift.gates_closed
    )
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Detail::Check {
                valid_for_move_blocks,
                valid_for_move_player,
            } => {
                writeln!(f, "{}", self.before)?;
                writeln!(f, "valid for blocks: {valid_for_move_blocks}")?;
                writeln!(f, "valid for player: {valid_for_move_player}")
            }
            Detail::Blocks(shift) => {
                writeln!(f, "{}", self.after)?;
                write_blocks(f, shift)
            }
            Detail::Player(shift) => {
                writeln!(f, "{}", self.after)?;
                write_player(f, shift)
            }
            Detail::Shift(outcome) => {
                writeln!(f, "{}", self.after)?;
                write_blocks(f, &outcome.blocks)?;
                write_player(f, &outcome.player)
            }
        }
    }
}
