use serde::{Deserialize, Serialize};

/// Parity of a movable block, two blocks of opposite parity annihilate when they meet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Odd => Self::Even,
            Self::Even => Self::Odd,
        }
    }
}

/// State of a single cell in a sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Wall,
    Pearl,
    BlockOdd,
    BlockEven,
    OpenGate,
    ClosedGate,
    SpikesAll,
    Portal,
}

impl CellState {
    pub const ALL: [CellState; 9] = [
        CellState::Empty,
        CellState::Wall,
        CellState::Pearl,
        CellState::BlockOdd,
        CellState::BlockEven,
        CellState::OpenGate,
        CellState::ClosedGate,
        CellState::SpikesAll,
        CellState::Portal,
    ];

    pub const fn is_movable(self) -> bool {
        self.parity().is_some()
    }

    pub const fn parity(self) -> Option<Parity> {
        use CellState::*;
        match self {
            BlockOdd => Some(Parity::Odd),
            BlockEven => Some(Parity::Even),
            Empty => None,
            Wall => None,
            Pearl => None,
            OpenGate => None,
            ClosedGate => None,
            SpikesAll => None,
            Portal => None,
        }
    }

    pub const fn is_gate(self) -> bool {
        matches!(self, Self::OpenGate | Self::ClosedGate)
    }

    /// Whether two cells are movable blocks of opposite parity.
    pub const fn can_merge(self, other: Self) -> bool {
        match (self.parity(), other.parity()) {
            (Some(Parity::Odd), Some(Parity::Even)) => true,
            (Some(Parity::Even), Some(Parity::Odd)) => true,
            _ => false,
        }
    }

    /// Whether this cell stops motion.
    ///
    /// Open gates and portals only hold back movable blocks, so they count as
    /// boundaries only while the sequence has a movable block in it.
    pub const fn is_boundary(self, has_movable: bool) -> bool {
        use CellState::*;
        match self {
            Wall => true,
            ClosedGate => true,
            SpikesAll => true,
            OpenGate => has_movable,
            Portal => has_movable,
            Empty => false,
            Pearl => false,
            BlockOdd => false,
            BlockEven => false,
        }
    }

    pub const fn symbol(self) -> char {
        use CellState::*;
        match self {
            Empty => '.',
            Wall => '#',
            Pearl => 'o',
            BlockOdd => '+',
            BlockEven => '-',
            OpenGate => '_',
            ClosedGate => '|',
            SpikesAll => '*',
            Portal => '@',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        use CellState::*;
        Some(match symbol {
            '.' => Empty,
            '#' => Wall,
            'o' => Pearl,
            '+' => BlockOdd,
            '-' => BlockEven,
            '_' => OpenGate,
            '|' => ClosedGate,
            '*' => SpikesAll,
            '@' => Portal,
            _ => return None,
        })
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<Parity> for CellState {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::Odd => Self::BlockOdd,
            Parity::Even => Self::BlockEven,
        }
    }
}
