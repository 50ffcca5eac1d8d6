//! Fixed combinatorial model of a cube: 8 corners, 12 edges, and the 26
//! ways a neighbouring cube can touch it.
//!
//! Corner positions over `(x, y, z)`, `lo`/`hi` being the cube's lower and
//! upper bound on that axis:
//!
//! ```text
//! A = (lo, hi, hi)   B = (lo, hi, lo)   C = (hi, hi, lo)   D = (hi, hi, hi)
//! E = (lo, lo, hi)   F = (lo, lo, lo)   G = (hi, lo, lo)   H = (hi, lo, hi)
//! ```
//!
//! The top face is `ABCD`, the bottom face `EFGH`, and `AE`, `BF`, `CG`, `DH`
//! are the vertical edges.

use std::fmt;

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in `x, y, z` order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Index of the axis into a coordinate triple.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which bound of a cube along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Low,
    High,
}

impl Side {
    /// Grid offset pointing from the cube towards this side.
    #[must_use]
    pub fn sign(self) -> i64 {
        match self {
            Self::Low => -1,
            Self::High => 1,
        }
    }

    /// The other side.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// A cube corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Corner {
    /// All corners in label order.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Bound taken on each axis, in `x, y, z` order.
    #[must_use]
    pub fn sides(self) -> [Side; 3] {
        use Side::{High, Low};
        match self {
            Self::A => [Low, High, High],
            Self::B => [Low, High, Low],
            Self::C => [High, High, Low],
            Self::D => [High, High, High],
            Self::E => [Low, Low, High],
            Self::F => [Low, Low, Low],
            Self::G => [High, Low, Low],
            Self::H => [High, Low, High],
        }
    }
}

/// One of the 12 cube edges, named by its two corners.
///
/// The discriminant is the edge's slot in per-cube edge records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CubeEdge {
    AB,
    BC,
    CD,
    DA,
    EF,
    FG,
    GH,
    HE,
    AE,
    BF,
    CG,
    DH,
}

/// Neighbours that may share each edge: the diagonal neighbour across the
/// edge, then the two face neighbours.
const EDGE_NEIGHBORS: [[Connection; 3]; 12] = {
    use Connection::{Back, Bottom, Front, Left, Right, Top};
    [
        [Connection::AB, Left, Top],
        [Connection::BC, Back, Top],
        [Connection::CD, Right, Top],
        [Connection::DA, Front, Top],
        [Connection::EF, Left, Bottom],
        [Connection::FG, Back, Bottom],
        [Connection::GH, Right, Bottom],
        [Connection::HE, Front, Bottom],
        [Connection::AE, Left, Front],
        [Connection::BF, Left, Back],
        [Connection::CG, Right, Back],
        [Connection::DH, Right, Front],
    ]
};

/// The edge slot on each neighbour of [`EDGE_NEIGHBORS`] that coincides
/// with the edge.
const COMPLEMENTARY_EDGES: [[CubeEdge; 3]; 12] = {
    use CubeEdge::{AB, AE, BC, BF, CD, CG, DA, DH, EF, FG, GH, HE};
    [
        [GH, CD, EF],
        [HE, DA, FG],
        [EF, AB, GH],
        [FG, BC, HE],
        [CD, GH, AB],
        [DA, HE, BC],
        [AB, EF, CD],
        [BC, FG, DA],
        [CG, DH, BF],
        [DH, CG, AE],
        [AE, BF, DH],
        [BF, AE, CG],
    ]
};

impl CubeEdge {
    /// Number of edges of a cube.
    pub const COUNT: usize = 12;

    /// All edges in slot order.
    pub const ALL: [Self; 12] = [
        Self::AB,
        Self::BC,
        Self::CD,
        Self::DA,
        Self::EF,
        Self::FG,
        Self::GH,
        Self::HE,
        Self::AE,
        Self::BF,
        Self::CG,
        Self::DH,
    ];

    /// Slot of this edge in per-cube records.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two corners joined by this edge.
    #[must_use]
    pub fn corners(self) -> (Corner, Corner) {
        use Corner::{A, B, C, D, E, F, G, H};
        match self {
            Self::AB => (A, B),
            Self::BC => (B, C),
            Self::CD => (C, D),
            Self::DA => (D, A),
            Self::EF => (E, F),
            Self::FG => (F, G),
            Self::GH => (G, H),
            Self::HE => (H, E),
            Self::AE => (A, E),
            Self::BF => (B, F),
            Self::CG => (C, G),
            Self::DH => (D, H),
        }
    }

    /// The axis the edge runs along.
    #[must_use]
    pub fn free_axis(self) -> Axis {
        match self {
            Self::AB | Self::CD | Self::EF | Self::GH => Axis::Z,
            Self::BC | Self::DA | Self::FG | Self::HE => Axis::X,
            Self::AE | Self::BF | Self::CG | Self::DH => Axis::Y,
        }
    }

    /// The two axes held at a cube bound along this edge, with their bound.
    #[must_use]
    pub fn fixed(self) -> [(Axis, Side); 2] {
        let sides = self.corners().0.sides();
        let free = self.free_axis();
        let mut fixed = [(Axis::X, Side::Low); 2];
        let mut n = 0;
        for axis in Axis::ALL {
            if axis != free {
                fixed[n] = (axis, sides[axis.index()]);
                n += 1;
            }
        }
        fixed
    }

    /// Connection types of the neighbours that may share this edge.
    #[must_use]
    pub fn sharing_neighbors(self) -> [Connection; 3] {
        EDGE_NEIGHBORS[self.index()]
    }

    /// Edge slot on each of [`Self::sharing_neighbors`] that coincides with this edge.
    #[must_use]
    pub fn complementary_edges(self) -> [CubeEdge; 3] {
        COMPLEMENTARY_EDGES[self.index()]
    }
}

impl fmt::Display for CubeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a neighbouring cube touches a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Shares one edge.
    Edge,
    /// Shares one corner.
    Corner,
    /// Shares one face.
    Face,
}

/// Symbolic connection type of one of the 26 cubes around a cube.
///
/// Edge connections carry the name of the shared edge. Corner connections
/// are named by the three corners around the shared one (`ABC` shares `B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connection {
    AB,
    BC,
    CD,
    DA,
    EF,
    FG,
    GH,
    HE,
    AE,
    BF,
    CG,
    DH,
    ABC,
    BCD,
    CDA,
    DAB,
    EFG,
    FGH,
    GHE,
    HEF,
    Left,
    Back,
    Right,
    Front,
    Top,
    Bottom,
}

/// Connection type by grid offset, indexed `[dx + 1][dy + 1][dz + 1]`.
const OFFSET_TABLE: [[[Option<Connection>; 3]; 3]; 3] = {
    use Connection::{
        Back, Bottom, Front, Left, Right, Top, AB, ABC, AE, BC, BCD, BF, CD, CDA, CG, DA, DAB, DH,
        EF, EFG, FG, FGH, GH, GHE, HE, HEF,
    };
    [
        [
            [Some(EFG), Some(EF), Some(HEF)],
            [Some(BF), Some(Left), Some(AE)],
            [Some(ABC), Some(AB), Some(DAB)],
        ],
        [
            [Some(FG), Some(Bottom), Some(HE)],
            [Some(Back), None, Some(Front)],
            [Some(BC), Some(Top), Some(DA)],
        ],
        [
            [Some(FGH), Some(GH), Some(GHE)],
            [Some(CG), Some(Right), Some(DH)],
            [Some(BCD), Some(CD), Some(CDA)],
        ],
    ]
};

impl Connection {
    /// Number of neighbours around a cube.
    pub const COUNT: usize = 26;

    /// All connection types in slot order.
    pub const ALL: [Self; 26] = [
        Self::AB,
        Self::BC,
        Self::CD,
        Self::DA,
        Self::EF,
        Self::FG,
        Self::GH,
        Self::HE,
        Self::AE,
        Self::BF,
        Self::CG,
        Self::DH,
        Self::ABC,
        Self::BCD,
        Self::CDA,
        Self::DAB,
        Self::EFG,
        Self::FGH,
        Self::GHE,
        Self::HEF,
        Self::Left,
        Self::Back,
        Self::Right,
        Self::Front,
        Self::Top,
        Self::Bottom,
    ];

    /// Slot of this connection in per-cube neighbour records.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up the connection type of the cube at grid offset `(dx, dy, dz)`.
    ///
    /// Returns `None` for the centre and for offsets outside `-1..=1`.
    #[must_use]
    pub fn from_offset(dx: i64, dy: i64, dz: i64) -> Option<Self> {
        let slot = |d: i64| usize::try_from(d.checked_add(1)?).ok().filter(|&i| i < 3);
        OFFSET_TABLE[slot(dx)?][slot(dy)?][slot(dz)?]
    }

    /// Grid offset `(dx, dy, dz)` of the neighbour with this connection type.
    #[must_use]
    pub fn offset(self) -> [i64; 3] {
        match self {
            Self::AB => [-1, 1, 0],
            Self::BC => [0, 1, -1],
            Self::CD => [1, 1, 0],
            Self::DA => [0, 1, 1],
            Self::EF => [-1, -1, 0],
            Self::FG => [0, -1, -1],
            Self::GH => [1, -1, 0],
            Self::HE => [0, -1, 1],
            Self::AE => [-1, 0, 1],
            Self::BF => [-1, 0, -1],
            Self::CG => [1, 0, -1],
            Self::DH => [1, 0, 1],
            Self::ABC => [-1, 1, -1],
            Self::BCD => [1, 1, -1],
            Self::CDA => [1, 1, 1],
            Self::DAB => [-1, 1, 1],
            Self::EFG => [-1, -1, -1],
            Self::FGH => [1, -1, -1],
            Self::GHE => [1, -1, 1],
            Self::HEF => [-1, -1, 1],
            Self::Left => [-1, 0, 0],
            Self::Back => [0, 0, -1],
            Self::Right => [1, 0, 0],
            Self::Front => [0, 0, 1],
            Self::Top => [0, 1, 0],
            Self::Bottom => [0, -1, 0],
        }
    }

    /// The connection type this cube has as seen from the neighbour.
    #[must_use]
    pub fn opposite(self) -> Self {
        let [dx, dy, dz] = self.offset();
        // Every non-centre offset has an entry, so negation always resolves.
        Self::from_offset(-dx, -dy, -dz).unwrap_or(self)
    }

    /// Whether the neighbour shares an edge, a corner, or a face.
    #[must_use]
    pub fn kind(self) -> ConnectionKind {
        match self.index() {
            0..=11 => ConnectionKind::Edge,
            12..=19 => ConnectionKind::Corner,
            _ => ConnectionKind::Face,
        }
    }

    /// The shared edge, for edge connections.
    #[must_use]
    pub fn edge(self) -> Option<CubeEdge> {
        CubeEdge::ALL.get(self.index()).copied()
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
