//! Static catalog of known knots keyed by Dowker notation.

/// A known knot with a hand-checked braid representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Dowker sequence (signed) that identifies the knot.
    pub dowker: &'static [i64],
    /// Conventional name, e.g. `Trefoil Knot (3_1)`.
    pub knot_name: &'static str,
    /// Braid word representative.
    pub braid_word: &'static str,
    /// Root of unity used for the evaluation angle.
    pub root_of_unity: u32,
}

/// The process-wide knot catalog.
pub const KNOT_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        dowker: &[4, 6, 2],
        knot_name: "Trefoil Knot (3_1)",
        braid_word: "s1 s2^-1 s1 s2^-1",
        root_of_unity: 5,
    },
    CatalogEntry {
        dowker: &[4, 6, 8, 2],
        knot_name: "Figure-Eight Knot (4_1)",
        braid_word: "s1 s2^-1 s1 s2 s1^-1 s2",
        root_of_unity: 5,
    },
    CatalogEntry {
        dowker: &[6, 8, 10, 2, 4],
        knot_name: "Cinquefoil Knot (5_1)",
        braid_word: "s1 s2 s1 s2 s1 s2^-1 s1",
        root_of_unity: 5,
    },
];

/// Look up a Dowker sequence in the catalog.
pub fn lookup(dowker: &[i64]) -> Option<&'static CatalogEntry> {
    KNOT_CATALOG.iter().find(|entry| entry.dowker == dowker)
}
