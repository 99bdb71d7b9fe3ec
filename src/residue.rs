use std::fmt::Debug;
use std::hash::Hash;

/// Symbol used for gap columns in rendered alignments. Never a residue.
pub const GAP_SYMBOL: u8 = b'-';

/// A symbol from a fixed alphabet.
///
/// The engine is generic over this trait and only needs the byte symbol of a
/// residue to find its row/column in a [`ScoringMatrix`](crate::ScoringMatrix).
pub trait Residue: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn from_symbol(symbol: u8) -> Option<Self>;

    fn symbol(self) -> u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
    U,
    N,
}

impl Nucleotide {
    pub const ALL: [Nucleotide; 6] = [
        Nucleotide::A,
        Nucleotide::C,
        Nucleotide::G,
        Nucleotide::T,
        Nucleotide::U,
        Nucleotide::N,
    ];
}

impl Residue for Nucleotide {
    fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            b'A' => Some(Nucleotide::A),
            b'C' => Some(Nucleotide::C),
            b'G' => Some(Nucleotide::G),
            b'T' => Some(Nucleotide::T),
            b'U' => Some(Nucleotide::U),
            b'N' => Some(Nucleotide::N),
            _ => None,
        }
    }

    fn symbol(self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::C => b'C',
            Nucleotide::G => b'G',
            Nucleotide::T => b'T',
            Nucleotide::U => b'U',
            Nucleotide::N => b'N',
        }
    }
}

/// The 20 standard amino acids plus the ambiguity codes B (Asx), Z (Glx),
/// X (unknown) and the stop symbol `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Asx,
    Glx,
    Xaa,
    Stop,
}

// Same order as the rows of the bundled BLOSUM tables.
const AMINO_SYMBOLS: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

impl AminoAcid {
    pub const ALL: [AminoAcid; 24] = [
        AminoAcid::Ala,
        AminoAcid::Arg,
        AminoAcid::Asn,
        AminoAcid::Asp,
        AminoAcid::Cys,
        AminoAcid::Gln,
        AminoAcid::Glu,
        AminoAcid::Gly,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Leu,
        AminoAcid::Lys,
        AminoAcid::Met,
        AminoAcid::Phe,
        AminoAcid::Pro,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Trp,
        AminoAcid::Tyr,
        AminoAcid::Val,
        AminoAcid::Asx,
        AminoAcid::Glx,
        AminoAcid::Xaa,
        AminoAcid::Stop,
    ];
}

impl Residue for AminoAcid {
    fn from_symbol(symbol: u8) -> Option<Self> {
        let symbol = symbol.to_ascii_uppercase();
        AMINO_SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(|idx| AminoAcid::ALL[idx])
    }

    fn symbol(self) -> u8 {
        AMINO_SYMBOLS[self as usize]
    }
}

/// Raw bytes, for callers that keep sequences as ASCII text. Any byte other
/// than the gap symbol is accepted; the scoring matrix decides which ones are
/// actually scorable.
impl Residue for u8 {
    fn from_symbol(symbol: u8) -> Option<Self> {
        if symbol == GAP_SYMBOL {
            None
        } else {
            Some(symbol)
        }
    }

    fn symbol(self) -> u8 {
        self
    }
}
