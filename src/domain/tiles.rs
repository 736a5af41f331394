//! Shared tile sequence generation.
//!
//! Every participant of one game plays against the exact same randomized
//! piece sequence, so the sequence is generated once at game start and
//! broadcast, never regenerated.

use rand::Rng;

/// The seven two-character piece codes the client understands
/// ("08" is the I tile, "0C" the square, "10"/"14" the Z/S pair,
/// "18" the T).
pub const TILE_CODES: [&str; 7] = ["00", "04", "08", "0C", "10", "14", "18"];

/// Number of tile codes in one game's sequence.
pub const SEQUENCE_LEN: usize = 256;

/// Generate a fresh tile sequence: 256 codes drawn independently and
/// uniformly with replacement, concatenated into one string. Classic
/// randomization, not 7-bag.
pub fn generate_sequence() -> String {
    let mut rng = rand::rng();
    let mut seq = String::with_capacity(SEQUENCE_LEN * 2);
    for _ in 0..SEQUENCE_LEN {
        seq.push_str(TILE_CODES[rng.random_range(0..TILE_CODES.len())]);
    }
    seq
}
