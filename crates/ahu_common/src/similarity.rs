//! Gestalt (Ratcliff/Obershelp) string similarity.
//!
//! Find the longest common contiguous block, recurse on what lies left and
//! right of it, and count the matched characters `M`. The ratio is
//! `2M / (len(a) + len(b))`. Lengths are in chars, not bytes.
//!
//! The scan order of `longest_match` decides which block wins a tie, and
//! that choice changes `M` for some inputs. It is the classic
//! SequenceMatcher order: the block ending earliest in `a`, then earliest
//! in `b`. No junk heuristics are applied.

/// A matching block: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns a zero-sized block at `(alo, blo)` when the windows share nothing.
pub fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Block {
    let mut best = Block { a: alo, b: blo, size: 0 };
    let width = bhi.saturating_sub(blo);
    if width == 0 {
        return best;
    }

    // run[j - blo] = length of the common suffix ending at (i, j)
    let mut prev = vec![0usize; width];
    let mut curr = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let off = j - blo;
            if a[i] == b[j] {
                let k = if off == 0 { 1 } else { prev[off - 1] + 1 };
                curr[off] = k;
                if k > best.size {
                    best = Block {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            } else {
                curr[off] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// All matching blocks, ordered by position in `a`
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(a, b, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }
        if alo < block.a && blo < block.b {
            queue.push((alo, block.a, blo, block.b));
        }
        if block.a + block.size < ahi && block.b + block.size < bhi {
            queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
        }
        blocks.push(block);
    }

    blocks.sort_by_key(|blk| (blk.a, blk.b));
    blocks
}

/// Total matched characters `M` over all matching blocks
pub fn matching_characters(a: &[char], b: &[char]) -> usize {
    matching_blocks(a, b).iter().map(|blk| blk.size).sum()
}

/// Similarity of two char sequences in `[0, 1]`
pub fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(a, b) as f64 / total as f64
}

/// Similarity of two strings in `[0, 1]`
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}
