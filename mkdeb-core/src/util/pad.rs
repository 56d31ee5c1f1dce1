/// Block size used when summing the installed size.
pub const BLOCK_SHIFT: u32 = 12;

/// Round `size` up to a multiple of `1 << shift`. `None` on overflow.
pub fn pad(size: u64, shift: u32) -> Option<u64> {
    let mask = (1u64 << shift) - 1;
    size.checked_add(mask).map(|n| n & !mask)
}
