//! Stack-only number formatting for the log ring.
//!
//! The library must not call back into the kernel's formatting machinery
//! (`core::fmt` included — its vtables and panic paths land outside the
//! relocated code region), so log values are rendered with these two
//! helpers instead. Every function writes into a caller-provided buffer and
//! returns the formatted sub-slice. No heap, no raw pointers.
//!
//! Everything here is `#[inline(always)]`: the callers are the entry-point
//! bodies, and inlining keeps the emitted code inside the section-pinned
//! entry wrappers.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Longest decimal `u64` is 20 digits.
pub const DEC_BUF_LEN: usize = 20;

/// `0x` plus 16 hex digits.
pub const HEX_BUF_LEN: usize = 18;

/// Format a `u64` as decimal. Returns the formatted sub-slice of `buf`.
#[inline(always)]
pub fn fmt_u64(value: u64, buf: &mut [u8; DEC_BUF_LEN]) -> &[u8] {
    if value == 0 {
        buf[0] = b'0';
        return &buf[..1];
    }

    // Write digits in reverse, then shift to the front.
    let mut pos = DEC_BUF_LEN;
    let mut n = value;
    while n != 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }

    buf.copy_within(pos.., 0);
    &buf[..DEC_BUF_LEN - pos]
}

/// Format a `u64` as full-width `0x`-prefixed hex. Returns all of `buf`.
#[inline(always)]
pub fn fmt_hex_u64(value: u64, buf: &mut [u8; HEX_BUF_LEN]) -> &[u8] {
    buf[0] = b'0';
    buf[1] = b'x';
    let mut i = 0;
    while i < 16 {
        let nibble = (value >> (60 - 4 * i)) & 0xf;
        buf[2 + i] = HEX_DIGITS[nibble as usize];
        i += 1;
    }
    &buf[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_u64() {
        let mut buf = [0u8; DEC_BUF_LEN];
        assert_eq!(fmt_u64(0, &mut buf), b"0");
        let mut buf = [0u8; DEC_BUF_LEN];
        assert_eq!(fmt_u64(12345, &mut buf), b"12345");
        let mut buf = [0u8; DEC_BUF_LEN];
        assert_eq!(fmt_u64(u64::MAX, &mut buf), b"18446744073709551615");
    }

    #[test]
    fn test_fmt_hex_u64() {
        let mut buf = [0u8; HEX_BUF_LEN];
        assert_eq!(fmt_hex_u64(0, &mut buf), b"0x0000000000000000");
        let mut buf = [0u8; HEX_BUF_LEN];
        assert_eq!(fmt_hex_u64(0xdead_beef, &mut buf), b"0x00000000deadbeef");
        let mut buf = [0u8; HEX_BUF_LEN];
        assert_eq!(fmt_hex_u64(u64::MAX, &mut buf), b"0xffffffffffffffff");
    }
}
