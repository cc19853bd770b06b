//! Constant-time equality for bearer tokens.

use subtle::ConstantTimeEq;

/// Constant-time string comparison.
///
/// Both inputs are padded to the longer length before comparing so the
/// running time depends on neither the matching prefix nor which input is
/// shorter. The pad bytes differ between the two buffers, which forces a
/// mismatch whenever the lengths differ.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let max_len = a.len().max(b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}
