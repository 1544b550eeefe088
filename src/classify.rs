//! Cell classification: integer, real or plain text.
//!
//! Both probes require the whole token to be consumed by the numeric parse
//! and reject out-of-range input. A token that fits neither probe is text.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellKind {
    Integer(i32),
    Real(f32),
    Text,
}

/// Parses a base-10 signed 32-bit integer. Leading `+`/`-` is accepted;
/// whitespace, digit separators and out-of-range values are not.
pub fn parse_integer(token: &str) -> Option<i32> {
    token.parse::<i32>().ok()
}

/// Parses a 32-bit float. Overflow to infinity and the `inf`/`nan` literals
/// are rejected, as is underflow: a non-zero literal that lands on zero or in
/// the subnormal range.
pub fn parse_real(token: &str) -> Option<f32> {
    let value = token.parse::<f32>().ok()?;
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return (!has_nonzero_mantissa(token)).then_some(value);
    }
    value.is_normal().then_some(value)
}

/// Integer probe first; the real probe only runs when it fails.
pub fn classify(token: &str) -> CellKind {
    if let Some(value) = parse_integer(token) {
        return CellKind::Integer(value);
    }
    if let Some(value) = parse_real(token) {
        return CellKind::Real(value);
    }
    CellKind::Text
}

fn has_nonzero_mantissa(token: &str) -> bool {
    token
        .bytes()
        .take_while(|b| !matches!(b, b'e' | b'E'))
        .any(|b| matches!(b, b'1'..=b'9'))
}
