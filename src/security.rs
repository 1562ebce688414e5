use subtle::ConstantTimeEq;

/// Compare a presented credential with a known one without leaking, through
/// timing, how many leading bytes matched.
///
/// Length is not secret: unequal lengths return early.
pub fn constant_time_compare(known: &str, presented: &str) -> bool {
    if known.len() != presented.len() {
        return false;
    }
    known.as_bytes().ct_eq(presented.as_bytes()).into()
}
