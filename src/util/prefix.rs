/// Returns the number of bytes of `text` matched by `prefix` at its start.
///
/// When `ignore_case` is set, characters are compared by their lowercase
/// forms. When `partial` is set, a proper prefix of `prefix` that ends
/// where `text` stops matching is accepted too, as long as at least one
/// character matched.
pub(crate) fn match_len(
    text: &str,
    prefix: &str,
    ignore_case: bool,
    partial: bool,
) -> Option<usize> {
    if prefix.is_empty() {
        return None;
    }
    let mut consumed = 0;
    let mut chars = text.chars();
    for want in prefix.chars() {
        let Some(got) = chars.next() else {
            return (partial && consumed > 0).then_some(consumed);
        };
        let same = if ignore_case {
            got == want || got.to_lowercase().eq(want.to_lowercase())
        } else {
            got == want
        };
        if !same {
            return (partial && consumed > 0).then_some(consumed);
        }
        consumed += got.len_utf8();
    }
    Some(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_case() {
        assert_eq!(match_len("März 2024", "März", false, false), Some(5));
        assert_eq!(match_len("märz", "MÄRZ", false, false), None);
        assert_eq!(match_len("märz", "MÄRZ", true, false), Some(5));
        assert_eq!(match_len("Ma", "March", false, false), None);
        assert_eq!(match_len("", "March", false, true), None);
    }

    #[test]
    fn partial() {
        assert_eq!(match_len("Marc 1", "March", false, true), Some(4));
        assert_eq!(match_len("Mx", "March", false, true), Some(1));
        assert_eq!(match_len("x", "March", false, true), None);
    }
}
