//! Text layout helpers for the ASCII visualization of a list.

/// Center `s` within `width` columns, padding with `fill` and wrapping the
/// result in `border` on both sides.
///
/// When `s` is wider than `width` it is returned as-is, without borders. Odd
/// padding puts the extra column on the right.
pub(crate) fn centered(width: usize, s: &str, fill: char, border: &str) -> String {
    let len = s.chars().count();
    let Some(diff) = width.checked_sub(len) else {
        return s.to_owned();
    };
    let left = diff / 2;
    let right = diff - left;

    let mut out = String::with_capacity(width + 2 * border.len());
    out.push_str(border);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(s);
    out.extend(std::iter::repeat_n(fill, right));
    out.push_str(border);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::centered;

    #[rstest]
    #[case(10, "L3", ' ', "|", "|    L3    |")]
    #[case(10, "fantastic", ' ', "|", "|fantastic |")]
    #[case(10, "NULL", ' ', "", "   NULL   ")]
    #[case(6, "1", '-', "", "--1---")]
    #[case(7, "2", '-', "", "---2---")]
    #[case(4, "4", '-', "", "-4--")]
    #[case(2, "2", '-', "", "2-")]
    #[case(3, "abc", '.', "|", "|abc|")]
    fn pads(
        #[case] width: usize,
        #[case] s: &str,
        #[case] fill: char,
        #[case] border: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(centered(width, s, fill, border), expected);
    }

    #[test]
    fn too_wide_is_left_alone() {
        assert_eq!(centered(3, "coffee", ' ', "|"), "coffee");
    }
}
