/// Returns the first `(A, B)` such that `window` holds `A, B, A` at three
/// consecutive positions with `A != B`.
///
/// The scan is strictly forward and the first qualifying triple wins. Windows
/// shorter than three symbols never match.
pub fn find_alternating_pair<T: PartialEq>(window: &[T]) -> Option<(&T, &T)> {
    window.windows(3).find_map(|w| {
        let (a, b, c) = (&w[0], &w[1], &w[2]);
        (a != b && a == c).then_some((a, b))
    })
}
