/// Day-over-day increments of a cumulative series.
///
/// The first day has nothing to subtract and is passed through. Downward
/// revisions in the cumulative source clamp to zero instead of producing
/// negative daily counts.
pub fn daily_deltas(cumulative: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(cumulative.len());
    if let Some(&first) = cumulative.first() {
        out.push(first);
    }
    out.extend(
        cumulative
            .windows(2)
            .map(|w| (w[1] - w[0]).max(0.0)),
    );
    out
}
