//! Merging of per-query pixel signals into display colors.

use super::query::Query;
use super::PixelSignal;
use crate::model::Rgb;

/// Color shown when a match code has no owning query.
const ORPHAN_COLOR: Rgb = Rgb::grey(255);

/// Combines the signal arrays of every active query into one color per pixel.
///
/// `owners` lists the queries that produced `signals`, in registration
/// order. With `paired` set, `signals` holds a forward and a
/// reverse-complement array per owner, so array `k` belongs to
/// `owners[k / 2]`.
///
/// All arrays are read at the length of the first one (missing pixels
/// count as `Grey(0)`); with no arrays at all, `empty_len` black pixels
/// are produced. At each pixel the arrays are scanned in order and the
/// first match code found wins, even if a later array holds a stronger
/// one.
pub fn combine(
    signals: &[Vec<PixelSignal>],
    owners: &[&Query],
    paired: bool,
    empty_len: usize,
) -> Vec<Rgb> {
    let length = signals.first().map_or(empty_len, Vec::len);
    let mut output = Vec::with_capacity(length);

    for i in 0..length {
        let mut score = PixelSignal::default();
        let mut winner = 0;
        for (k, row) in signals.iter().enumerate() {
            score = score.max(row.get(i).copied().unwrap_or_default());
            if score.is_match() {
                winner = if paired { k / 2 } else { k };
                break;
            }
        }

        let color = match score {
            PixelSignal::Grey(v) => Rgb::grey(v),
            PixelSignal::NearMatch => owners.get(winner).map_or(ORPHAN_COLOR, |q| q.near_color),
            PixelSignal::StrongMatch => owners.get(winner).map_or(ORPHAN_COLOR, |q| q.strong_color),
        };
        output.push(color);
    }

    output
}
