use crate::color::{hsv_to_luv, luv_distance};
use palette::Luv;

/// A candidate dominant color and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredColor {
    hsv: (u8, u8, u8),
    luv: Luv,
    score: f32,
}

impl ScoredColor {
    pub fn new(hsv: (u8, u8, u8), score: f32) -> Self {
        Self {
            hsv,
            luv: hsv_to_luv(hsv),
            score,
        }
    }

    pub(crate) fn with_luv(hsv: (u8, u8, u8), luv: Luv, score: f32) -> Self {
        Self { hsv, luv, score }
    }

    pub fn hsv(&self) -> (u8, u8, u8) {
        self.hsv
    }

    pub fn luv(&self) -> Luv {
        self.luv
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Removes candidates that are close in LUV space to a more dominant candidate.
///
/// Candidates are visited by descending score, ties keeping their given order. The `n`th accepted color must be
/// further than `initial_min_luv_distance + min_luv_distance_increase_rate * n` from every color accepted before it,
/// so less dominant colors need to be increasingly distinct to make it into the result. Rejected candidates are not
/// reconsidered.
pub fn filter_dominant_colors(
    mut candidates: Vec<ScoredColor>,
    initial_min_luv_distance: f32,
    min_luv_distance_increase_rate: f32,
) -> Vec<ScoredColor> {
    candidates.sort_by(|lhs, rhs| rhs.score.total_cmp(&lhs.score));

    let mut accepted: Vec<ScoredColor> = Vec::new();

    for candidate in candidates {
        let threshold = initial_min_luv_distance + min_luv_distance_increase_rate * accepted.len() as f32;

        if accepted
            .iter()
            .all(|color| luv_distance(color.luv, candidate.luv) > threshold)
        {
            accepted.push(candidate);
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_descending_score() {
        let candidates = vec![
            ScoredColor::new((0, 255, 255), 0.1),
            ScoredColor::new((60, 255, 255), 0.5),
            ScoredColor::new((120, 255, 255), 0.3),
        ];

        let filtered = filter_dominant_colors(candidates, 10.0, 0.0);

        let hues = filtered.iter().map(|color| color.hsv().0).collect::<Vec<_>>();
        assert_eq!(hues, vec![60, 120, 0]);
    }

    #[test]
    fn drops_colors_close_to_more_dominant_ones() {
        let candidates = vec![
            ScoredColor::new((0, 255, 255), 0.5),
            ScoredColor::new((1, 250, 250), 0.4),
            ScoredColor::new((120, 255, 255), 0.1),
        ];

        let filtered = filter_dominant_colors(candidates, 10.0, 0.0);

        let hues = filtered.iter().map(|color| color.hsv().0).collect::<Vec<_>>();
        assert_eq!(hues, vec![0, 120]);
    }

    #[test]
    fn threshold_grows_with_every_accepted_color() {
        let red = ScoredColor::new((0, 255, 255), 0.5);
        let blue = ScoredColor::new((120, 255, 255), 0.4);
        let distance = luv_distance(red.luv(), blue.luv());

        // blue is the second color, so it needs to beat initial + rate * 1
        let kept = filter_dominant_colors(vec![red, blue], 10.0, distance - 10.0 - 1.0);
        assert_eq!(kept.len(), 2);

        let dropped = filter_dominant_colors(vec![red, blue], 10.0, distance - 10.0 + 1.0);
        assert_eq!(dropped.len(), 1);
    }

    #[test]
    fn ties_keep_production_order() {
        let first = ScoredColor::new((0, 255, 255), 0.5);
        let second = ScoredColor::new((1, 255, 255), 0.5);

        let filtered = filter_dominant_colors(vec![first, second], 10.0, 0.0);
        assert_eq!(filtered, vec![first]);

        let filtered = filter_dominant_colors(vec![second, first], 10.0, 0.0);
        assert_eq!(filtered, vec![second]);
    }
}
