use serde::{Deserialize, Serialize};

/// One OCR-recognized text fragment with its pixel bounding box.
///
/// `confidence` is whatever the OCR engine reported (0-100). It is carried
/// through every stage but never used to drop or weight a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub confidence: f64,
}

impl Token {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        (x, y): (i64, i64),
        (width, height): (i64, i64),
        confidence: f64,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    #[must_use]
    pub fn left(&self) -> i64 {
        self.x
    }

    /// Saturates at `i64::MAX` for boxes that run off the coordinate range.
    #[must_use]
    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    #[must_use]
    pub fn top(&self) -> i64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// True when the shared horizontal span exceeds `tolerance` times the
    /// narrower token's width.
    #[must_use]
    pub fn overlaps_horizontally(&self, other: &Token, tolerance: f64) -> bool {
        let overlap = self
            .right()
            .min(other.right())
            .saturating_sub(self.left().max(other.left()));
        let min_width = self.width.min(other.width);
        overlap as f64 > min_width as f64 * tolerance
    }

    /// Vertical counterpart of [`Token::overlaps_horizontally`].
    #[must_use]
    pub fn overlaps_vertically(&self, other: &Token, tolerance: f64) -> bool {
        let overlap = self
            .bottom()
            .min(other.bottom())
            .saturating_sub(self.top().max(other.top()));
        let min_height = self.height.min(other.height);
        overlap as f64 > min_height as f64 * tolerance
    }

    /// Euclidean distance between the two top-left corners.
    #[must_use]
    pub fn distance_to(&self, other: &Token) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::Token;

    fn token(x: i64, y: i64, width: i64, height: i64) -> Token {
        Token::new("t", (x, y), (width, height), 90.0)
    }

    #[test]
    fn edges_follow_origin_and_size() {
        let t = token(10, 20, 30, 40);
        assert_eq!((t.left(), t.right()), (10, 40));
        assert_eq!((t.top(), t.bottom()), (20, 60));
    }

    #[test]
    fn horizontal_overlap_needs_more_than_half_of_narrower_width() {
        let a = token(0, 0, 100, 10);
        let half = token(50, 0, 100, 10);
        let more = token(49, 0, 100, 10);
        assert!(!a.overlaps_horizontally(&half, 0.5));
        assert!(a.overlaps_horizontally(&more, 0.5));
    }

    #[test]
    fn horizontal_overlap_is_symmetric() {
        let pairs = [
            (token(0, 0, 100, 10), token(40, 50, 20, 10)),
            (token(0, 0, 10, 10), token(200, 0, 10, 10)),
            (token(30, 0, 60, 10), token(0, 0, 50, 10)),
            (token(0, 0, 0, 10), token(0, 0, 10, 10)),
        ];
        for (a, b) in &pairs {
            assert_eq!(
                a.overlaps_horizontally(b, 0.5),
                b.overlaps_horizontally(a, 0.5)
            );
        }
    }

    #[test]
    fn contained_narrow_token_overlaps_wide_one() {
        let wide = token(0, 0, 300, 10);
        let narrow = token(120, 40, 20, 10);
        assert!(wide.overlaps_horizontally(&narrow, 0.5));
    }

    #[test]
    fn vertical_overlap_uses_heights() {
        let a = token(0, 0, 10, 20);
        let b = token(100, 5, 10, 20);
        let c = token(100, 15, 10, 20);
        assert!(a.overlaps_vertically(&b, 0.5));
        assert!(!a.overlaps_vertically(&c, 0.5));
    }

    #[test]
    fn distance_between_origins() {
        let a = token(0, 0, 10, 10);
        let b = token(3, 4, 50, 50);
        assert!((a.distance_to(&b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn edges_saturate_at_the_coordinate_limit() {
        let far = token(9_223_372_036_854_775_000, 9_223_372_036_854_775_000, 5000, 10);
        assert_eq!(far.right(), i64::MAX);
        assert_eq!(far.bottom(), 9_223_372_036_854_775_010);

        let neighbour = token(9_223_372_036_854_775_000, 0, 5000, 10);
        assert!(far.overlaps_horizontally(&neighbour, 0.1));
        assert!(!far.overlaps_horizontally(&neighbour, 0.5));
        assert!(!far.overlaps_vertically(&token(i64::MIN, i64::MIN, 10, 10), 0.5));
        assert!(far.distance_to(&neighbour).is_finite());
    }
}
