//! Rectangle types for texture regions.
//!
//! Rectangles are anchored at their bottom-left corner (`left`, `bottom`)
//! with y growing upwards. Width and height may be negative: a negative
//! extent describes a mirrored region that runs from the anchor towards
//! smaller coordinates.

/// An integer rectangle in texel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub const fn new(left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// A rect covering `width` x `height` texels from the origin.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    pub const fn top(&self) -> i32 {
        self.bottom + self.height
    }

    /// Same region, mirrored along the vertical axis.
    pub const fn flipped_horizontal(self) -> Self {
        Self::new(self.left + self.width, self.bottom, -self.width, self.height)
    }

    /// Same region, mirrored along the horizontal axis.
    pub const fn flipped_vertical(self) -> Self {
        Self::new(self.left, self.bottom + self.height, self.width, -self.height)
    }

    pub fn to_float(self) -> FloatRect {
        FloatRect::new(
            self.left as f32,
            self.bottom as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// A floating point rectangle, usually in texel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl FloatRect {
    pub const fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let rect = IntRect::new(4, 8, 16, 32);
        assert_eq!(rect.right(), 20);
        assert_eq!(rect.top(), 40);
    }

    #[test]
    fn test_flips_cover_same_region() {
        let rect = IntRect::new(0, 0, 32, 16);

        let h = rect.flipped_horizontal();
        assert_eq!(h, IntRect::new(32, 0, -32, 16));
        assert_eq!(h.right(), rect.left);

        let v = rect.flipped_vertical();
        assert_eq!(v, IntRect::new(0, 16, 32, -16));
        assert_eq!(v.top(), rect.bottom);

        assert_eq!(h.flipped_horizontal(), rect);
    }

    #[test]
    fn test_to_float() {
        let rect = IntRect::new(-2, 3, 5, -7).to_float();
        assert_eq!(rect, FloatRect::new(-2.0, 3.0, 5.0, -7.0));
        assert_eq!(rect.right(), 3.0);
        assert_eq!(rect.top(), -4.0);
    }
}
