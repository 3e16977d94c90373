//! Axis-aligned rectangles in screen space.

/// A rectangle with a top-left origin; `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn midtop(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y)
    }

    pub fn midbottom(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.bottom())
    }

    pub fn set_midtop(&mut self, (cx, top): (f32, f32)) {
        self.x = cx - self.width / 2.0;
        self.y = top;
    }

    pub fn set_midbottom(&mut self, (cx, bottom): (f32, f32)) {
        self.x = cx - self.width / 2.0;
        self.y = bottom - self.height;
    }

    pub fn set_center(&mut self, (cx, cy): (f32, f32)) {
        self.x = cx - self.width / 2.0;
        self.y = cy - self.height / 2.0;
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn colliderect(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn collidepoint(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.colliderect(&b));

        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.colliderect(&c));
        assert!(c.colliderect(&a));
    }

    #[test]
    fn test_anchor_setters() {
        let mut r = Rect::new(0.0, 0.0, 60.0, 48.0);
        r.set_midbottom((600.0, 800.0));
        assert_eq!(r.x, 570.0);
        assert_eq!(r.bottom(), 800.0);

        r.set_center((100.0, 100.0));
        assert_eq!(r.center(), (100.0, 100.0));
    }

    #[test]
    fn test_collidepoint_is_half_open() {
        let r = Rect::new(500.0, 375.0, 200.0, 50.0);
        assert!(r.collidepoint(500.0, 375.0));
        assert!(r.collidepoint(699.0, 424.0));
        assert!(!r.collidepoint(700.0, 400.0));
    }
}
