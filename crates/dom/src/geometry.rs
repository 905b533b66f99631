/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
	pub left: f32,
	pub top: f32,
	pub width: f32,
	pub height: f32,
}

impl Rect {
	pub fn new(left: f32, top: f32, width: f32, height: f32) -> Rect {
		Rect {
			left,
			top,
			width,
			height,
		}
	}

	/// The zero rectangle, used for undisplayed elements.
	pub const ZERO: Rect = Rect {
		left: 0.0,
		top: 0.0,
		width: 0.0,
		height: 0.0,
	};

	pub fn right(&self) -> f32 {
		self.left + self.width
	}

	pub fn bottom(&self) -> f32 {
		self.top + self.height
	}

	/// Center point of the rectangle.
	pub fn center(&self) -> (f32, f32) {
		(self.left + self.width / 2.0, self.top + self.height / 2.0)
	}

	/// Zero-area rectangles have no rendered box.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	pub fn contains_point(&self, x: f32, y: f32) -> bool {
		x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
	}

	/// Whether two rectangles overlap at all.
	pub fn intersects(&self, other: &Rect) -> bool {
		self.left < other.right() && self.right() > other.left && self.top < other.bottom() && self.bottom() > other.top
	}
}
