use log::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned rectangle given by its top-left and bottom-right corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
	pub min: Point,
	pub max: Point,
}

impl Extent {
	pub fn from_size(width: f64, height: f64) -> Self {
		Self {
			min: Point::new(0.0, 0.0),
			max: Point::new(width, height),
		}
	}
}

/// Scale-then-translate mapping from model space to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	pub fn apply(&self, p: Point) -> Point {
		Point::new(self.apply_x(p.x), self.apply_y(p.y))
	}

	pub fn apply_x(&self, x: f64) -> f64 {
		x * self.k + self.x
	}

	pub fn apply_y(&self, y: f64) -> f64 {
		y * self.k + self.y
	}

	/// Screen point back to model space; used for hit-testing and drag deltas.
	pub fn invert(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Translate by a model-space offset.
	fn translate(&self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + self.k * dx,
			y: self.y + self.k * dy,
			k: self.k,
		}
	}
}

/// How `WheelEvent::delta_y` is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaMode {
	Pixel,
	Line,
	Page,
}

impl From<u32> for DeltaMode {
	fn from(mode: u32) -> Self {
		match mode {
			0 => Self::Pixel,
			1 => Self::Line,
			_ => Self::Page,
		}
	}
}

/// Zoom/pan gesture rules: scale limits and the viewport extent.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomBehavior {
	pub extent: Extent,
	pub scale_extent: (f64, f64),
	/// Model-space region the viewport may not leave; unbounded when `None`.
	pub translate_extent: Option<Extent>,
}

impl ZoomBehavior {
	pub fn new(width: f64, height: f64, min_scale: f64, max_scale: f64) -> Self {
		Self {
			extent: Extent::from_size(width, height),
			scale_extent: (min_scale, max_scale),
			translate_extent: None,
		}
	}

	pub fn clamp_scale(&self, k: f64) -> f64 {
		let clamped = k.max(self.scale_extent.0).min(self.scale_extent.1);
		if clamped != k {
			debug!("zoom scale {} clamped to {}", k, clamped);
		}
		clamped
	}

	/// Rescale so that the model point under `anchor` stays put.
	pub fn scale_to(&self, t: &ViewTransform, k: f64, anchor: Point) -> ViewTransform {
		let model = t.invert(anchor);
		let k = self.clamp_scale(k);
		let scaled = ViewTransform {
			x: anchor.x - model.x * k,
			y: anchor.y - model.y * k,
			k,
		};
		self.constrain(&scaled)
	}

	pub fn wheel(
		&self,
		t: &ViewTransform,
		delta_y: f64,
		mode: DeltaMode,
		anchor: Point,
	) -> ViewTransform {
		let multiplier = match mode {
			DeltaMode::Pixel => 0.002,
			DeltaMode::Line => 0.05,
			DeltaMode::Page => 1.0,
		};
		let factor = 2f64.powf(-delta_y * multiplier);
		self.scale_to(t, t.k * factor, anchor)
	}

	/// Pan by a screen-space offset.
	pub fn pan(&self, t: &ViewTransform, dx: f64, dy: f64) -> ViewTransform {
		self.constrain(&ViewTransform {
			x: t.x + dx,
			y: t.y + dy,
			k: t.k,
		})
	}

	/// Keep the visible extent inside `translate_extent`, centering it when
	/// the viewport is larger than the allowed region.
	pub fn constrain(&self, t: &ViewTransform) -> ViewTransform {
		let Some(bounds) = self.translate_extent else {
			return *t;
		};
		let lo = t.invert(self.extent.min);
		let hi = t.invert(self.extent.max);
		let (dx0, dx1) = (lo.x - bounds.min.x, hi.x - bounds.max.x);
		let (dy0, dy1) = (lo.y - bounds.min.y, hi.y - bounds.max.y);
		t.translate(axis_shift(dx0, dx1), axis_shift(dy0, dy1))
	}
}

fn axis_shift(d0: f64, d1: f64) -> f64 {
	if d1 > d0 {
		(d0 + d1) / 2.0
	} else if d0 < 0.0 {
		d0
	} else if d1 > 0.0 {
		d1
	} else {
		0.0
	}
}
