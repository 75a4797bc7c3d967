use serde::Deserialize;

use super::error::SnapshotError;
use super::highlight::SelectionPolicy;

/// Tuning knobs for the map. Every field has a default, so a JSON override
/// only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
	pub charge_strength: f64,
	pub x_strength: f64,
	pub y_strength: f64,
	pub collide_radius: f64,
	pub link_iterations: usize,
	/// Energy the simulation settles at and never drops below.
	pub alpha_target: f64,
	/// Energy target while a node is dragged.
	pub drag_alpha_target: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	pub min_scale: f64,
	pub max_scale: f64,
	pub label_offset: f64,
	pub icon_size: f64,
	pub faded_opacity: f64,
	/// Pointer travel (px) below which a press-release counts as a click.
	pub click_tolerance: f64,
	pub selection_policy: SelectionPolicy,
}

impl Default for MapConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			charge_strength: -700.0,
			x_strength: 0.1,
			y_strength: 0.2,
			collide_radius: 1.0,
			link_iterations: 1,
			alpha_target: 0.03,
			drag_alpha_target: 0.3,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			min_scale: 0.1,
			max_scale: 8.0,
			label_offset: 100.0,
			icon_size: 32.0,
			faded_opacity: 0.15,
			click_tolerance: 3.0,
			selection_policy: SelectionPolicy::default(),
		}
	}
}

impl MapConfig {
	/// Decode an override and reject values the map cannot run with.
	pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), SnapshotError> {
		let invalid = |what| Err(SnapshotError::InvalidConfig(what));
		if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale && self.max_scale.is_finite()) {
			return invalid("scale extent must satisfy 0 < min_scale <= max_scale");
		}
		if !(self.icon_size > 0.0 && self.icon_size.is_finite()) {
			return invalid("icon_size must be positive");
		}
		if !(self.alpha_decay > 0.0 && self.alpha_decay <= 1.0) {
			return invalid("alpha_decay must be in (0, 1]");
		}
		if !(0.0..=1.0).contains(&self.velocity_decay) {
			return invalid("velocity_decay must be in [0, 1]");
		}
		if !(0.0..=1.0).contains(&self.faded_opacity) {
			return invalid("faded_opacity must be in [0, 1]");
		}
		if self.alpha_min < 0.0 || self.click_tolerance < 0.0 || self.collide_radius < 0.0 {
			return invalid("alpha_min, click_tolerance and collide_radius must not be negative");
		}
		Ok(())
	}

	pub fn icon_half(&self) -> f64 {
		self.icon_size / 2.0
	}
}
