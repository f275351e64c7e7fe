//! Visual theming for the editor canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill colors, handed out by position in the node list.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Colors cycled through by index.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Slate blues and teals
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),
				Color::rgb(129, 161, 193),
				Color::rgb(100, 148, 160),
				Color::rgb(136, 160, 175),
				Color::rgb(108, 142, 173),
				Color::rgb(119, 158, 165),
			],
		}
	}

	/// Color for the node at `index`, wrapping around. Gray if empty.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Gradient rim color, and the fill when gradients fail.
	pub background: Color,
	/// Gradient center color.
	pub background_secondary: Color,
	/// Stroke for unselected edges.
	pub edge: Color,
	/// Stroke width of an edge at zoom 1.
	pub edge_width: f64,
	/// Node fills.
	pub palette: NodePalette,
	/// Node label text.
	pub label: Color,
	/// Edge color and node ring color for the current selection.
	pub selection: Color,
	/// Banner fill for load errors.
	pub notice_background: Color,
	/// Banner text.
	pub notice_text: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			background_secondary: Color::rgb(30, 35, 42),
			edge: Color::rgba(140, 160, 180, 0.6),
			edge_width: 2.0,
			palette: NodePalette::slate(),
			label: Color::rgba(255, 255, 255, 0.9),
			selection: Color::rgb(240, 190, 90),
			notice_background: Color::rgba(120, 40, 40, 0.85),
			notice_text: Color::rgb(255, 235, 235),
		}
	}
}
