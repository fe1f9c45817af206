use std::str::FromStr;

use crate::error::DashboardError;

/// Page switcher button, parsed from its `value` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Next page.
	Up,
	/// Previous page.
	Down,
}

impl FromStr for Direction {
	type Err = DashboardError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"up" => Ok(Self::Up),
			"down" => Ok(Self::Down),
			other => Err(DashboardError::Config(format!(
				"unknown page direction {other:?}"
			))),
		}
	}
}

/// Ordered dashboard pages, each tagged with its 1-based position. Exactly one
/// is visible at any time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSet {
	positions: Vec<u32>,
	visible: usize,
}

impl Default for PageSet {
	fn default() -> Self {
		Self::sequential(1)
	}
}

impl PageSet {
	/// Pages `1..=count`, at least one. The first page starts visible.
	pub fn sequential(count: u32) -> Self {
		Self {
			positions: (1..=count.max(1)).collect(),
			visible: 0,
		}
	}

	/// Position of the visible page, shown in the page indicator.
	pub fn current(&self) -> u32 {
		self.positions[self.visible]
	}

	/// Whether the page tagged `position` is the one on screen.
	pub fn is_visible(&self, position: u32) -> bool {
		self.current() == position
	}

	/// Move one page up or down, wrapping at either end. Returns the new position.
	pub fn advance(&mut self, direction: Direction) -> u32 {
		let current = self.current();
		let wanted = match direction {
			Direction::Up => current.checked_add(1),
			Direction::Down => current.checked_sub(1),
		};
		let found = wanted.and_then(|w| self.positions.iter().position(|&p| p == w));
		self.visible = match (found, direction) {
			(Some(idx), _) => idx,
			(None, Direction::Up) => 0,
			(None, Direction::Down) => self.positions.len() - 1,
		};
		self.current()
	}
}
