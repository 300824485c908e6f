//! The transform types a processor is built from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Inverse,
}

impl Direction {
    pub fn invert(self) -> Direction {
        match self {
            Direction::Forward => Direction::Inverse,
            Direction::Inverse => Direction::Forward,
        }
    }

    /// The net direction of a nested transform: two inversions cancel.
    pub fn combine(self, outer: Direction) -> Direction {
        if outer == Direction::Inverse {
            self.invert()
        } else {
            self
        }
    }
}

/// Converts between two color spaces of the current config. Either end
/// may name a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpaceTransform {
    pub src: String,
    pub dst: String,
    pub direction: Direction,
}

/// Converts from a color space to what a display/view pair shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayViewTransform {
    pub src: String,
    pub display: String,
    pub view: String,
    pub direction: Direction,
}

/// Applies a LUT file found on the config's search path. The source may
/// reference context variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransform {
    pub src: String,
    pub direction: Direction,
}

/// An ordered list of transforms applied as one.
#[derive(Debug, Clone, Default)]
pub struct GroupTransform {
    pub children: Vec<Transform>,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub enum Transform {
    ColorSpace(ColorSpaceTransform),
    DisplayView(DisplayViewTransform),
    File(FileTransform),
    Group(GroupTransform),
}

impl Transform {
    pub fn color_space(src: &str, dst: &str) -> Transform {
        Transform::ColorSpace(ColorSpaceTransform {
            src: src.to_string(),
            dst: dst.to_string(),
            direction: Direction::Forward,
        })
    }

    pub fn display_view(src: &str, display: &str, view: &str) -> Transform {
        Transform::DisplayView(DisplayViewTransform {
            src: src.to_string(),
            display: display.to_string(),
            view: view.to_string(),
            direction: Direction::Forward,
        })
    }

    pub fn file(src: &str) -> Transform {
        Transform::File(FileTransform {
            src: src.to_string(),
            direction: Direction::Forward,
        })
    }

    pub fn group(children: Vec<Transform>) -> Transform {
        Transform::Group(GroupTransform {
            children,
            direction: Direction::Forward,
        })
    }

    pub fn direction(&self) -> Direction {
        match self {
            Transform::ColorSpace(t) => t.direction,
            Transform::DisplayView(t) => t.direction,
            Transform::File(t) => t.direction,
            Transform::Group(t) => t.direction,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Transform {
        match &mut self {
            Transform::ColorSpace(t) => t.direction = direction,
            Transform::DisplayView(t) => t.direction = direction,
            Transform::File(t) => t.direction = direction,
            Transform::Group(t) => t.direction = direction,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_inversions_cancel() {
        assert_eq!(
            Direction::Inverse.combine(Direction::Inverse),
            Direction::Forward
        );
        assert_eq!(
            Direction::Forward.combine(Direction::Inverse),
            Direction::Inverse
        );
        assert_eq!(
            Direction::Inverse.combine(Direction::Forward),
            Direction::Inverse
        );
    }

    #[test]
    fn with_direction_reaches_every_variant() {
        let t = Transform::color_space("a", "b").with_direction(Direction::Inverse);
        assert_eq!(t.direction(), Direction::Inverse);
        let t = Transform::group(vec![]).with_direction(Direction::Inverse);
        assert_eq!(t.direction(), Direction::Inverse);
    }
}
