pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Where (and how large) a projected object lands on the scene.
///
/// Both parts are optional; each object template supplies deterministic
/// defaults, so re-projection without explicit coordinates is reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub origin: Option<Point>,
    pub size: Option<Size>,
}

impl Placement {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            origin: Some(point(x, y)),
            size: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(size(width, height));
        self
    }

    pub fn origin_or(&self, default_x: f64, default_y: f64) -> Point {
        self.origin.unwrap_or_else(|| point(default_x, default_y))
    }

    pub fn size_or(&self, default_width: f64, default_height: f64) -> Size {
        self.size
            .unwrap_or_else(|| size(default_width, default_height))
    }
}
