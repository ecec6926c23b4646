//! Conversion from pointer coordinates to document-surface coordinates

use serde::{Deserialize, Serialize};

/// A point in display pixels relative to the document surface's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert viewport (client) coordinates of a pointer event into surface
    /// coordinates, given the surface's bounding box origin in the viewport
    pub fn from_client(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Self {
        Self {
            x: client_x - rect_left,
            y: client_y - rect_top,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Shifting pointer and surface by the same offset does not move the point
        #[test]
        fn translation_invariant(
            cx in -5000.0f64..5000.0,
            cy in -5000.0f64..5000.0,
            left in -5000.0f64..5000.0,
            top in -5000.0f64..5000.0,
            dx in -1000.0f64..1000.0,
            dy in -1000.0f64..1000.0,
        ) {
            let a = SurfacePoint::from_client(cx, cy, left, top);
            let b = SurfacePoint::from_client(cx + dx, cy + dy, left + dx, top + dy);
            prop_assert!((a.x - b.x).abs() < 1e-6);
            prop_assert!((a.y - b.y).abs() < 1e-6);
        }
    }
}
