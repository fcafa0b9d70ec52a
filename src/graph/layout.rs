// Circular vertex layout

use crate::config::{GRAPH_LAYOUT_CENTER, GRAPH_LAYOUT_RADIUS};
use serde::Serialize;
use std::f64::consts::PI;

/// 2-D position of a vertex in layout space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Positions for `count` vertices evenly spaced on the layout circle,
/// starting at twelve o'clock and going clockwise in insertion order.
/// A lone vertex sits at the centre.
pub fn circle(count: usize) -> Vec<Position> {
    let (cx, cy) = GRAPH_LAYOUT_CENTER;
    if count == 1 {
        return vec![Position { x: cx, y: cy }];
    }
    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / count as f64 - PI / 2.0;
            Position {
                x: round2(cx + GRAPH_LAYOUT_RADIUS * angle.cos()),
                y: round2(cy + GRAPH_LAYOUT_RADIUS * angle.sin()),
            }
        })
        .collect()
}

fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_positions() {
        assert!(circle(0).is_empty());
        assert_eq!(circle(1)[0].x, GRAPH_LAYOUT_CENTER.0);

        let four = circle(4);
        assert_eq!(four[0].x, GRAPH_LAYOUT_CENTER.0);
        assert_eq!(four[0].y, GRAPH_LAYOUT_CENTER.1 - GRAPH_LAYOUT_RADIUS);
        assert_eq!(four[1].x, GRAPH_LAYOUT_CENTER.0 + GRAPH_LAYOUT_RADIUS);
    }
}
