//! Ring layout: N items evenly around a horizontal circle, each facing a
//! common focal point.
//!
//! Angles are measured in the XZ plane from +X towards +Z, so slot `i`
//! sits at `focal + (r cos a, 0, r sin a)` with its height set by
//! `RingOptions::height`.

use std::f32::consts::TAU;

use glam::{Mat3, Quat, Vec3};

/// How the ring is spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcSpan {
    /// `2π / N` spacing
    FullCircle,
    /// Evenly over `width` radians, centered on the offset angle. A width
    /// of a whole turn lays out like `FullCircle`, so the end slots never
    /// meet.
    BoundedArc { width: f32 },
}

// Slack for widths computed from degrees
const TURN_EPSILON: f32 = 1e-4;

impl Default for ArcSpan {
    fn default() -> Self {
        ArcSpan::FullCircle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingOptions {
    pub arc_span: ArcSpan,
    /// Radians added to every slot angle
    pub angular_offset: f32,
    /// World Y of every slot
    pub height: f32,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            arc_span: ArcSpan::FullCircle,
            angular_offset: 0.0,
            height: 0.0,
        }
    }
}

/// Placement of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSlot {
    pub item_id: String,
    /// Angle in the XZ plane, radians
    pub angle: f32,
    pub position: Vec3,
    /// Rotates local +Z onto the direction from the slot to the focal point
    pub orientation: Quat,
}

impl LayoutSlot {
    /// Unit direction the slot faces.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("ring radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("arc width must be in (0, 2π], got {0}")]
    InvalidArc(f32),
}

/// Lay out `item_ids` in order. Deterministic: the same input always
/// yields the same slots, in the same order.
pub fn layout<S: AsRef<str>>(
    item_ids: &[S],
    radius: f32,
    focal: Vec3,
    options: &RingOptions,
) -> Result<Vec<LayoutSlot>, LayoutError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(LayoutError::InvalidRadius(radius));
    }
    if let ArcSpan::BoundedArc { width } = options.arc_span {
        if !(width.is_finite() && width > 0.0 && width <= TAU + TURN_EPSILON) {
            return Err(LayoutError::InvalidArc(width));
        }
    }

    let n = item_ids.len();
    let slots = item_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = slot_angle(i, n, options);
            let position = Vec3::new(
                focal.x + radius * angle.cos(),
                options.height,
                focal.z + radius * angle.sin(),
            );
            LayoutSlot {
                item_id: id.as_ref().to_string(),
                angle,
                position,
                orientation: facing(position, focal),
            }
        })
        .collect();

    Ok(slots)
}

fn slot_angle(i: usize, n: usize, options: &RingOptions) -> f32 {
    match options.arc_span {
        ArcSpan::BoundedArc { width } if width < TAU - TURN_EPSILON => {
            let step = width / (n.saturating_sub(1).max(1)) as f32;
            let centered = i as f32 - (n as f32 - 1.0) * 0.5;
            options.angular_offset + centered * step
        }
        _ => options.angular_offset + i as f32 * (TAU / n as f32),
    }
}

/// Rotation taking local +Z to the direction from `from` to `focal`,
/// keeping local +Y as close to world up as possible.
pub fn facing(from: Vec3, focal: Vec3) -> Quat {
    let Some(forward) = (focal - from).try_normalize() else {
        return Quat::IDENTITY;
    };
    match Vec3::Y.cross(forward).try_normalize() {
        Some(right) => {
            let up = forward.cross(right);
            Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
        }
        // Focal point straight above or below
        None => Quat::from_rotation_arc(Vec3::Z, forward),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item{}", i)).collect()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn four_items_at_quarter_turns() {
        let slots = layout(&ids(4), 10.0, Vec3::ZERO, &RingOptions::default()).unwrap();
        let degrees: Vec<f32> = slots.iter().map(|s| s.angle.to_degrees()).collect();
        for (got, want) in degrees.iter().zip([0.0, 90.0, 180.0, 270.0]) {
            assert!(close(*got, want), "{} vs {}", got, want);
        }
        for s in &slots {
            let horizontal = Vec3::new(s.position.x, 0.0, s.position.z);
            assert!(close(horizontal.length(), 10.0));
        }
        assert!(close(slots[1].position.z, 10.0));
    }

    #[test]
    fn offset_is_added_to_every_angle() {
        let opts = RingOptions {
            angular_offset: 0.25,
            ..RingOptions::default()
        };
        let slots = layout(&ids(3), 5.0, Vec3::ZERO, &opts).unwrap();
        assert!(close(slots[0].angle, 0.25));
        assert!(close(slots[2].angle - slots[1].angle, TAU / 3.0));
    }

    #[test]
    fn slots_face_an_offset_focal_point() {
        let focal = Vec3::new(3.0, 2.5, -4.0);
        let opts = RingOptions {
            height: 0.0,
            ..RingOptions::default()
        };
        let slots = layout(&ids(7), 14.0, focal, &opts).unwrap();
        for s in &slots {
            let to_focal = (focal - s.position).normalize();
            assert!((s.forward() - to_focal).length() < 1e-4);
            let dx = s.position.x - focal.x;
            let dz = s.position.z - focal.z;
            assert!(close((dx * dx + dz * dz).sqrt(), 14.0));
        }
    }

    #[test]
    fn level_slots_keep_up_vertical() {
        let opts = RingOptions {
            height: 2.5,
            ..RingOptions::default()
        };
        let slots = layout(&ids(5), 14.0, Vec3::new(0.0, 2.5, 0.0), &opts).unwrap();
        for s in &slots {
            assert!(((s.orientation * Vec3::Y) - Vec3::Y).length() < 1e-4);
        }
    }

    #[test]
    fn bounded_arc_is_centered() {
        let opts = RingOptions {
            arc_span: ArcSpan::BoundedArc { width: 1.0 },
            angular_offset: 2.0,
            height: 0.0,
        };
        let one = layout(&ids(1), 5.0, Vec3::ZERO, &opts).unwrap();
        assert!(close(one[0].angle, 2.0));

        let three = layout(&ids(3), 5.0, Vec3::ZERO, &opts).unwrap();
        let angles: Vec<f32> = three.iter().map(|s| s.angle).collect();
        assert!(close(angles[0], 1.5));
        assert!(close(angles[1], 2.0));
        assert!(close(angles[2], 2.5));
    }

    #[test]
    fn empty_input_is_empty_output() {
        let none: Vec<String> = Vec::new();
        assert!(layout(&none, 10.0, Vec3::ZERO, &RingOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn deterministic_and_order_preserving() {
        let items = ids(9);
        let a = layout(&items, 14.0, Vec3::new(0.0, 2.5, 0.0), &RingOptions::default()).unwrap();
        let b = layout(&items, 14.0, Vec3::new(0.0, 2.5, 0.0), &RingOptions::default()).unwrap();
        assert_eq!(a, b);
        let order: Vec<&str> = a.iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(order, items.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn whole_turn_arc_keeps_end_slots_apart() {
        let opts = RingOptions {
            arc_span: ArcSpan::BoundedArc { width: TAU },
            angular_offset: 0.0,
            height: 0.0,
        };
        let slots = layout(&ids(4), 10.0, Vec3::ZERO, &opts).unwrap();
        let full = layout(&ids(4), 10.0, Vec3::ZERO, &RingOptions::default()).unwrap();
        assert_eq!(slots, full);
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(a.position.distance(b.position) > 1.0);
            }
        }

        // 360 degrees from the config lands on the same layout
        let degrees = RingOptions {
            arc_span: ArcSpan::BoundedArc { width: 360f32.to_radians() },
            ..opts
        };
        assert_eq!(layout(&ids(4), 10.0, Vec3::ZERO, &degrees).unwrap(), full);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            layout(&ids(2), 0.0, Vec3::ZERO, &RingOptions::default()),
            Err(LayoutError::InvalidRadius(0.0))
        );
        assert!(layout(&ids(2), f32::NAN, Vec3::ZERO, &RingOptions::default()).is_err());
        let opts = RingOptions {
            arc_span: ArcSpan::BoundedArc { width: -1.0 },
            ..RingOptions::default()
        };
        assert_eq!(
            layout(&ids(2), 1.0, Vec3::ZERO, &opts),
            Err(LayoutError::InvalidArc(-1.0))
        );
    }
}
