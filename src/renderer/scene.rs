//! Scene projection: snapshot in, primitives out

use serde::Serialize;

use super::primitive::Primitive;
use super::shapes;
use crate::sim::SimSnapshot;

/// Presentation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Strip animation classes (pulse, blink, ping)
    pub reduced_motion: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

/// Project a snapshot into draw order
pub fn scene(snapshot: &SimSnapshot, options: &RenderOptions) -> Scene {
    let mut primitives = Vec::new();

    let origin = snapshot.launch_point;
    primitives.extend(shapes::radar_glow(origin));
    primitives.extend(shapes::radar_sweep(origin, snapshot.radar_angle));
    primitives.extend(shapes::range_rings(origin));

    for drone in &snapshot.drones {
        primitives.extend(shapes::drone_marker(drone.pos));
    }

    for missile in &snapshot.missiles {
        primitives.extend(shapes::missile_marker(missile.pos));
    }

    // Markers only exist while the struck drone is still in the store
    for id in &snapshot.intercepted {
        if let Some(drone) = snapshot.drone(*id) {
            primitives.extend(shapes::intercept_marker(drone.pos));
        }
    }

    primitives.extend(shapes::defender(origin));

    if options.reduced_motion {
        for style in primitives.iter_mut().filter_map(Primitive::style_mut) {
            style.class = None;
        }
    }

    Scene { primitives }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::primitive::Length;
    use crate::sim::SimState;
    use crate::tuning::Tuning;
    use glam::Vec2;

    // glow + sweep + 3 rings + 2 defender primitives
    const STATIC_PRIMITIVES: usize = 1 + 1 + 3 + 2;

    #[test]
    fn test_empty_scene() {
        let snap = SimSnapshot::capture(&SimState::new(1), &Tuning::default());
        let scene = scene(&snap, &RenderOptions::default());
        assert_eq!(scene.primitives.len(), STATIC_PRIMITIVES);
    }

    #[test]
    fn test_counts_follow_entities() {
        let tuning = Tuning::default();
        let mut state = SimState::new(1);
        let a = state.insert_drone(Vec2::new(10.0, 10.0), 0.5, 0.0);
        let b = state.insert_drone(Vec2::new(60.0, 30.0), 0.5, 0.0);
        state.launch_missile(a, &tuning);
        state.intercepted.insert(b, 0);
        // Already removed from the store: no marker
        state.intercepted.insert(99, 0);

        let snap = SimSnapshot::capture(&state, &tuning);
        let scene = scene(&snap, &RenderOptions::default());
        assert_eq!(scene.primitives.len(), STATIC_PRIMITIVES + 2 * 3 + 2 + 2);
    }

    #[test]
    fn test_reduced_motion_strips_classes() {
        let mut state = SimState::new(1);
        state.insert_drone(Vec2::new(10.0, 10.0), 0.5, 0.0);
        let snap = SimSnapshot::capture(&state, &Tuning::default());

        let animated = scene(&snap, &RenderOptions::default());
        assert!(animated.primitives.iter().any(|p| matches!(
            p,
            Primitive::Circle { style, .. } if style.class.is_some()
        )));

        let calm = scene(&snap, &RenderOptions { reduced_motion: true });
        assert!(calm.primitives.iter().all(|p| match p {
            Primitive::Circle { style, .. } | Primitive::Line { style, .. } => style.class.is_none(),
            Primitive::Text { .. } => true,
        }));
    }

    #[test]
    fn test_radar_and_defender_at_tuned_launch_point() {
        let tuning = Tuning {
            launch_point: Vec2::new(20.0, 90.0),
            ..Default::default()
        };
        let mut state = SimState::new(1);
        let drone = state.insert_drone(Vec2::new(20.0, 10.0), 0.5, 0.0);
        state.launch_missile(drone, &tuning);
        let snap = SimSnapshot::capture(&state, &tuning);
        let scene = scene(&snap, &RenderOptions::default());

        let at_origin = |p: &Primitive| match p {
            Primitive::Circle { cx, cy, .. } => {
                *cx == Length::Percent(20.0) && *cy == Length::Percent(90.0)
            }
            Primitive::Line { x1, y1, .. } => {
                *x1 == Length::Percent(20.0) && *y1 == Length::Percent(90.0)
            }
            Primitive::Text { .. } => false,
        };
        // glow, sweep, 3 rings, defender core, missile trail and head
        let anchored = scene.primitives.iter().filter(|p| at_origin(p)).count();
        assert_eq!(anchored, 1 + 1 + 3 + 1 + 2);
        assert!(matches!(
            scene.primitives.last(),
            Some(Primitive::Text { x: Length::Percent(x), y: Length::Percent(y), .. })
                if *x == 20.0 && *y == 93.0
        ));
    }

    #[test]
    fn test_projection_is_pure() {
        let mut state = SimState::new(3);
        state.insert_drone(Vec2::new(33.0, 44.0), 0.5, 0.0);
        let snap = SimSnapshot::capture(&state, &Tuning::default());
        let opts = RenderOptions::default();
        assert_eq!(scene(&snap, &opts), scene(&snap, &opts));
    }
}
