//! Integration tests for rails, ribs, sweeps and the scene graph

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use ribbed_core::prelude::*;
use std::f64::consts::{PI, TAU};
use std::sync::Arc;

fn semicircle(x_axis: DVec3, y_axis: DVec3, samples: usize) -> RailCurve {
    let points = (0..samples).map(|i| {
        let angle = PI * i as f64 / (samples - 1) as f64;
        x_axis * angle.cos() + y_axis * angle.sin()
    });
    RailCurve::polyline(points, false).expect("semicircle rail")
}

fn orthogonal_rails() -> (RailCurve, RailCurve) {
    (
        semicircle(DVec3::new(0.0, 20.0, 0.0), DVec3::new(0.0, 0.0, 20.0), 100),
        semicircle(DVec3::new(20.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -20.0), 100),
    )
}

fn small_mesh() -> Arc<Mesh> {
    let rail = RailCurve::polyline([DVec3::ZERO, DVec3::Z], false).unwrap();
    Arc::new(sweep(&CrossSectionProfile::circle(0.1, 4).unwrap(), &rail).unwrap())
}

fn ring_center(mesh: &Mesh, ring: usize) -> DVec3 {
    let ring = mesh.ring(ring);
    ring.iter().map(|v| v.position).sum::<DVec3>() / ring.len() as f64
}

#[test]
fn concatenation_is_associative() {
    let a = Transform::new(
        1.5,
        DQuat::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.4),
        DVec3::new(1.0, -2.0, 0.5),
    );
    let b = Transform::new(
        0.75,
        DQuat::from_axis_angle(DVec3::Y, -2.1),
        DVec3::new(-3.0, 0.0, 7.0),
    );
    let c = Transform::new(
        2.0,
        DQuat::from_axis_angle(DVec3::new(0.0, 1.0, -1.0).normalize(), 1.3),
        DVec3::new(0.25, 4.0, -1.0),
    );

    let left = concatenate(&concatenate(&a, &b), &c);
    let right = concatenate(&a, &concatenate(&b, &c));
    assert!(left.abs_diff_eq(&right, 1e-9));

    // Not commutative
    assert!(!concatenate(&a, &b).abs_diff_eq(&concatenate(&b, &a), 1e-9));
}

#[test]
fn copies_are_independent_and_share_geometry() {
    let mesh = small_mesh();
    let mut g1 = Group::new();
    g1.add_element(Arc::clone(&mesh));

    let mut g2 = g1.copy();
    let g3 = g1.copy();
    g2.set_transform(Transform::from_translation(DVec3::new(0.0, 0.0, -13.0)));
    g2.transform_mut().scale = 3.0;

    assert_eq!(*g1.transform(), Transform::IDENTITY);
    assert_eq!(*g3.transform(), Transform::IDENTITY);

    let leaves: Vec<_> = [&g1, &g2, &g3]
        .iter()
        .map(|g| g.flatten(Color::WHITE).remove(0).mesh)
        .collect();
    for leaf in &leaves {
        assert!(Arc::ptr_eq(leaf, &mesh));
    }
}

#[test]
fn rib_count_contract() {
    let (a, b) = orthogonal_rails();
    let profile = CrossSectionProfile::circle(0.25, 8).unwrap();
    let generator = RibSurfaceGenerator::default();
    let perturb = NormalOffset { magnitude: -10.0 };

    for count in [0, 1, 7] {
        let ribs = generator
            .generate(
                &a,
                Interval::new(0.01, 0.99),
                &b,
                Interval::new(0.01, 0.99),
                &perturb,
                count,
                &RibSpacing::Uniform,
                &profile,
            )
            .unwrap();
        assert_eq!(ribs.len(), count);
    }
}

#[test]
fn degenerate_interval_pins_every_rib_start() {
    let (a, b) = orthogonal_rails();
    let profile = CrossSectionProfile::circle(0.25, 8).unwrap();
    let ribs = hermite_ribbed_surface(
        &a,
        Interval::new(0.4, 0.4),
        &b,
        Interval::FULL,
        &Straight,
        6,
        &RibSpacing::Uniform,
        &profile,
    )
    .unwrap();

    let pinned = a.position(0.4);
    for rib in &ribs {
        assert!(ring_center(rib, 0).distance(pinned) < 1e-9);
    }
    // The other ends still spread along rail B
    let last = ribs[5].ring_count() - 1;
    assert!(ring_center(&ribs[5], last).distance(b.position(1.0)) < 1e-9);
}

#[test]
fn rib_generation_is_deterministic() {
    let (a, b) = orthogonal_rails();
    let profile = CrossSectionProfile::circle(0.25, 8).unwrap();
    let run = || {
        hermite_ribbed_surface(
            &a,
            Interval::new(0.1, 0.9),
            &b,
            Interval::new(0.9, 0.1),
            &BinormalSwing { magnitude: 2.0 },
            24,
            &RibSpacing::Eased { strength: 0.7 },
            &profile,
        )
        .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.len(), second.len());
    for (x, y) in first.iter().zip(&second) {
        assert_eq!(x.vertices(), y.vertices());
        assert_eq!(x.indices(), y.indices());
    }
}

#[test]
fn closed_rail_sweep_has_no_seam() {
    let rail = RailCurve::bspline(
        vec![
            DVec3::new(10.0, 0.0, 2.0),
            DVec3::new(0.0, 10.0, -2.0),
            DVec3::new(-10.0, 0.0, 2.0),
            DVec3::new(0.0, -10.0, -2.0),
        ],
        3,
        true,
    )
    .unwrap();
    let profile = CrossSectionProfile::circle(0.5, 8).unwrap();
    let mesh = sweep_with(&profile, &rail, &SweepConfig::default().with_samples(200)).unwrap();

    let last = mesh.ring_count() - 1;
    assert!(mesh.ring_links().contains(&(last, 0)));

    // The closing quads are as short as the rest: no twist jump at the seam
    let gap = |i: usize, j: usize| {
        mesh.ring(i)
            .iter()
            .zip(mesh.ring(j))
            .map(|(p, q)| p.position.distance(q.position))
            .fold(0.0, f64::max)
    };
    let typical = gap(0, 1);
    assert!(gap(last, 0) < typical * 1.5);
}

#[test]
fn fivefold_rotation_and_mirror() {
    let separation = 13.0;
    let center = DVec3::new(2.0, 1.0, 0.0);
    let leaf_offsets = [DVec3::new(5.0, 0.0, 0.0), DVec3::new(5.0, 0.0, 3.0)];

    let mut g = Group::new();
    let mut child_transforms = Vec::new();
    for k in 0..5 {
        // Rotate about the shared center
        let rotation = Transform::from_axis_angle(DVec3::Z, TAU / 5.0 * f64::from(k));
        let about_center = concatenate(
            &Transform::from_translation(center),
            &concatenate(&rotation, &Transform::from_translation(-center)),
        );
        let mut child = Group::with_transform(about_center);
        for offset in leaf_offsets {
            let mut leaf = Group::with_transform(Transform::from_translation(offset));
            leaf.add_element(small_mesh());
            child.add_element(leaf);
        }
        child_transforms.push(about_center);
        g.add_element(child);
    }

    let mut mirrored = g.copy();
    mirrored.set_transform(
        Transform::from_axis_angle(DVec3::Y, PI).with_translation(DVec3::new(0.0, 0.0, -separation)),
    );
    let mut root = Group::new();
    let halves = [*g.transform(), *mirrored.transform()];
    root.add_element(g).add_element(mirrored);

    let instances = root.flatten(Color::WHITE);
    assert_eq!(instances.len(), 5 * leaf_offsets.len() * 2);

    let mut expected = Vec::new();
    for half in halves {
        for child in &child_transforms {
            for offset in leaf_offsets {
                let leaf = Transform::from_translation(offset);
                expected.push(concatenate(&half, &concatenate(child, &leaf)));
            }
        }
    }
    for (instance, want) in instances.iter().zip(&expected) {
        assert!(instance.transform.abs_diff_eq(want, 1e-9));
    }

    // The mirrored half reuses the same meshes in the same order
    let per_half = instances.len() / 2;
    for i in 0..per_half {
        assert!(Arc::ptr_eq(&instances[i].mesh, &instances[i + per_half].mesh));
    }
}
