//! Integration tests for the built-in sculptures and the update pipeline

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use ribbed_engine::sculptures;
use ribbed_engine::{Color, Error, Params, Pipeline, UpdateOutcome};
use std::sync::Arc;

fn built(name: &str, overrides: &Params) -> Pipeline {
    let mut pipeline = Pipeline::by_name(name).expect("built-in sculpture");
    pipeline.update(overrides).expect("initial build");
    pipeline
}

#[test]
fn arch_defaults_scene() {
    let pipeline = built("arch", &Params::new());
    let scene = pipeline.current().output;

    // 50 ribs followed by the two rail sweeps
    assert_eq!(scene.instances.len(), 52);
    assert_eq!(scene.lights.len(), 2);
    assert_eq!(scene.background, Color::new(0.7, 0.85, 1.0));
    assert!(scene.instances.iter().all(|i| i.color == Color::WHITE));
    assert_eq!(scene.unique_meshes(), 52);

    let rail = &scene.instances[50].mesh;
    assert_eq!(rail.ring_count(), 100);
}

#[test]
fn simple_builds_four_bands() {
    let pipeline = built("simple", &Params::new());
    let scene = pipeline.current().output;

    // 50 requested ribs round down to four bands of 12
    assert_eq!(scene.instances.len(), 48 + 2);
    assert_eq!(scene.lights.len(), 1);
    assert_eq!(scene.background, Color::WHITE);
}

#[test]
fn every_builtin_builds_with_defaults() {
    for sculpture in sculptures::builtin() {
        let name = sculpture.name();
        let mut pipeline = Pipeline::new(sculpture).unwrap();
        let outcome = pipeline
            .update_defaults()
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
        assert_eq!(outcome, UpdateOutcome::Regenerated { generation: 1 });

        let scene = pipeline.current().output;
        assert!(!scene.instances.is_empty(), "{name} is empty");
        assert!(!scene.lights.is_empty(), "{name} has no lights");
        assert!(scene.bounds().is_some());
    }
}

#[test]
fn builds_are_deterministic() {
    let overrides = Params::new().with("rib_bend", 3.5).with("num_ribs", 24);
    let first = built("arch", &overrides).current().output;
    let second = built("arch", &overrides).current().output;

    assert_eq!(first.instances.len(), second.instances.len());
    for (a, b) in first.instances.iter().zip(&second.instances) {
        assert_eq!(a.mesh.vertices(), b.mesh.vertices());
        assert_eq!(a.mesh.indices(), b.mesh.indices());
        assert!(a.transform.abs_diff_eq(&b.transform, 0.0));
    }
}

#[test]
fn repeated_parameters_are_not_rebuilt() {
    let mut pipeline = built("balcony", &Params::new().with("num_ribs", 40));
    let before = pipeline.current();

    let outcome = pipeline
        .update(&Params::new().with("num_ribs", 40))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert!(Arc::ptr_eq(&pipeline.current().output, &before.output));

    let outcome = pipeline
        .update(&Params::new().with("num_ribs", 44))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Regenerated { generation: 2 });
    assert_eq!(pipeline.current().output.instances.len(), 44 + 2);
}

#[test]
fn dodec_replicates_the_cap() {
    let n = 3;
    let pipeline = built("dodec", &Params::new().with("num_ribs", n as i64));
    let scene = pipeline.current().output;

    // Cap, five satellites, mirrored
    let cap = 5 * n + 5;
    assert_eq!(scene.instances.len(), 2 * 6 * cap);
    assert_eq!(scene.unique_meshes(), cap);
    assert_eq!(scene.background, Color::BLACK);

    // The mirrored hemisphere repeats the same meshes in the same order
    let half = scene.instances.len() / 2;
    for i in 0..half {
        assert!(Arc::ptr_eq(
            &scene.instances[i].mesh,
            &scene.instances[i + half].mesh
        ));
    }
}

#[test]
fn failed_updates_keep_the_last_good_scene() {
    let cases = [
        ("dodec", Params::new().with("cap_scale", 0.0)),
        (
            "fig8",
            Params::new().with("rib_start", 0.25).with("rib_end", 0.25),
        ),
    ];

    for (name, bad) in cases {
        let mut pipeline = built(name, &Params::new());
        let handle = pipeline.handle();
        let good = handle.current();

        let err = pipeline.update(&bad).unwrap_err();
        assert!(
            matches!(&err, Error::Sculpture { name: n, .. } if n == name),
            "{err}"
        );
        assert!(matches!(
            err.geometry_cause(),
            Some(ribbed_core::Error::DegenerateCurve { .. })
        ));

        let after = handle.current();
        assert_eq!(after.generation, good.generation);
        assert!(Arc::ptr_eq(&after.output, &good.output));
        assert_eq!(pipeline.params(), Some(&pipeline.registry().defaults()));

        // The pipeline still accepts good parameters afterwards
        let outcome = pipeline
            .update(&Params::new().with("num_ribs", 20))
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Regenerated { generation: 2 });
    }
}

#[test]
fn rib_errors_name_the_stage_and_index() {
    let mut pipeline = Pipeline::by_name("dodec").unwrap();
    let err = pipeline
        .update(&Params::new().with("cap_scale", 0.0).with("num_ribs", 4))
        .unwrap_err();

    // The last rib of the first set is the one that collapses at the apex
    let message = err.to_string();
    assert!(message.contains("dodec"), "{message}");
    assert!(message.contains("ribs between rails 0 and 1"), "{message}");
    assert!(message.contains("Rib 3"), "{message}");
    assert_eq!(pipeline.current().generation, 0);
}

#[test]
fn parameter_errors_are_reported() {
    let mut pipeline = Pipeline::by_name("arch").unwrap();

    let unknown = pipeline.update(&Params::new().with("ribs", 10)).unwrap_err();
    assert!(matches!(
        unknown,
        Error::Sculpture { ref source, .. }
            if matches!(**source, Error::Parameter { ref name, .. } if name == "ribs")
    ));

    let wrong_kind = pipeline
        .update(&Params::new().with("num_ribs", 10.5))
        .unwrap_err();
    assert!(wrong_kind.to_string().contains("num_ribs"));

    let negative = pipeline
        .update(&Params::new().with("num_ribs", -2))
        .unwrap_err();
    assert!(matches!(
        negative.geometry_cause(),
        Some(ribbed_core::Error::InvalidInterval(_))
    ));

    assert_eq!(pipeline.current().generation, 0);
    assert!(matches!(
        Pipeline::by_name("teapot"),
        Err(Error::UnknownSculpture(_))
    ));
}

#[test]
fn parameter_files_drive_updates() {
    let path = std::env::temp_dir().join(format!("ribbed-params-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "num_ribs": 30, "background_color": [0.1, 0.2, 0.3] }"#,
    )
    .unwrap();

    let params = ribbed_engine::load_params(&path).unwrap();
    let pipeline = built("mace", &params);
    let scene = pipeline.current().output;
    assert_eq!(scene.instances.len(), 32);
    assert_eq!(scene.background, Color::new(0.1, 0.2, 0.3));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(ribbed_engine::load_params(&path).is_err());
    std::fs::remove_file(&path).unwrap();
}
