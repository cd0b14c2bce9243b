use std::{path::PathBuf, sync::Arc};

use missile_command::{
    config::ViewerConfig,
    gfx::{
        camera::ViewCamera,
        rendering::FrameRenderer,
        resources::TextureMode,
        scene::{load_description, DirectorySource, Scene},
    },
    simulation::ProjectileSimulator,
};

fn bundled_scene(config: &ViewerConfig) -> Scene {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    let description = load_description(Arc::new(DirectorySource::new(dir)), config.load_timeout).unwrap();
    Scene::from_description(&description, config.longitude_steps).unwrap()
}

#[test]
fn bundled_scene_loads_with_both_archetypes() {
    let config = ViewerConfig::default();
    let scene = bundled_scene(&config);

    let stats = scene.statistics();
    assert_eq!(stats.triangle_set_count, 2);
    assert_eq!(stats.ellipsoid_count, 2);
    assert_eq!(stats.texture_count, 0);
    assert!(scene.archetype(0).is_some());
    assert!(scene.archetype(1).is_some());
}

#[test]
fn friendly_missile_reaches_target_and_is_dropped() {
    let config = ViewerConfig::default();
    let scene = bundled_scene(&config);
    let camera = ViewCamera::new(config.view, 1.0);
    let renderer = FrameRenderer::new(config.highlight_scale);
    let mut simulator = ProjectileSimulator::with_seed(config.projectiles, 11);

    // Center silo at (0.5, 0.1) straight up to (0.5, 0.6): fifty steps of 0.01
    simulator.fire(0.5, 0.6);
    let mut frames = 0;
    while !simulator.friendlies().is_empty() {
        let plan = renderer.plan(&scene, &camera, &mut simulator, TextureMode::Replace);
        assert_eq!(plan.draws.len(), 2 + config.projectiles.enemy_count + 1);
        frames += 1;
        assert!(frames <= 60, "friendly missile never arrived");
    }
    assert!((49..=51).contains(&frames), "arrived after {frames} frames");

    let plan = renderer.plan(&scene, &camera, &mut simulator, TextureMode::Replace);
    assert_eq!(plan.draws.len(), 2 + config.projectiles.enemy_count);
}

#[test]
fn enemies_stay_inside_spawn_contract() {
    let config = ViewerConfig::default();
    let scene = bundled_scene(&config);
    let camera = ViewCamera::new(config.view, 1.0);
    let renderer = FrameRenderer::new(config.highlight_scale);
    let mut simulator = ProjectileSimulator::with_seed(config.projectiles, 23);

    // Long enough for every enemy to fall through and respawn at least once
    for _ in 0..2000 {
        renderer.plan(&scene, &camera, &mut simulator, TextureMode::Replace);
        for enemy in simulator.enemies() {
            assert!(enemy.position.y >= 0.0 && enemy.position.y < 3.0);
            assert_eq!(enemy.position.z, 0.0);
            assert!(enemy.fall_rate.abs() < 0.001);
        }
    }
}
