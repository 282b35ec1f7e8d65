use anyhow::{anyhow, Result};
use glam::Vec3;
use log::info;
use rusted_scene::engine::physics::body::presets;
use rusted_scene::host::marshal::vec3_to_value;
use rusted_scene::{Body, HostScene, SceneEvent};

const FRAMES: u32 = 120;
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Scene demo...");

    let mut host = HostScene::new();
    host.on("gravity", |args| info!("Gravity changed: {:?}", args))?;

    let scene = host.scene_mut();
    scene.on_event(|event| {
        if let SceneEvent::Destroy = event {
            info!("Scene is shutting down");
        }
    });

    let ground = Body::spawn(
        scene,
        presets::fixed_body(Vec3::new(0.0, -0.5, 0.0)),
        presets::ground_collider(50.0, 50.0),
    )
    .ok_or_else(|| anyhow!("scene destroyed before setup"))?;

    // A column of boxes falling onto the ground, capped by a ball
    let mut boxes = Vec::new();
    for i in 0..5 {
        let collider = if i == 4 {
            presets::sphere_collider(0.5)
        } else {
            presets::box_collider(Vec3::ONE)
        };
        let body = Body::spawn(
            scene,
            presets::dynamic_body(Vec3::new(0.0, 2.0 + i as f32 * 1.5, 0.0)),
            collider,
        )
        .ok_or_else(|| anyhow!("scene destroyed before setup"))?;
        boxes.push(body);
    }
    info!("Spawned {} bodies", scene.body_count());

    for frame in 0..FRAMES {
        host.update(Some(&serde_json::json!(FRAME_DT)))?;
        if frame % 30 == 0 {
            let top = boxes.last().map(|b| b.borrow().position());
            info!("Frame {frame}: top box at {:?}", top);
        }
    }

    host.set("gravity", &vec3_to_value(Vec3::new(0.0, -1.62, 0.0)))?;
    host.update(None)?;

    let from = serde_json::json!([0.0, 20.0, 0.0]);
    let to = serde_json::json!({ "x": 0.0, "y": -5.0, "z": 0.0 });
    let traces = host.call("trace", &[from.clone(), to.clone()])?;
    info!("Downward trace: {traces}");

    let hit = host.call("hit", &[from, to])?;
    info!("Nearest hit: {hit}");

    for body in boxes.iter().rev() {
        body.borrow_mut().destroy(host.scene_mut());
    }
    info!("Boxes removed, {} bodies left", host.scene().body_count());

    host.call("destroy", &[])?;
    info!("Ground destroyed with scene: {}", ground.borrow().is_destroyed());

    Ok(())
}
