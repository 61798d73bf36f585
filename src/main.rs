//! Blockwright - Headless demo: stage a small base, let the builder raise it, tear part of it down.

use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use blockwright::architect::ConstructionPipeline;
use blockwright::messages::{ArchitectCommand, BlockBuiltMsg, BlockDestroyedMsg};
use blockwright::resources::BuildAgent;
use blockwright::world::{BlockGrid, BlockKind, Rotation};

/// Frame cap so a blocked design can't spin forever.
const MAX_FRAMES: u32 = 10_000;

fn log_effects(mut built: MessageReader<BlockBuiltMsg>, mut destroyed: MessageReader<BlockDestroyedMsg>) {
    for msg in built.read() {
        let e = &msg.effect;
        info!("built {:?} at {} ({}x{}) centre {:?}", e.kind, e.anchor, e.size_x, e.size_y, e.position);
    }
    for msg in destroyed.read() {
        let e = &msg.effect;
        info!("destroyed {:?} at {} ({}x{})", e.kind, e.anchor, e.size_x, e.size_y);
    }
}

fn send(app: &mut App, command: ArchitectCommand) {
    app.world_mut().write_message(command);
}

fn run_until_idle(app: &mut App) -> u32 {
    let mut frames = 0;
    loop {
        app.update();
        frames += 1;
        if app.world().resource::<ConstructionPipeline>().designs().is_empty() || frames >= MAX_FRAMES {
            return frames;
        }
    }
}

fn main() {
    // Write back the sanitized settings so fields added since the last run show up in the file.
    let settings = blockwright::settings::load_settings();
    blockwright::settings::save_settings(&settings);

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)))
        .insert_resource(settings);

    blockwright::build_app(&mut app);
    app.add_systems(Update, log_effects.after(blockwright::Step::Build));

    info!(
        "blockwright {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_COMMIT"),
        env!("BUILD_TIMESTAMP")
    );

    let centre = {
        let grid = app.world().resource::<BlockGrid>();
        Vec2::new(grid.width() as f32 * 0.5, grid.height() as f32 * 0.5)
    };
    {
        let mut agent = app.world_mut().resource_mut::<BuildAgent>();
        agent.position = centre;
        agent.cursor = centre;
    }

    // Core in the middle, a row of conduits stretched out to the east, a turret to the north.
    send(&mut app, ArchitectCommand::Select { kind: BlockKind::CoreShard, rotation: Rotation::Up });
    send(&mut app, ArchitectCommand::Commit);
    send(&mut app, ArchitectCommand::Select { kind: BlockKind::Conduit, rotation: Rotation::Right });
    send(&mut app, ArchitectCommand::Stretch { start: centre + Vec2::new(4.0, 1.0), end: centre + Vec2::new(9.0, 1.0) });
    send(&mut app, ArchitectCommand::StretchEnd);
    send(&mut app, ArchitectCommand::Select { kind: BlockKind::Ripple, rotation: Rotation::Up });
    app.world_mut().resource_mut::<BuildAgent>().cursor = centre + Vec2::new(0.0, 5.0);
    send(&mut app, ArchitectCommand::Commit);

    let frames = run_until_idle(&mut app);
    let count = app.world().resource::<BlockGrid>().pool().count();
    info!("{} blocks standing after {} frames", count, frames);

    // Sprint-demolish the conduit row. Demolish is ignored while a ghost is held.
    send(&mut app, ArchitectCommand::Cancel);
    {
        let mut agent = app.world_mut().resource_mut::<BuildAgent>();
        agent.sprinting = true;
    }
    send(&mut app, ArchitectCommand::DemolishRect { start: centre + Vec2::new(4.0, 1.0), end: centre + Vec2::new(9.0, 1.0) });
    let frames = run_until_idle(&mut app);
    let count = app.world().resource::<BlockGrid>().pool().count();
    info!("{} blocks standing after demolition ({} frames)", count, frames);
}
