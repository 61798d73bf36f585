//! Architect systems - Apply player commands, run the builder

use bevy::prelude::*;
use bevy::time::Real;

use crate::architect::{BuildOutcome, ConstructionPipeline};
use crate::messages::{ArchitectCommand, BlockBuiltMsg, BlockDestroyedMsg};
use crate::resources::BuildAgent;
use crate::world::{BlockGrid, TileMap};

/// Drain this frame's commands into the selection and design layers.
pub fn architect_command_system(
    mut commands: MessageReader<ArchitectCommand>,
    mut pipeline: ResMut<ConstructionPipeline>,
    grid: Res<BlockGrid>,
    tiles: Res<TileMap>,
    agent: Res<BuildAgent>,
    real: Res<Time<Real>>,
) {
    for command in commands.read() {
        match *command {
            ArchitectCommand::Select { kind, rotation } => pipeline.select(kind, rotation),
            ArchitectCommand::Rotate { clockwise } => {
                pipeline.rotate_selection(clockwise, real.elapsed_secs_f64());
            }
            ArchitectCommand::Commit => {
                let accepted = pipeline.commit(agent.cursor, &grid, &*tiles);
                if accepted == 0 && !pipeline.selection().is_empty() {
                    debug!("commit at {:?} placed no designs", agent.cursor);
                }
            }
            ArchitectCommand::Cancel => pipeline.cancel_selection(),
            ArchitectCommand::Stretch { start, end } => {
                pipeline.stretch(start, end);
            }
            ArchitectCommand::StretchEnd => {
                pipeline.finish_stretch(&grid, &*tiles);
            }
            ArchitectCommand::CopyAt => {
                pipeline.copy_at(agent.cursor, &grid);
            }
            ArchitectCommand::CopyRect { start, end } => {
                pipeline.copy_rect(start, end, &grid);
            }
            // Demolishing while ghosts are held only drops the selection.
            ArchitectCommand::DemolishAt | ArchitectCommand::DemolishRect { .. }
                if !pipeline.selection().is_empty() =>
            {
                pipeline.cancel_selection();
            }
            ArchitectCommand::DemolishAt => {
                if let Some(index) = grid.shape().world_to_index(agent.cursor) {
                    pipeline.demolish_at(index, &grid);
                }
            }
            ArchitectCommand::DemolishRect { start, end } => pipeline.demolish_rect(start, end, &grid),
            ArchitectCommand::ClearDesigns => pipeline.clear_designs(),
        }
    }
}

/// One builder step per frame; emits a message for every committed order.
pub fn builder_system(
    time: Res<Time>,
    mut pipeline: ResMut<ConstructionPipeline>,
    mut grid: ResMut<BlockGrid>,
    tiles: Res<TileMap>,
    mut agent: ResMut<BuildAgent>,
    mut built: MessageWriter<BlockBuiltMsg>,
    mut destroyed: MessageWriter<BlockDestroyedMsg>,
) {
    let outcome = pipeline.tick(time.delta_secs(), agent.position, agent.sprinting, &mut grid, &*tiles);
    match outcome {
        Some(BuildOutcome::Built(effect)) => {
            built.write(BlockBuiltMsg { effect });
        }
        Some(BuildOutcome::Destroyed(effect)) => {
            destroyed.write(BlockDestroyedMsg { effect });
        }
        None => {}
    }
    let facing = pipeline.builder().focus();
    if agent.facing != facing {
        agent.facing = facing;
    }
}
