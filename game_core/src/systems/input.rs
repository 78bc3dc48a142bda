use hecs::World;

use crate::components::*;
use crate::resources::*;

/// Apply queued intents to paddle intent components. Out-of-range values are
/// clamped; later entries for a side overwrite earlier ones.
pub fn ingest_inputs(world: &mut World, net_queue: &mut NetQueue) {
    for &(side, dir) in &net_queue.inputs {
        let dir = dir.clamp(-1, 1);
        for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
            if paddle.side == side {
                intent.dir = dir;
            }
        }
    }

    // Clear processed inputs
    net_queue.inputs.clear();
}
