//! Programmatic control of the native map surface.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum MapOperation {
    /// Move the camera center, keeping zoom/heading, over `duration_ms`.
    AnimateCamera { center: Coordinate, duration_ms: u64 },
}

impl Operation for MapOperation {
    type Output = ();
}

#[derive(Clone)]
pub struct MapView<E> {
    context: CapabilityContext<MapOperation, E>,
}

impl<Ev> Capability<Ev> for MapView<Ev> {
    type Operation = MapOperation;
    type MappedSelf<MappedEv> = MapView<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        MapView::new(self.context.map_event(f))
    }
}

impl<E> MapView<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<MapOperation, E>) -> Self {
        Self { context }
    }

    /// Fire-and-forget; the core never waits for the animation to finish.
    pub fn animate_camera(&self, center: Coordinate, duration_ms: u64) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(MapOperation::AnimateCamera {
                center,
                duration_ms,
            })
            .await;
        });
    }
}
