use gridcore::{ElementState, GridPos, InputCollector, KeyCode, PhysicalKey};

/// One scripted key event, scheduled on a fixed tick.
#[derive(Debug, Clone, Copy)]
struct KeyEvent {
    tick: u64,
    key: KeyCode,
    state: ElementState,
}

/// Deterministic input script. Events are fed through the same collector
/// a windowed host would use, so edge and level semantics match real
/// keyboard input exactly.
pub(crate) struct DemoScript {
    events: Vec<KeyEvent>,
    next_event: usize,
    orders: Vec<(u64, GridPos)>,
    next_order: usize,
}

impl DemoScript {
    /// A short tour of the village map: walk around, poke the well, take a
    /// pathfinding order to the door trigger, exercise pause, then quit.
    pub(crate) fn village_tour() -> Self {
        let mut script = ScriptBuilder::default();
        script.hold(KeyCode::KeyD, 10, 60);
        script.hold(KeyCode::KeyS, 70, 110);
        script.tap(KeyCode::KeyE, 120);
        script.order(140, GridPos::new(16, 10));
        script.tap(KeyCode::KeyP, 400);
        script.tap(KeyCode::KeyP, 460);
        script.hold(KeyCode::ArrowLeft, 470, 520);
        script.tap(KeyCode::Escape, 600);
        script.build()
    }

    /// Feeds every event scheduled for `tick` into the collector.
    pub(crate) fn pump(&mut self, tick: u64, collector: &mut InputCollector) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.tick > tick {
                break;
            }
            collector.handle_key(PhysicalKey::Code(event.key), event.state);
            self.next_event += 1;
        }
    }

    /// Pathfinding order scheduled for `tick`, if any.
    pub(crate) fn order_for(&mut self, tick: u64) -> Option<GridPos> {
        match self.orders.get(self.next_order) {
            Some((order_tick, goal)) if *order_tick <= tick => {
                self.next_order += 1;
                Some(*goal)
            }
            _ => None,
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.next_event >= self.events.len() && self.next_order >= self.orders.len()
    }
}

#[derive(Default)]
struct ScriptBuilder {
    events: Vec<KeyEvent>,
    orders: Vec<(u64, GridPos)>,
}

impl ScriptBuilder {
    fn hold(&mut self, key: KeyCode, press_tick: u64, release_tick: u64) {
        self.events.push(KeyEvent {
            tick: press_tick,
            key,
            state: ElementState::Pressed,
        });
        self.events.push(KeyEvent {
            tick: release_tick,
            key,
            state: ElementState::Released,
        });
    }

    fn tap(&mut self, key: KeyCode, tick: u64) {
        self.hold(key, tick, tick + 1);
    }

    fn order(&mut self, tick: u64, goal: GridPos) {
        self.orders.push((tick, goal));
    }

    fn build(self) -> DemoScript {
        let mut events = self.events;
        events.sort_by_key(|event| event.tick);
        let mut orders = self.orders;
        orders.sort_by_key(|order| order.0);
        DemoScript {
            events,
            next_event: 0,
            orders,
            next_order: 0,
        }
    }
}
