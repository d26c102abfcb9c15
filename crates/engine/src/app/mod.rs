mod input;
mod loop_runner;
mod metrics;

pub use input::{InputAction, InputCollector, InputSnapshot};
// Raw key-event vocabulary, re-exported so hosts and scripted drivers can
// synthesize events without depending on winit directly.
pub use winit::event::ElementState;
pub use winit::keyboard::{KeyCode, PhysicalKey};
pub use loop_runner::{run_simulation, FixedTimestep, LoopConfig, LoopControl, StepPlan};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
