mod controller;
pub use controller::{HoverController, PointerEvent, label};

mod frame;
pub use frame::{FrameQueue, FrameTask};

mod index;
pub use index::{HoverCandidate, HoverIndex};

mod options;
pub use options::{
    DEFAULT_MARKER_COLOR, DEFAULT_MARKER_OPACITY, DEFAULT_MARKER_RADIUS, DEFAULT_THRESHOLD_PX,
    HoverOptions,
};
