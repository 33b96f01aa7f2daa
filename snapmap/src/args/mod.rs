mod root;
mod view;

pub use root::{Args, Command, DemoArgs, MetaArgs, ReplayArgs};
pub use view::ViewArgs;
