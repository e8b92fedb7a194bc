//! Frame renderer contract

mod frame;
mod renderer;

pub use frame::{
    field_lines, EntityRejection, EntityState, FrameComposer, Palette, RenderEntity, RenderFrame,
    Rgb, TeamSide, YardLine,
};
pub use renderer::{FrameRecorder, FrameRenderer};
