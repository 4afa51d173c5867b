// Quote generation: message validation, text wrapping, bubble compositing.
// Bubble drawing itself is delegated to `renderer`; the background comes from `background`.

pub mod compositor;
pub mod handlers;
pub mod message;
pub mod wrap;

/// Fill color for the bubble. Both gradient stops use it, giving a solid bubble.
pub const BUBBLE_COLOR: &str = "#303030";
pub const RENDER_WIDTH: u32 = 512;
pub const RENDER_HEIGHT: u32 = 512;
pub const RENDER_SCALE: u32 = 2;
pub const EMOJI_STYLE: &str = "apple";
