//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw.rs` - Screen layout and panels
//! - `chart.rs` - Pain trend chart
//! - `theme.rs` - Color themes and presets

mod chart;
mod draw;
pub mod theme;

// Re-export main draw function
pub use draw::draw;

pub use theme::Theme;
