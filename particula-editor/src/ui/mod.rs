//! UI modules for the editor

mod export_panel;
mod preview;
mod settings_panel;

pub use export_panel::{render_export_button, render_export_window, ExportPanelState};
pub use preview::{Preview, Tool};
pub use settings_panel::render_settings_panel;
