//! Storyboard Studio
//!
//! A desktop storyboard-to-timeline tool: scenes with generated media flatten
//! into a single video track that plays back in-app and exports as FCP7 XML.

mod app;
mod components;
mod constants;
mod core;
mod state;
mod timeline;
mod utils;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

fn main() {
    // Configure the window
    let config = Config::new()
        .with_window(
            WindowBuilder::new()
                .with_title("Storyboard Studio")
                .with_inner_size(LogicalSize::new(1280.0, 800.0))
                .with_resizable(true),
        )
        .with_menu(None); // Disable default menu bar

    // Launch the Dioxus desktop application
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(app::App);
}
