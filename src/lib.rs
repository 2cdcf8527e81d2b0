//! Pixel-grid painting engine.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the painting surface: translating raw DOM pointer and
//! wheel events into paint and pan/zoom operations, storing painted cells
//! sparsely with links to their neighbors, tracking same-color adjacency for
//! border rendering, labeling contiguous same-colored regions, and redrawing
//! the surface once per animation frame when something changed. The host page
//! only mounts a [`host::PixelGrid`] and picks colors.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`grid`] | Sparse cell store and grid geometry |
//! | [`adjacency`] | Directions and the 4-bit same-color mask |
//! | [`region`] | Region ids and the flood fill |
//! | [`paint`] | The paint operation |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Buttons, cursor modes, and pointer routing state |
//! | [`render`] | Canvas2D drawing |
//! | [`host`] | Frame loop, DOM listeners, and the JS export |
//! | [`color`] | Color token parsing and shading |
//! | [`config`] | Host-supplied configuration |
//! | [`consts`] | Shared numeric constants (zoom limits, cell size, etc.) |

pub mod adjacency;
pub mod camera;
pub mod color;
pub mod config;
pub mod consts;
pub mod engine;
pub mod grid;
pub mod host;
pub mod input;
pub mod paint;
pub mod region;
pub mod render;

/// Install the console logger and panic hook when the module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialised: {err}").into());
    }
}
