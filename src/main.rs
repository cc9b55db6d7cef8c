// src/main.rs

pub mod app;
pub mod rendering_lib;
pub mod ui;

use app::ContourApp;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::WindowBuilder,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Warn).expect("Couldn't initialize logger");
        } else {
            env_logger::init();
        }
    }

    let event_loop = EventLoop::new().expect("Couldn't create event loop");
    let window = std::sync::Arc::new(
        WindowBuilder::new()
            .with_title("Rectangle Union")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 640))
            .build(&event_loop)
            .expect("Couldn't create window"),
    );

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-viewport")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("Couldn't append canvas to document body.");
    }

    let mut app_state = ContourApp::new(window.clone()).await;

    event_loop
        .run(move |event, target: &EventLoopWindowTarget<()>| {
            // Keep redrawing while focused so egui stays responsive; idle otherwise.
            if app_state.is_focused() {
                target.set_control_flow(ControlFlow::Poll);
            } else {
                target.set_control_flow(ControlFlow::Wait);
            }

            match event {
                Event::WindowEvent {
                    ref event,
                    window_id,
                } if window_id == window.id() => {
                    if !app_state.handle_window_event(event, &window) {
                        match event {
                            WindowEvent::CloseRequested => {
                                target.exit();
                            }
                            WindowEvent::Resized(physical_size) => {
                                app_state.resize(*physical_size);
                                window.request_redraw();
                            }
                            WindowEvent::Focused(is_focused) => {
                                app_state.set_focused(*is_focused);
                            }
                            _ => {}
                        }
                    }
                }
                Event::AboutToWait => {
                    match app_state.render(&window) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            app_state.resize(app_state.get_size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU out of memory, exiting");
                            target.exit();
                        }
                        Err(e) => log::warn!("Surface error: {:?}", e),
                    }

                    if !target.exiting() {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        })
        .expect("Event loop terminated with an error");
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        // `run` is the wasm start function.
        fn main() {}
    } else {
        #[tokio::main]
        async fn main() {
            run().await;
        }
    }
}
