//! VesselLog - live monitoring for a cryostat test stand
//!
//! VesselLog is a desktop application that charts the rig's vessel
//! pressures and gas flowrate as they are logged. The serial-port work
//! lives in the helper binaries (`log_pressure`, `log_flow`, `set_flow`);
//! this process launches them on demand and tails the CSV files they
//! write.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use vessellog::app::VesselLogApp;
use vessellog::state;

/// Set the macOS application name for the dock
#[cfg(target_os = "macos")]
fn set_macos_app_name() {
    use objc2::{class, msg_send};
    use objc2_foundation::NSString;

    unsafe {
        let app_name = NSString::from_str(state::APP_TITLE);
        let process_info_class = class!(NSProcessInfo);
        let process_info: *mut objc2::runtime::AnyObject =
            msg_send![process_info_class, processInfo];
        let _: () = msg_send![process_info, setProcessName: &*app_name];
    }
}

#[cfg(not(target_os = "macos"))]
fn set_macos_app_name() {}

fn main() -> eframe::Result<()> {
    // Set macOS app name before anything else
    set_macos_app_name();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title(state::APP_TITLE)
            .with_app_id(state::APP_TITLE),
        ..Default::default()
    };

    // Run the application; a wiring error during registration aborts here
    eframe::run_native(
        state::APP_TITLE,
        native_options,
        Box::new(|cc| Ok(Box::new(VesselLogApp::new(cc)?))),
    )
}
