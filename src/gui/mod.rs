mod app;
mod message;
mod widgets;

use std::sync::Arc;

pub use app::FerroscanApp;
pub use message::{Message, Upload};

use crate::config::Settings;
use crate::pipeline::Pipeline;

/// Open the main window. `pipeline` is `Err` when startup failed fatally;
/// the window then only shows that error.
pub fn run(settings: Settings, pipeline: Result<Arc<Pipeline>, String>) -> iced::Result {
    iced::application(
        move || FerroscanApp::new(settings.clone(), pipeline.clone()),
        FerroscanApp::update,
        FerroscanApp::view,
    )
    .title(FerroscanApp::title)
    .theme(FerroscanApp::theme)
    .run()
}
