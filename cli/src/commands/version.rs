//! Version command

use std::process::ExitCode;

use crate::app::AppContext;
use crate::output::human::HumanRenderer;

/// Run the version command.
#[must_use]
pub fn run(app: &AppContext) -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");

    if app.is_json() {
        println!(r#"{{"version":"{version}"}}"#);
    } else {
        HumanRenderer::new(&app.output).render_version(version);
    }
    ExitCode::SUCCESS
}
