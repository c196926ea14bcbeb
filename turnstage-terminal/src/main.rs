/// Turnstage Terminal Demo - interactive turntable with stage readout
///
/// Controls:
///   - Mouse drag: spin the turntable (release to coast)
///   - Left/Right arrows: nudge the heading
///   - Q/ESC: quit
///
/// An optional JSON tuning file may be passed as the first argument to
/// override interaction constants and the stage window table.
use log::info;
use std::{env, fs, io};
use turnstage_core::{Mesh, ViewerConfig};
use turnstage_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let config = load_config(&path)?;
            info!("loaded tuning from {path}");
            config
        }
        None => ViewerConfig::default(),
    };

    let mesh = Mesh::turntable(2.2, 0.5);
    let mut app = TerminalApp::new(mesh, config)?;
    app.run()
}

fn load_config(path: &str) -> io::Result<ViewerConfig> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bad tuning file {path}: {err}"),
        )
    })
}
