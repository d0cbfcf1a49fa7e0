use wayland_egl_demos::{config::Config, demo::egl_window};

fn main() {
    env_logger::init();

    if let Err(err) = egl_window::run(&Config::default()) {
        log::error!("egl-window: {err}");
        std::process::exit(1);
    }
}
