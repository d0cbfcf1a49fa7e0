use wayland_egl_demos::{config::Config, demo::layer_shell};

fn main() {
    env_logger::init();

    if let Err(err) = layer_shell::run(&Config::default()) {
        log::error!("layer-shell-subsurface: {err}");
        std::process::exit(1);
    }
}
