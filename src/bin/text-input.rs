use wayland_egl_demos::{config::Config, demo::text_input};

fn main() {
    env_logger::init();

    if let Err(err) = text_input::run(&Config::default()) {
        log::error!("text-input: {err}");
        std::process::exit(1);
    }
}
