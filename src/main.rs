fn main() {
    env_logger::init();
    log::info!("DeskPet starting up");

    if let Err(e) = deskpet::app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
