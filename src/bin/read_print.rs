use scheme_reader::cmdline;

fn main() {
    pretty_env_logger::init();
    let args = std::env::args().collect();
    if let Err(e) = cmdline::launch(args) {
        eprintln!("{}", cmdline::error_text(&e));
        std::process::exit(1);
    }
}
