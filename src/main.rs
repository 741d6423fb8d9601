fn main() -> std::process::ExitCode {
    unchained_launcher_lib::run()
}
