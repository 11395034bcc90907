fn main() {
    xiaobao::app::cli::run();
}
