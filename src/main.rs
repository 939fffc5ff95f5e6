use signalrank::app;

#[tokio::main]
async fn main() {
    std::process::exit(app::startup::startup().await);
}
