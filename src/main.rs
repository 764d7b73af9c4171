#[tokio::main]
async fn main() {
    accel::start_server().await;
}
