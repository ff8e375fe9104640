#[tokio::main]
async fn main() -> anyhow::Result<()> {
    drill_server::run().await
}
