#[tokio::main]
async fn main() {
    let exit_code = skucheck_cli::run().await;
    std::process::exit(exit_code);
}
