#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    waste_report_server::run().await
}
