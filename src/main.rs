mod telemetry;

use docwatch_api::Application;
use docwatch_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("docwatch".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .expect("Failed to run database migrations");
    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
