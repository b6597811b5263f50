use lumen::configuration::get_configuration;
use lumen::startup::Application;
use lumen::telemetry::{get_subscriber, init_subscriber};
use lumen::{email, generation};

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let subscriber = get_subscriber("lumen".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let email_client =
        email::from_settings(&configuration.email_client).expect("Failed to build the email client.");
    let generator = generation::from_settings(&configuration.generation)
        .expect("Failed to build the generation client.");

    let application = Application::build(&configuration, email_client, generator).await?;
    application.server.launch().await?;
    Ok(())
}
