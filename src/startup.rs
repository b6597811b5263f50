use crate::catchers::*;
use crate::clock::Clock;
use crate::configuration::Settings;
use crate::email::Email;
use crate::generation::TextGenerator;
use crate::routes::*;
use crate::server_port::{self, BoundPort};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing::AdHoc;
use rocket::figment::util::map;
use rocket::figment::value::{Map, Value};
use rocket::{Build, Ignite, Rocket};
use rocket_sync_db_pools::database;
use secrecy::ExposeSecret;
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("lumen")]
pub struct LumenDbConn(diesel::PgConnection);

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: BoundPort,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        email_client: Arc<dyn Email>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Application, rocket::Error> {
        let (reporter, port) = server_port::create_pair();
        let server = rocket(configuration, email_client, generator)
            .attach(reporter)
            .ignite()
            .await?;
        Ok(Application { server, port })
    }
}

pub fn rocket(
    configuration: &Settings,
    email_client: Arc<dyn Email>,
    generator: Arc<dyn TextGenerator>,
) -> Rocket<Build> {
    let database: Map<_, Value> = map! {
        "url" => configuration.database.connection_string().expose_secret().clone().into(),
        "pool_size" => configuration.database.pool_size.into(),
    };
    let figment = rocket::Config::figment()
        .merge(("address", configuration.application.host))
        .merge(("port", configuration.application.port.unwrap_or(0)))
        .merge(("databases", map!["lumen" => database]));

    rocket::custom(figment)
        .attach(LumenDbConn::fairing())
        .attach(AdHoc::try_on_ignite("Run database migrations", run_migrations))
        .manage(email_client)
        .manage(generator)
        .manage(Clock::new(configuration.application.utc_offset()))
        .mount(
            "/",
            routes![
                health,
                daily_selection,
                zodiac_sign,
                generate_horoscope,
                interpret_tarot,
                generate_saju,
                relay_chat,
                subscribe,
                save_reading,
                list_readings,
                delete_reading,
                upsert_session,
                get_session,
                dismiss_banner,
                email_reading,
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                unknown_route,
                unprocessable_entity_to_bad_request,
                internal_error,
            ],
        )
}

async fn run_migrations(rocket: Rocket<Build>) -> Result<Rocket<Build>, Rocket<Build>> {
    let conn = match LumenDbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            tracing::error!("No database connection available to run migrations");
            return Err(rocket);
        }
    };
    let outcome = conn
        .run(|c| c.run_pending_migrations(MIGRATIONS).map(|applied| applied.len()))
        .await;
    match outcome {
        Ok(applied) => {
            tracing::info!(applied, "Database migrations are up to date");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to run database migrations");
            Err(rocket)
        }
    }
}
