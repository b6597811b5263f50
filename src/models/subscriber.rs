use crate::domain::SubscriberEmail;
use crate::schema::subscribers;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, serde::Serialize)]
#[diesel(table_name = subscribers)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub save_email: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = subscribers)]
pub struct NewSubscriber<'a> {
    pub id: &'a Uuid,
    pub email: &'a str,
    pub save_email: bool,
    pub created_at: &'a DateTime<Utc>,
    pub updated_at: &'a DateTime<Utc>,
}

impl Subscriber {
    /// Insert a subscriber, or refresh `save_email` when the email is
    /// already known. Returns the stored row either way.
    #[tracing::instrument(name = "Upsert subscriber", skip(conn))]
    pub fn upsert(
        conn: &mut PgConnection,
        email: &SubscriberEmail,
        save_email: bool,
    ) -> QueryResult<Subscriber> {
        let now = Utc::now();
        diesel::insert_into(subscribers::table)
            .values(NewSubscriber {
                id: &Uuid::new_v4(),
                email: email.as_ref(),
                save_email,
                created_at: &now,
                updated_at: &now,
            })
            .on_conflict(subscribers::email)
            .do_update()
            .set((
                subscribers::save_email.eq(save_email),
                subscribers::updated_at.eq(now),
            ))
            .returning(Subscriber::as_returning())
            .get_result(conn)
    }

    #[tracing::instrument(name = "Find subscriber by email", skip(conn))]
    pub fn find_by_email(
        conn: &mut PgConnection,
        email: &SubscriberEmail,
    ) -> QueryResult<Option<Subscriber>> {
        subscribers::table
            .filter(subscribers::email.eq(email.as_ref()))
            .select(Subscriber::as_select())
            .first(conn)
            .optional()
    }
}
