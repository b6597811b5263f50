use crate::domain::ReadingKind;
use crate::models::Subscriber;
use crate::schema::{readings, subscribers};
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(Subscriber))]
#[diesel(table_name = readings)]
pub struct Reading {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub reading_type: String,
    pub topic: Option<String>,
    pub question: Option<String>,
    pub result: serde_json::Value,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = readings)]
pub struct NewReading<'a> {
    pub id: &'a Uuid,
    pub subscriber_id: &'a Uuid,
    pub reading_type: &'a str,
    pub topic: Option<&'a str>,
    pub question: Option<&'a str>,
    pub result: &'a serde_json::Value,
    pub summary: Option<&'a str>,
    pub created_at: &'a DateTime<Utc>,
}

impl Reading {
    #[tracing::instrument(name = "Insert reading", skip(conn, new_reading), fields(reading_type = new_reading.reading_type))]
    pub fn insert(conn: &mut PgConnection, new_reading: &NewReading) -> QueryResult<Reading> {
        diesel::insert_into(readings::table)
            .values(new_reading)
            .returning(Reading::as_returning())
            .get_result(conn)
    }

    /// Newest first.
    #[tracing::instrument(name = "List readings of a subscriber", skip(conn, subscriber))]
    pub fn list_for(
        conn: &mut PgConnection,
        subscriber: &Subscriber,
        kind: Option<ReadingKind>,
        limit: i64,
    ) -> QueryResult<Vec<Reading>> {
        let mut query = Reading::belonging_to(subscriber)
            .select(Reading::as_select())
            .order(readings::created_at.desc())
            .limit(limit)
            .into_boxed();
        if let Some(kind) = kind {
            query = query.filter(readings::reading_type.eq(kind.as_str()));
        }
        query.load(conn)
    }

    /// Email of the subscriber owning `reading_id`, if the reading exists.
    #[tracing::instrument(name = "Find reading owner", skip(conn))]
    pub fn owner_email(conn: &mut PgConnection, reading_id: Uuid) -> QueryResult<Option<String>> {
        readings::table
            .inner_join(subscribers::table)
            .filter(readings::id.eq(reading_id))
            .select(subscribers::email)
            .first::<String>(conn)
            .optional()
    }

    #[tracing::instrument(name = "Delete reading", skip(conn))]
    pub fn delete(conn: &mut PgConnection, reading_id: Uuid) -> QueryResult<usize> {
        diesel::delete(readings::table.filter(readings::id.eq(reading_id))).execute(conn)
    }
}
