use crate::domain::{SessionId, SubscriberEmail};
use crate::schema::user_sessions;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, serde::Serialize)]
#[diesel(table_name = user_sessions)]
#[diesel(primary_key(session_id))]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub session_id: String,
    pub email: Option<String>,
    pub save_email: bool,
    pub pwa_banner_dismissed_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = user_sessions)]
pub struct NewUserSession<'a> {
    pub session_id: &'a str,
    pub email: Option<&'a str>,
    pub save_email: bool,
    pub created_at: &'a DateTime<Utc>,
    pub updated_at: &'a DateTime<Utc>,
}

impl UserSession {
    /// Create the session or update it in place. A missing `email` keeps
    /// whatever email the session already had.
    #[tracing::instrument(name = "Upsert user session", skip(conn))]
    pub fn upsert(
        conn: &mut PgConnection,
        session_id: &SessionId,
        email: Option<&SubscriberEmail>,
        save_email: bool,
    ) -> QueryResult<UserSession> {
        let now = Utc::now();
        let new_session = NewUserSession {
            session_id: session_id.as_ref(),
            email: email.map(|e| e.as_ref()),
            save_email,
            created_at: &now,
            updated_at: &now,
        };
        let insert = diesel::insert_into(user_sessions::table)
            .values(&new_session)
            .on_conflict(user_sessions::session_id)
            .do_update();
        match email {
            Some(email) => insert
                .set((
                    user_sessions::email.eq(email.as_ref()),
                    user_sessions::save_email.eq(save_email),
                    user_sessions::updated_at.eq(now),
                ))
                .returning(UserSession::as_returning())
                .get_result(conn),
            None => insert
                .set((
                    user_sessions::save_email.eq(save_email),
                    user_sessions::updated_at.eq(now),
                ))
                .returning(UserSession::as_returning())
                .get_result(conn),
        }
    }

    #[tracing::instrument(name = "Find user session", skip(conn))]
    pub fn find(conn: &mut PgConnection, session_id: &SessionId) -> QueryResult<Option<UserSession>> {
        user_sessions::table
            .find(session_id.as_ref())
            .select(UserSession::as_select())
            .first(conn)
            .optional()
    }

    /// Returns `None` when the session does not exist.
    #[tracing::instrument(name = "Dismiss install banner", skip(conn))]
    pub fn dismiss_banner_until(
        conn: &mut PgConnection,
        session_id: &SessionId,
        until: DateTime<Utc>,
    ) -> QueryResult<Option<UserSession>> {
        diesel::update(user_sessions::table.find(session_id.as_ref()))
            .set((
                user_sessions::pwa_banner_dismissed_until.eq(Some(until)),
                user_sessions::updated_at.eq(Utc::now()),
            ))
            .returning(UserSession::as_returning())
            .get_result(conn)
            .optional()
    }
}
