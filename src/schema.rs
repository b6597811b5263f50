diesel::table! {
    subscribers (id) {
        id -> Uuid,
        email -> Text,
        save_email -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    readings (id) {
        id -> Uuid,
        subscriber_id -> Uuid,
        reading_type -> Text,
        topic -> Nullable<Text>,
        question -> Nullable<Text>,
        result -> Jsonb,
        summary -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_sessions (session_id) {
        session_id -> Text,
        email -> Nullable<Text>,
        save_email -> Bool,
        pwa_banner_dismissed_until -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(readings -> subscribers (subscriber_id));

diesel::allow_tables_to_appear_in_same_query!(readings, subscribers, user_sessions);
