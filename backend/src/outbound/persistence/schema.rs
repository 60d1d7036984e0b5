//! Diesel table definitions mirroring `migrations/`.

diesel::table! {
    users (id) {
        id -> Int8,
        email -> Varchar,
        name -> Varchar,
        provider_subject -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    medical_records (id) {
        id -> Int8,
        email -> Varchar,
        symptom -> Text,
        diagnosis -> Text,
        therapy -> Text,
        result -> Text,
        created_at -> Timestamptz,
        created_by -> Varchar,
        updated_at -> Timestamptz,
        updated_by -> Varchar,
    }
}
