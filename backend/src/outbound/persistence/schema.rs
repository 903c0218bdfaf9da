//! Diesel table definitions.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Player accounts. `name`, `friend_code`, and `session_token` are unique.
    players (id) {
        id -> Uuid,
        name -> Varchar,
        access_code_hash -> Varchar,
        friend_code -> Varchar,
        session_token -> Varchar,
        balance -> Int8,
        last_accrual_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Merged holdings keyed by player and card key digest.
    collection_entries (player_id, card_key) {
        player_id -> Uuid,
        card_key -> Varchar,
        name -> Text,
        set_name -> Text,
        rarity -> Text,
        image -> Text,
        image_high -> Nullable<Text>,
        grade -> Int2,
        mint -> Bool,
        count -> Int8,
        last_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only pull history.
    pulls (id) {
        id -> Int8,
        player_id -> Uuid,
        name -> Text,
        set_name -> Text,
        rarity -> Text,
        image -> Text,
        image_high -> Nullable<Text>,
        grade -> Int2,
        mint -> Bool,
        pulled_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed friend edges.
    friends (owner_id, friend_id) {
        owner_id -> Uuid,
        friend_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(collection_entries -> players (player_id));
diesel::joinable!(pulls -> players (player_id));

diesel::allow_tables_to_appear_in_same_query!(players, collection_entries, pulls, friends);
