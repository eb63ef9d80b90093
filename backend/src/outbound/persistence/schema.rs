//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, regenerate with `diesel print-schema` or edit by hand.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` holds the normalised identity and carries the
    /// `accounts_email_key` unique constraint.
    accounts (id) {
        id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        /// PHC-format Argon2id hash.
        secret_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer tokens, keyed by the SHA-256 digest of the plaintext.
    access_tokens (digest) {
        #[max_length = 64]
        digest -> Varchar,
        account_id -> Uuid,
        created_at -> Timestamptz,
        /// `NULL` when the token never expires.
        expires_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Books, each owned by exactly one account.
    books (id) {
        id -> Uuid,
        owner_id -> Uuid,
        #[max_length = 255]
        title -> Varchar,
        #[max_length = 255]
        author -> Varchar,
        #[max_length = 17]
        isbn -> Nullable<Varchar>,
        published_year -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(access_tokens -> accounts (account_id));
diesel::joinable!(books -> accounts (owner_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, access_tokens, books);
