//! Diesel schema for user persistence.

diesel::table! {
    /// Registered users and their roles.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        username -> Varchar,
        /// Unique, lowercased email address.
        #[max_length = 255]
        email -> Varchar,
        /// Encoded password hash.
        password_hash -> Text,
        /// Role name.
        #[max_length = 50]
        role -> Varchar,
        /// Employee identifier for Employee-role users.
        #[max_length = 50]
        employee_id -> Nullable<Varchar>,
        /// Whether the email address has been confirmed.
        is_verified -> Bool,
        /// Outstanding verification code.
        #[max_length = 6]
        verification_code -> Nullable<Varchar>,
        /// Expiry of the outstanding verification code.
        verification_expires_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
