//! Diesel schema for notification persistence.

diesel::table! {
    /// Append-only notification log.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Sender address.
        #[max_length = 255]
        sender -> Varchar,
        /// Recipient address.
        #[max_length = 255]
        recipient -> Varchar,
        /// Subject line.
        subject -> Text,
        /// Body text.
        body -> Text,
        /// In-app read flag.
        read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Transport outcome.
        smtp_sent -> Bool,
        /// Structured task context.
        meta -> Nullable<Jsonb>,
    }
}
