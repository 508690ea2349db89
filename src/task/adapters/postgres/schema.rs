//! Diesel schema for task persistence.

diesel::table! {
    /// Task records, one per assignee.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Employee identifier of the assignee.
        #[max_length = 50]
        assigned_to -> Varchar,
        /// Priority label.
        #[max_length = 50]
        priority -> Varchar,
        /// Task status.
        #[max_length = 50]
        status -> Varchar,
        /// Optional deadline, as supplied.
        deadline -> Nullable<Text>,
        /// Username of the creating supervisor.
        #[max_length = 255]
        created_by -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
