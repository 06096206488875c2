/// Trait representing a storable entity with a table name, id field, and field list.
///
/// The data layer treats entities as opaque beyond what this trait exposes:
/// field names are only interpreted by the storage driver.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     type Id = i64;
///     fn table_name() -> &'static str { "users" }
///     fn id_field() -> &'static str { "id" }
///     fn fields() -> &'static [&'static str] { &["id", "name", "email", "deleted_at"] }
///     fn soft_delete_field() -> Option<&'static str> { Some("deleted_at") }
///     fn id(&self) -> &i64 { &self.id }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    type Id: Clone + PartialEq + Send + Sync + ToString + 'static;

    fn table_name() -> &'static str;
    fn id_field() -> &'static str;
    fn fields() -> &'static [&'static str];

    /// Field holding the soft-delete marker, if the entity supports one.
    ///
    /// Drivers that cannot mark deletion without it must refuse
    /// `soft_delete_by_id` / `restore_by_id` when this is `None`.
    fn soft_delete_field() -> Option<&'static str> {
        None
    }

    fn id(&self) -> &Self::Id;
}
